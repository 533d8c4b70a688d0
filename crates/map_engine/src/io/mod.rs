//! Map text input and output

mod keys;
mod node_reader;
mod node_writer;

pub use node_reader::{NodeReader, ReadError};
pub use node_writer::{NodeWriter, WriteError};
