//! The map document: a node tree plus document-level bookkeeping

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use super::node::{Layer, World};
use super::tree::NodeTree;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`MapDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Name of the layer every new map starts with
pub const DEFAULT_LAYER_NAME: &str = "Default Layer";

/// An open map
#[derive(Debug)]
pub struct MapDocument {
    id: DocumentId,
    tree: NodeTree,
    pending_assets: BTreeSet<String>,
    loaded_assets: BTreeSet<String>,
    modification_count: u64,
}

impl MapDocument {
    /// Create a document without any nodes
    pub fn new() -> Self {
        Self::from_tree(NodeTree::new())
    }

    /// Create a document holding a world with one default layer
    pub fn new_map(name: &str) -> Self {
        Self::from_tree(default_map(name))
    }

    /// Wrap an existing tree
    pub fn from_tree(tree: NodeTree) -> Self {
        Self {
            id: DocumentId::next(),
            tree,
            pending_assets: BTreeSet::new(),
            loaded_assets: BTreeSet::new(),
            modification_count: 0,
        }
    }

    /// Identity of this document
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// The node tree
    pub const fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Mutable node tree
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    /// Swap in a new tree, returning the old one
    pub fn replace_tree(&mut self, tree: NodeTree) -> NodeTree {
        self.pending_assets.clear();
        self.loaded_assets.clear();
        self.modification_count = 0;
        std::mem::replace(&mut self.tree, tree)
    }

    /// Number of edits since the tree was created or replaced
    pub const fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// Record one edit
    pub fn increment_modification_count(&mut self) {
        self.modification_count += 1;
    }

    /// Queue an asset, typically a texture, for loading before the next frame
    pub fn request_asset(&mut self, name: &str) {
        if !self.loaded_assets.contains(name) {
            self.pending_assets.insert(name.to_string());
        }
    }

    /// Assets waiting to be committed
    pub fn pending_assets(&self) -> impl Iterator<Item = &str> {
        self.pending_assets.iter().map(String::as_str)
    }

    /// Whether an asset has been committed
    pub fn is_asset_loaded(&self, name: &str) -> bool {
        self.loaded_assets.contains(name)
    }

    /// Commit every pending asset, returning how many were committed
    pub fn commit_pending_assets(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_assets);
        let committed = pending.len();
        if committed > 0 {
            log::debug!("Committing {} pending assets", committed);
        }
        self.loaded_assets.extend(pending);
        committed
    }
}

impl Default for MapDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// A world named `name` with an empty default layer
pub fn default_map(name: &str) -> NodeTree {
    let mut tree = NodeTree::with_world(World::new(name));
    if let Some(world) = tree.world() {
        if let Err(err) = tree.add_child(world, Layer::new(DEFAULT_LAYER_NAME)) {
            log::error!("Failed to create default layer: {}", err);
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_get_distinct_ids() {
        let a = MapDocument::new();
        let b = MapDocument::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_new_map_has_default_layer() {
        let doc = MapDocument::new_map("e1m1");
        let layer = doc.tree().default_layer().unwrap();
        assert_eq!(doc.tree()[layer].as_layer().unwrap().name, DEFAULT_LAYER_NAME);
    }

    #[test]
    fn test_pending_assets_commit_once() {
        let mut doc = MapDocument::new_map("e1m1");
        doc.request_asset("base/wall");
        doc.request_asset("base/floor");
        doc.request_asset("base/wall");

        assert_eq!(doc.pending_assets().count(), 2);
        assert_eq!(doc.commit_pending_assets(), 2);
        assert!(doc.is_asset_loaded("base/floor"));

        doc.request_asset("base/wall");
        assert_eq!(doc.commit_pending_assets(), 0);
    }
}
