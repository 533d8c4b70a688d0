//! Result accumulator for query visitors

/// Accumulates the answer of a query visitor
///
/// The first value is stored as is; later values are folded in with the
/// combine function, which by default keeps the newest value.
#[derive(Debug, Clone)]
pub struct NodeQuery<T, C = fn(T, T) -> T> {
    result: Option<T>,
    combine: C,
}

fn keep_newest<T>(_previous: T, newest: T) -> T {
    newest
}

impl<T> NodeQuery<T> {
    /// Query that keeps the most recent result
    pub fn new() -> Self {
        Self { result: None, combine: keep_newest::<T> }
    }
}

impl<T> Default for NodeQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> NodeQuery<T, C>
where
    C: FnMut(T, T) -> T,
{
    /// Query folding results with `combine(previous, newest)`
    pub const fn with_combine(combine: C) -> Self {
        Self { result: None, combine }
    }

    /// Record a result
    pub fn set_result(&mut self, value: T) {
        let combined = match self.result.take() {
            Some(previous) => (self.combine)(previous, value),
            None => value,
        };
        self.result = Some(combined);
    }
}

impl<T, C> NodeQuery<T, C> {
    /// Whether any result was recorded
    pub const fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// The accumulated result
    pub const fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Consume the query, returning the accumulated result
    pub fn into_result(self) -> Option<T> {
        self.result
    }
}
