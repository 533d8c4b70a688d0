//! Document notifications
//!
//! Every committed edit of a [`MapDocument`] is announced as a
//! [`DocumentEvent`]. Observers are notified synchronously, in registration
//! order, before the edit call returns; there is no deferred queue.

use crate::model::{FaceRef, MapDocument, NodeId, SelectionChange};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentEventType {
    /// All nodes were dropped
    Cleared,
    /// A fresh or loaded tree replaced the document
    NewedOrLoaded,
    /// Subtrees were attached
    NodesAdded,
    /// Subtrees are about to be detached
    NodesWillBeRemoved,
    /// Payloads of selected nodes changed
    NodesChanged,
    /// Brush faces changed in place
    BrushFacesChanged,
    /// Selection changed
    SelectionChanged,
    /// A preference value changed
    PreferenceChanged,
}

/// A committed document edit
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    /// All nodes were dropped
    Cleared,
    /// A fresh or loaded tree replaced the document
    NewedOrLoaded,
    /// Roots of newly attached subtrees
    NodesAdded(Vec<NodeId>),
    /// Roots of subtrees about to be detached; the nodes are still in the tree
    NodesWillBeRemoved(Vec<NodeId>),
    /// Nodes whose payload changed
    NodesChanged(Vec<NodeId>),
    /// Faces whose attributes changed
    BrushFacesChanged(Vec<FaceRef>),
    /// The selection delta of one edit
    SelectionChanged(SelectionChange),
    /// Key of the preference that changed
    PreferenceChanged(String),
}

impl DocumentEvent {
    /// Type of this event
    pub const fn event_type(&self) -> DocumentEventType {
        match self {
            Self::Cleared => DocumentEventType::Cleared,
            Self::NewedOrLoaded => DocumentEventType::NewedOrLoaded,
            Self::NodesAdded(_) => DocumentEventType::NodesAdded,
            Self::NodesWillBeRemoved(_) => DocumentEventType::NodesWillBeRemoved,
            Self::NodesChanged(_) => DocumentEventType::NodesChanged,
            Self::BrushFacesChanged(_) => DocumentEventType::BrushFacesChanged,
            Self::SelectionChanged(_) => DocumentEventType::SelectionChanged,
            Self::PreferenceChanged(_) => DocumentEventType::PreferenceChanged,
        }
    }
}

/// Receives document events
pub trait DocumentObserver {
    /// Handle an event; `doc` already reflects the edit, except for
    /// [`DocumentEvent::NodesWillBeRemoved`]
    fn on_event(&mut self, doc: &MapDocument, event: &DocumentEvent);
}

/// Observer that keeps every event it receives
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<DocumentEvent>,
}

impl EventRecorder {
    /// Create a new empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in arrival order
    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    /// Types of the received events in arrival order
    pub fn event_types(&self) -> Vec<DocumentEventType> {
        self.events.iter().map(DocumentEvent::event_type).collect()
    }

    /// Forget all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DocumentObserver for EventRecorder {
    fn on_event(&mut self, _doc: &MapDocument, event: &DocumentEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_order() {
        let doc = MapDocument::new_map("test");
        let mut recorder = EventRecorder::new();

        recorder.on_event(&doc, &DocumentEvent::NewedOrLoaded);
        recorder.on_event(&doc, &DocumentEvent::PreferenceChanged("edge_color".into()));
        assert_eq!(
            recorder.event_types(),
            vec![DocumentEventType::NewedOrLoaded, DocumentEventType::PreferenceChanged]
        );

        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
