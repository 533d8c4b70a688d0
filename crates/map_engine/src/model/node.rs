//! Node variants of the map scene graph
//!
//! The node set is closed: a map is a tree of exactly five kinds of node.
//!
//! ```text
//! World
//!  └─ Layer
//!      ├─ Group ─┬─ Group ...
//!      │         ├─ Entity ── Brush
//!      │         └─ Brush
//!      ├─ Entity ── Brush
//!      └─ Brush
//! ```
//!
//! Every visitor implements one handler per kind, so adding a kind is a
//! compile error everywhere the tree is traversed.

use super::brush::Brush;
use super::visitor::{NodeVisitor, NodeVisitorMut, Visit};
use crate::foundation::collections::new_key_type;

new_key_type! {
    /// Generational handle of a node inside a [`NodeTree`](super::NodeTree)
    pub struct NodeId;
}

/// Payload-free discriminant of [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    /// Root of the document
    World,
    /// Top-level partition of the map
    Layer,
    /// Recursive container
    Group,
    /// Point or brush entity
    Entity,
    /// Convex solid
    Brush,
}

impl NodeType {
    /// Whether a node of this type may own a child of type `child`
    pub const fn can_contain(self, child: Self) -> bool {
        match self {
            Self::World => matches!(child, Self::Layer),
            Self::Layer | Self::Group => matches!(child, Self::Group | Self::Entity | Self::Brush),
            Self::Entity => matches!(child, Self::Brush),
            Self::Brush => false,
        }
    }

    /// Groups, entities and brushes: the nodes that end up in render batches
    pub const fn is_object(self) -> bool {
        matches!(self, Self::Group | Self::Entity | Self::Brush)
    }
}

/// Ordered key/value attribute list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Add or replace an attribute, keeping the position of an existing key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Root payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    /// Map name
    pub name: String,
    /// Worldspawn attributes
    pub attributes: Attributes,
}

impl World {
    /// Create a world with the given map name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Attributes::new() }
    }
}

/// Layer payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    /// Display name
    pub name: String,
    /// Ordering among custom layers
    pub sort_index: i32,
    /// Hidden layers are not drawn
    pub hidden: bool,
    /// Locked layers are drawn but cannot be edited or highlighted
    pub locked: bool,
    /// Skip this layer when exporting
    pub omit_from_export: bool,
}

impl Layer {
    /// Create a visible, unlocked layer
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Group payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// Display name
    pub name: String,
}

impl Group {
    /// Create a named group
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Entity payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Entity class, e.g. `light` or `func_door`
    pub classname: String,
    /// All other attributes
    pub attributes: Attributes,
}

impl Entity {
    /// Create an entity of the given class
    pub fn new(classname: impl Into<String>) -> Self {
        Self { classname: classname.into(), attributes: Attributes::new() }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(key, value);
        self
    }
}

/// Typed payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// See [`World`]
    World(World),
    /// See [`Layer`]
    Layer(Layer),
    /// See [`Group`]
    Group(Group),
    /// See [`Entity`]
    Entity(Entity),
    /// See [`Brush`]
    Brush(Brush),
}

impl NodeKind {
    /// Discriminant of this payload
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::World(_) => NodeType::World,
            Self::Layer(_) => NodeType::Layer,
            Self::Group(_) => NodeType::Group,
            Self::Entity(_) => NodeType::Entity,
            Self::Brush(_) => NodeType::Brush,
        }
    }
}

impl From<World> for NodeKind {
    fn from(world: World) -> Self {
        Self::World(world)
    }
}

impl From<Layer> for NodeKind {
    fn from(layer: Layer) -> Self {
        Self::Layer(layer)
    }
}

impl From<Group> for NodeKind {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Entity> for NodeKind {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}

impl From<Brush> for NodeKind {
    fn from(brush: Brush) -> Self {
        Self::Brush(brush)
    }
}

/// Borrowed view of a node payload, handed to closure visitors
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// World payload
    World(&'a World),
    /// Layer payload
    Layer(&'a Layer),
    /// Group payload
    Group(&'a Group),
    /// Entity payload
    Entity(&'a Entity),
    /// Brush payload
    Brush(&'a Brush),
}

/// Mutably borrowed view of a node payload
#[derive(Debug)]
pub enum NodeRefMut<'a> {
    /// World payload
    World(&'a mut World),
    /// Layer payload
    Layer(&'a mut Layer),
    /// Group payload
    Group(&'a mut Group),
    /// Entity payload
    Entity(&'a mut Entity),
    /// Brush payload
    Brush(&'a mut Brush),
}

/// Identity and selection state of a node at the moment it is visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// The visited node
    pub id: NodeId,
    /// Its parent, `None` for the world
    pub parent: Option<NodeId>,
    /// Its kind
    pub node_type: NodeType,
    /// Directly selected
    pub selected: bool,
    /// Some strict descendant (node or brush face) is selected
    pub descendant_selected: bool,
}

/// A node of the map tree
///
/// Structure and selection counts are owned by the
/// [`NodeTree`](super::NodeTree); only the payload is reachable mutably
/// from outside the model.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) id: NodeId,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) selected: bool,
    pub(super) descendant_selection_count: usize,
    pub(super) kind: NodeKind,
}

impl Node {
    pub(super) fn new(id: NodeId, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            selected: false,
            descendant_selection_count: 0,
            kind,
        }
    }

    /// Handle of this node
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Parent handle, `None` for the world
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in stored order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Kind of this node
    pub const fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Typed payload
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Directly selected
    pub const fn selected(&self) -> bool {
        self.selected
    }

    /// True if any strict descendant, including a brush face, is selected
    pub const fn descendant_selected(&self) -> bool {
        self.descendant_selection_count > 0
    }

    /// Snapshot handed to visitors
    pub const fn info(&self) -> NodeInfo {
        NodeInfo {
            id: self.id,
            parent: self.parent,
            node_type: self.kind.node_type(),
            selected: self.selected,
            descendant_selected: self.descendant_selected(),
        }
    }

    /// Borrowed payload view
    pub const fn as_node_ref(&self) -> NodeRef<'_> {
        match &self.kind {
            NodeKind::World(world) => NodeRef::World(world),
            NodeKind::Layer(layer) => NodeRef::Layer(layer),
            NodeKind::Group(group) => NodeRef::Group(group),
            NodeKind::Entity(entity) => NodeRef::Entity(entity),
            NodeKind::Brush(brush) => NodeRef::Brush(brush),
        }
    }

    /// The brush payload, if this is a brush
    pub const fn as_brush(&self) -> Option<&Brush> {
        match &self.kind {
            NodeKind::Brush(brush) => Some(brush),
            _ => None,
        }
    }

    /// World payload, if this is the world
    pub const fn as_world(&self) -> Option<&World> {
        match &self.kind {
            NodeKind::World(world) => Some(world),
            _ => None,
        }
    }

    /// The layer payload, if this is a layer
    pub const fn as_layer(&self) -> Option<&Layer> {
        match &self.kind {
            NodeKind::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    /// Dispatch to the handler matching this node's kind
    pub fn accept<'a, V: NodeVisitor<'a> + ?Sized>(&'a self, visitor: &mut V) -> Visit {
        let info = self.info();
        match &self.kind {
            NodeKind::World(world) => visitor.visit_world(info, world),
            NodeKind::Layer(layer) => visitor.visit_layer(info, layer),
            NodeKind::Group(group) => visitor.visit_group(info, group),
            NodeKind::Entity(entity) => visitor.visit_entity(info, entity),
            NodeKind::Brush(brush) => visitor.visit_brush(info, brush),
        }
    }

    /// Mutable dispatch to the handler matching this node's kind
    ///
    /// # Panics
    ///
    /// If a brush handler changes the number of selected faces; face selection
    /// is owned by the tree.
    pub fn accept_mut<V: NodeVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> Visit {
        let info = self.info();
        match &mut self.kind {
            NodeKind::World(world) => visitor.visit_world(info, world),
            NodeKind::Layer(layer) => visitor.visit_layer(info, layer),
            NodeKind::Group(group) => visitor.visit_group(info, group),
            NodeKind::Entity(entity) => visitor.visit_entity(info, entity),
            NodeKind::Brush(brush) => {
                let selected_faces = brush.selected_face_count();
                let visit = visitor.visit_brush(info, brush);
                assert_eq!(
                    selected_faces,
                    brush.selected_face_count(),
                    "visitor changed the face selection of brush {:?}",
                    info.id
                );
                visit
            }
        }
    }
}
