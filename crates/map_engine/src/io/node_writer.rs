//! Quake-style map text output
//!
//! The world and its default layer become `worldspawn`. Custom layers and
//! groups become `func_group` entities tagged with `_tb_*` attributes so
//! [`NodeReader`](super::NodeReader) can rebuild the hierarchy. Children of
//! layers and groups point back at their container through a parent attribute.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::model::{
    Brush, CollectNodes, Entity, FaceRef, Group, Layer, NodeId, NodeInfo, NodeKind, NodeTree, NodeType, NodeVisitor,
    TreeError, Visit, World,
};

use super::keys::{
    CLASSNAME_KEY, FLAG_SET, GROUP_CLASSNAME, GROUP_KEY, GROUP_TYPE, ID_KEY, LAYER_HIDDEN_KEY, LAYER_KEY,
    LAYER_LOCKED_KEY, LAYER_OMIT_FROM_EXPORT_KEY, LAYER_SORT_INDEX_KEY, LAYER_TYPE, NAME_KEY, TYPE_KEY,
    WORLDSPAWN_CLASSNAME,
};

type Attribute = (String, String);

/// Map writing errors
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// The output rejected a write
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Tree lookup failed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Writes a node tree, or parts of it, as map text
pub struct NodeWriter<'t, W> {
    tree: &'t NodeTree,
    out: W,
    exporting: bool,
    entity_count: usize,
    brush_count: usize,
    persistent_ids: HashMap<NodeId, u64>,
    last_persistent_id: u64,
}

impl<'t, W: Write> NodeWriter<'t, W> {
    /// Create a writer for `tree` emitting into `out`
    pub fn new(tree: &'t NodeTree, out: W) -> Self {
        Self {
            tree,
            out,
            exporting: false,
            entity_count: 0,
            brush_count: 0,
            persistent_ids: HashMap::new(),
            last_persistent_id: 0,
        }
    }

    /// When exporting, layers marked `omit_from_export` are left out
    pub fn set_exporting(&mut self, exporting: bool) {
        self.exporting = exporting;
    }

    /// Consume the writer and return its output
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the whole map
    pub fn write_map(&mut self) -> Result<(), WriteError> {
        let world = self.tree.world().ok_or(TreeError::MissingWorld)?;
        self.begin_file();

        let layers = self.tree.layers();
        let Some((&default_layer, custom_layers)) = layers.split_first() else {
            return self.write_world(world, &[]);
        };

        let omitted = self.is_omitted(default_layer);
        let brushes = if omitted { Vec::new() } else { self.brush_children(default_layer) };
        self.write_world(world, &brushes)?;
        if !omitted {
            self.write_children(default_layer, Vec::new())?;
        }

        let mut custom_layers = custom_layers.to_vec();
        custom_layers.sort_by_key(|&layer| self.tree[layer].as_layer().map_or(0, |layer| layer.sort_index));
        for layer in custom_layers {
            self.write_custom_layer(layer)?;
        }

        log::debug!("Wrote map with {} entities", self.entity_count);
        Ok(())
    }

    /// Write loose nodes, e.g. for the clipboard
    ///
    /// Brushes are grouped under their owning entity, or under `worldspawn`
    /// when they belong to a layer or group. Groups and entities are written
    /// whole. Worlds and layers are ignored.
    pub fn write_nodes(&mut self, ids: &[NodeId]) -> Result<(), WriteError> {
        if let Some(&id) = ids.iter().find(|&&id| !self.tree.contains(id)) {
            return Err(TreeError::UnknownNode(id).into());
        }
        self.begin_file();

        let tree = self.tree;
        let mut collect = CollectNodes::new();
        tree.accept_all(ids, &mut collect);

        let mut sort = SortBrushes::default();
        for &brush in &collect.brushes {
            if let Some(parent) = tree.parent(brush) {
                sort.brush = Some(brush);
                tree.accept(parent, &mut sort);
            }
        }

        if !sort.world_brushes.is_empty() {
            let world = tree.world().ok_or(TreeError::MissingWorld)?;
            self.write_world(world, &sort.world_brushes)?;
        }
        for (entity, brushes) in &sort.entity_brushes {
            if let NodeKind::Entity(payload) = tree[*entity].kind() {
                self.write_entity(payload, &[], brushes)?;
            }
        }

        let mut write = WriteNode::new(self, Vec::new());
        tree.accept_all(&collect.groups, &mut write);
        tree.accept_all(&collect.entities, &mut write);
        write.finish()
    }

    /// Write bare face lines
    pub fn write_brush_faces(&mut self, faces: &[FaceRef]) -> Result<(), WriteError> {
        self.begin_file();
        for &face in faces {
            let node = self.tree.get(face.brush).ok_or(TreeError::UnknownNode(face.brush))?;
            let brush = node.as_brush().ok_or(TreeError::WrongNodeType {
                id: face.brush,
                expected: NodeType::Brush,
                actual: node.node_type(),
            })?;
            let index = face.index;
            let face = brush.face(index).ok_or(TreeError::FaceOutOfRange { brush: face.brush, index })?;
            writeln!(
                self.out,
                "( {} {} {} ) {} {}",
                number(face.normal.x),
                number(face.normal.y),
                number(face.normal.z),
                number(face.distance),
                face.texture
            )?;
        }
        Ok(())
    }

    fn begin_file(&mut self) {
        self.entity_count = 0;
        self.brush_count = 0;
    }

    fn is_omitted(&self, layer: NodeId) -> bool {
        self.exporting && self.tree[layer].as_layer().is_some_and(|layer| layer.omit_from_export)
    }

    fn brush_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.tree[child].node_type() == NodeType::Brush)
            .collect()
    }

    fn persistent_id(&mut self, id: NodeId) -> u64 {
        let last = &mut self.last_persistent_id;
        *self.persistent_ids.entry(id).or_insert_with(|| {
            *last += 1;
            *last
        })
    }

    fn parent_attributes(&mut self, parent: NodeId) -> Vec<Attribute> {
        let key = match self.tree[parent].node_type() {
            NodeType::Layer => LAYER_KEY,
            NodeType::Group => GROUP_KEY,
            _ => return Vec::new(),
        };
        vec![(key.to_string(), self.persistent_id(parent).to_string())]
    }

    fn write_world(&mut self, world: NodeId, brushes: &[NodeId]) -> Result<(), WriteError> {
        let NodeKind::World(payload) = self.tree[world].kind() else {
            return Err(TreeError::WrongNodeType {
                id: world,
                expected: NodeType::World,
                actual: self.tree[world].node_type(),
            }
            .into());
        };
        let attributes: Vec<Attribute> = payload
            .attributes
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.write_entity_block(WORLDSPAWN_CLASSNAME, &attributes, brushes)
    }

    fn write_custom_layer(&mut self, layer: NodeId) -> Result<(), WriteError> {
        if self.is_omitted(layer) {
            log::debug!("Omitting layer {:?} from export", layer);
            return Ok(());
        }
        let Some(payload) = self.tree[layer].as_layer() else {
            return Ok(());
        };
        let mut attributes = vec![
            (TYPE_KEY.to_string(), LAYER_TYPE.to_string()),
            (NAME_KEY.to_string(), payload.name.clone()),
            (ID_KEY.to_string(), self.persistent_id(layer).to_string()),
            (LAYER_SORT_INDEX_KEY.to_string(), payload.sort_index.to_string()),
        ];
        for (set, key) in [
            (payload.locked, LAYER_LOCKED_KEY),
            (payload.hidden, LAYER_HIDDEN_KEY),
            (payload.omit_from_export, LAYER_OMIT_FROM_EXPORT_KEY),
        ] {
            if set {
                attributes.push((key.to_string(), FLAG_SET.to_string()));
            }
        }

        let brushes = self.brush_children(layer);
        self.write_entity_block(GROUP_CLASSNAME, &attributes, &brushes)?;
        let parent_attributes = self.parent_attributes(layer);
        self.write_children(layer, parent_attributes)
    }

    fn write_group(&mut self, group: NodeId, payload: &Group, parent_attributes: &[Attribute]) -> Result<(), WriteError> {
        let mut attributes = vec![
            (TYPE_KEY.to_string(), GROUP_TYPE.to_string()),
            (NAME_KEY.to_string(), payload.name.clone()),
            (ID_KEY.to_string(), self.persistent_id(group).to_string()),
        ];
        attributes.extend_from_slice(parent_attributes);

        let brushes = self.brush_children(group);
        self.write_entity_block(GROUP_CLASSNAME, &attributes, &brushes)?;
        let parent_attributes = self.parent_attributes(group);
        self.write_children(group, parent_attributes)
    }

    fn write_entity(&mut self, entity: &Entity, parent_attributes: &[Attribute], brushes: &[NodeId]) -> Result<(), WriteError> {
        let mut attributes: Vec<Attribute> = entity
            .attributes
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        attributes.extend_from_slice(parent_attributes);
        self.write_entity_block(&entity.classname, &attributes, brushes)
    }

    fn write_children(&mut self, container: NodeId, parent_attributes: Vec<Attribute>) -> Result<(), WriteError> {
        let tree = self.tree;
        let mut write = WriteNode::new(self, parent_attributes);
        tree.accept_all(tree.children(container), &mut write);
        write.finish()
    }

    fn write_entity_block(&mut self, classname: &str, attributes: &[Attribute], brushes: &[NodeId]) -> Result<(), WriteError> {
        writeln!(self.out, "// entity {}", self.entity_count)?;
        writeln!(self.out, "{{")?;
        writeln!(self.out, "\"{}\" \"{}\"", CLASSNAME_KEY, classname)?;
        for (key, value) in attributes {
            writeln!(self.out, "\"{}\" \"{}\"", key, value)?;
        }

        self.brush_count = 0;
        for &brush in brushes {
            if let Some(payload) = self.tree[brush].as_brush() {
                self.write_brush(payload)?;
            }
        }

        writeln!(self.out, "}}")?;
        self.entity_count += 1;
        Ok(())
    }

    fn write_brush(&mut self, brush: &Brush) -> Result<(), WriteError> {
        writeln!(self.out, "// brush {}", self.brush_count)?;
        writeln!(self.out, "{{")?;
        for face in brush.faces() {
            writeln!(
                self.out,
                "( {} {} {} ) {} {}",
                number(face.normal.x),
                number(face.normal.y),
                number(face.normal.z),
                number(face.distance),
                face.texture
            )?;
        }
        writeln!(self.out, "}}")?;
        self.brush_count += 1;
        Ok(())
    }
}

/// Adding zero turns `-0.0` into `0.0`
fn number(value: f32) -> f32 {
    value + 0.0
}

/// Writes groups and entities found directly below one container
struct WriteNode<'w, 't, W> {
    writer: &'w mut NodeWriter<'t, W>,
    parent_attributes: Vec<Attribute>,
    error: Option<WriteError>,
}

impl<'w, 't, W: Write> WriteNode<'w, 't, W> {
    fn new(writer: &'w mut NodeWriter<'t, W>, parent_attributes: Vec<Attribute>) -> Self {
        Self {
            writer,
            parent_attributes,
            error: None,
        }
    }

    fn record(&mut self, result: Result<(), WriteError>) -> Visit {
        match result {
            Ok(()) => Visit::SkipChildren,
            Err(err) => {
                self.error = Some(err);
                Visit::Cancel
            }
        }
    }

    fn finish(self) -> Result<(), WriteError> {
        self.error.map_or(Ok(()), Err)
    }
}

impl<'t, W: Write> NodeVisitor<'t> for WriteNode<'_, 't, W> {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'t World) -> Visit {
        Visit::SkipChildren
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'t Layer) -> Visit {
        Visit::SkipChildren
    }

    fn visit_group(&mut self, node: NodeInfo, group: &'t Group) -> Visit {
        let result = self.writer.write_group(node.id, group, &self.parent_attributes);
        self.record(result)
    }

    fn visit_entity(&mut self, node: NodeInfo, entity: &'t Entity) -> Visit {
        let brushes = self.writer.brush_children(node.id);
        let result = self.writer.write_entity(entity, &self.parent_attributes, &brushes);
        self.record(result)
    }

    fn visit_brush(&mut self, _node: NodeInfo, _brush: &'t Brush) -> Visit {
        Visit::SkipChildren
    }
}

/// Sorts a brush by the kind of its parent
#[derive(Default)]
struct SortBrushes {
    brush: Option<NodeId>,
    world_brushes: Vec<NodeId>,
    entity_brushes: BTreeMap<NodeId, Vec<NodeId>>,
}

impl SortBrushes {
    fn push_world(&mut self) -> Visit {
        self.world_brushes.extend(self.brush);
        Visit::Continue
    }
}

impl<'a> NodeVisitor<'a> for SortBrushes {
    fn visit_world(&mut self, _node: NodeInfo, _world: &'a World) -> Visit {
        self.push_world()
    }

    fn visit_layer(&mut self, _node: NodeInfo, _layer: &'a Layer) -> Visit {
        self.push_world()
    }

    fn visit_group(&mut self, _node: NodeInfo, _group: &'a Group) -> Visit {
        self.push_world()
    }

    fn visit_entity(&mut self, node: NodeInfo, _entity: &'a Entity) -> Visit {
        if let Some(brush) = self.brush {
            self.entity_brushes.entry(node.id).or_default().push(brush);
        }
        Visit::Continue
    }

    fn visit_brush(&mut self, _node: NodeInfo, _brush: &'a Brush) -> Visit {
        Visit::Continue
    }
}
