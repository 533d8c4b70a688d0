//! Quake-style map text input
//!
//! Reads the text [`NodeWriter`](super::NodeWriter) produces. `worldspawn`
//! becomes the world and its brushes fill the default layer. `func_group`
//! entities tagged as layers or groups become layer and group nodes. Every
//! other entity is attached to the container its parent attribute names, and
//! that attribute is dropped.
//!
//! Malformed text is an error. Layers, groups and brushes that are well formed
//! but unusable are skipped with a warning, as are parent ids that resolve to
//! nothing; orphans end up in the default layer.

use std::collections::{HashMap, HashSet};

use super::keys::{
    CLASSNAME_KEY, FLAG_SET, GROUP_CLASSNAME, GROUP_KEY, GROUP_TYPE, ID_KEY, LAYER_HIDDEN_KEY, LAYER_KEY,
    LAYER_LOCKED_KEY, LAYER_OMIT_FROM_EXPORT_KEY, LAYER_SORT_INDEX_KEY, LAYER_TYPE, NAME_KEY, TYPE_KEY,
    WORLDSPAWN_CLASSNAME,
};
use crate::foundation::math::Vec3;
use crate::model::{
    Brush, BrushFace, Entity, Group, Layer, NodeId, NodeTree, TreeError, World, DEFAULT_LAYER_NAME,
};

/// Map reading errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    /// A line does not fit where it appears
    #[error("Line {line}: expected {expected}, found '{found}'")]
    Unexpected {
        /// 1-based line number
        line: usize,
        /// What the reader was looking for
        expected: &'static str,
        /// The offending line
        found: String,
    },

    /// The text ended inside a block
    #[error("Line {line}: {block} is never closed")]
    Unterminated {
        /// Line opening the block
        line: usize,
        /// `"entity"` or `"brush"`
        block: &'static str,
    },

    /// A face coordinate is not a number
    #[error("Line {line}: '{value}' is not a number")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// The offending token
        value: String,
    },

    /// Building the tree failed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Parses map text into a node tree or into loose brush faces
pub struct NodeReader<'s> {
    text: &'s str,
}

impl<'s> NodeReader<'s> {
    /// Create a reader over `text`
    pub const fn new(text: &'s str) -> Self {
        Self { text }
    }

    /// Read a whole map; the world is named `name`
    pub fn read_map(&self, name: &str) -> Result<NodeTree, ReadError> {
        let blocks = parse_entities(self.text)?;

        let mut world = World::new(name);
        for block in blocks.iter().filter(|block| block.classname() == Some(WORLDSPAWN_CLASSNAME)) {
            for (key, value) in block.attributes.iter().filter(|(key, _)| key != CLASSNAME_KEY) {
                world.attributes.set(key.as_str(), value.as_str());
            }
        }

        let mut builder = TreeBuilder::new(world)?;
        for block in blocks {
            builder.add_block(block)?;
        }
        let tree = builder.finish()?;
        log::debug!("Read map {:?} with {} nodes", name, tree.len());
        Ok(tree)
    }

    /// Read bare face lines, as written by
    /// [`write_brush_faces`](super::NodeWriter::write_brush_faces)
    pub fn read_brush_faces(&self) -> Result<Vec<BrushFace>, ReadError> {
        let mut lines = Lines::new(self.text);
        let mut faces = Vec::new();
        while let Some((line, content)) = lines.next_line() {
            faces.push(parse_face(line, content)?);
        }
        Ok(faces)
    }
}

/// Lines that carry content, numbered from 1
struct Lines<'s> {
    inner: std::iter::Enumerate<std::str::Lines<'s>>,
}

impl<'s> Lines<'s> {
    fn new(text: &'s str) -> Self {
        Self { inner: text.lines().enumerate() }
    }

    fn next_line(&mut self) -> Option<(usize, &'s str)> {
        self.inner
            .by_ref()
            .map(|(index, line)| (index + 1, line.trim()))
            .find(|(_, line)| !line.is_empty() && !line.starts_with("//"))
    }
}

#[derive(Debug)]
struct ParsedBrush {
    line: usize,
    faces: Vec<BrushFace>,
}

/// One `{ ... }` entity block
#[derive(Debug)]
struct EntityBlock {
    line: usize,
    attributes: Vec<(String, String)>,
    brushes: Vec<ParsedBrush>,
}

impl EntityBlock {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    fn classname(&self) -> Option<&str> {
        self.attribute(CLASSNAME_KEY)
    }

    fn kind(&self) -> BlockKind {
        match (self.classname(), self.attribute(TYPE_KEY)) {
            (Some(GROUP_CLASSNAME), Some(LAYER_TYPE)) => BlockKind::Layer,
            (Some(GROUP_CLASSNAME), Some(GROUP_TYPE)) => BlockKind::Group,
            (Some(WORLDSPAWN_CLASSNAME), _) => BlockKind::Worldspawn,
            _ => BlockKind::Entity,
        }
    }

    /// Name and persistent id of a layer or group block
    fn name_and_id(&self) -> Result<(String, u64), String> {
        let name = self.attribute(NAME_KEY).map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err("missing name".to_string());
        }
        let id = self.attribute(ID_KEY).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err("missing id".to_string());
        }
        let id = parse_id(id).ok_or_else(|| format!("'{id}' is not a valid id"))?;
        Ok((name.to_string(), id))
    }

    /// Container named by the parent attributes, layer first, with the key used
    fn parent(&self) -> Option<(ParentRef, &'static str)> {
        let (key, value) = [LAYER_KEY, GROUP_KEY].into_iter().find_map(|key| {
            self.attribute(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        })?;
        match parse_id(value) {
            Some(id) if key == LAYER_KEY => Some((ParentRef::Layer(id), key)),
            Some(id) => Some((ParentRef::Group(id), key)),
            None => {
                log::warn!("Line {}: entity has invalid parent id '{}'", self.line, value);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Worldspawn,
    Layer,
    Group,
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentRef {
    Layer(u64),
    Group(u64),
}

/// A group or entity waiting for its container
#[derive(Debug)]
struct PendingNode {
    line: usize,
    parent: Option<ParentRef>,
    payload: PendingPayload,
    brushes: Vec<Brush>,
}

#[derive(Debug)]
enum PendingPayload {
    Group(u64, Group),
    Entity(Entity),
}

/// Assembles the tree; containers are matched to children by persistent id
struct TreeBuilder {
    tree: NodeTree,
    default_layer: NodeId,
    layers: HashMap<u64, NodeId>,
    groups: HashMap<u64, NodeId>,
    group_ids: HashSet<u64>,
    unresolved: Vec<PendingNode>,
}

impl TreeBuilder {
    fn new(world: World) -> Result<Self, ReadError> {
        let mut tree = NodeTree::with_world(world);
        let world = tree.world().ok_or(TreeError::MissingWorld)?;
        let default_layer = tree.add_child(world, Layer::new(DEFAULT_LAYER_NAME))?;
        Ok(Self {
            tree,
            default_layer,
            layers: HashMap::new(),
            groups: HashMap::new(),
            group_ids: HashSet::new(),
            unresolved: Vec::new(),
        })
    }

    fn add_block(&mut self, block: EntityBlock) -> Result<(), ReadError> {
        match block.kind() {
            BlockKind::Worldspawn => {
                let brushes = build_brushes(block.brushes);
                self.add_brushes(self.default_layer, brushes)
            }
            BlockKind::Layer => self.add_layer(block),
            BlockKind::Group => self.add_group(block),
            BlockKind::Entity => self.add_entity(block),
        }
    }

    fn add_layer(&mut self, block: EntityBlock) -> Result<(), ReadError> {
        let (name, id) = match block.name_and_id() {
            Ok(found) if self.layers.contains_key(&found.1) => {
                log::warn!("Line {}: skipping layer entity: layer with id '{}' already exists", block.line, found.1);
                return self.add_brushes(self.default_layer, build_brushes(block.brushes));
            }
            Ok(found) => found,
            Err(reason) => {
                log::warn!("Line {}: skipping layer entity: {}", block.line, reason);
                return self.add_brushes(self.default_layer, build_brushes(block.brushes));
            }
        };

        let mut layer = Layer::new(name);
        if let Some(sort_index) = block.attribute(LAYER_SORT_INDEX_KEY) {
            match sort_index.trim().parse() {
                Ok(sort_index) => layer.sort_index = sort_index,
                Err(_) => log::warn!("Line {}: ignoring layer sort index '{}'", block.line, sort_index),
            }
        }
        layer.locked = block.attribute(LAYER_LOCKED_KEY) == Some(FLAG_SET);
        layer.hidden = block.attribute(LAYER_HIDDEN_KEY) == Some(FLAG_SET);
        layer.omit_from_export = block.attribute(LAYER_OMIT_FROM_EXPORT_KEY) == Some(FLAG_SET);

        let world = self.tree.world().ok_or(TreeError::MissingWorld)?;
        let node = self.tree.add_child(world, layer)?;
        self.layers.insert(id, node);
        self.add_brushes(node, build_brushes(block.brushes))
    }

    fn add_group(&mut self, block: EntityBlock) -> Result<(), ReadError> {
        let (name, id) = match block.name_and_id() {
            Ok(found) if self.group_ids.contains(&found.1) => {
                log::warn!("Line {}: skipping group entity: group with id '{}' already exists", block.line, found.1);
                return self.add_brushes(self.default_layer, build_brushes(block.brushes));
            }
            Ok(found) => found,
            Err(reason) => {
                log::warn!("Line {}: skipping group entity: {}", block.line, reason);
                return self.add_brushes(self.default_layer, build_brushes(block.brushes));
            }
        };
        self.group_ids.insert(id);

        let pending = PendingNode {
            line: block.line,
            parent: block.parent().map(|(parent, _)| parent),
            payload: PendingPayload::Group(id, Group::new(name)),
            brushes: build_brushes(block.brushes),
        };
        self.store(pending)
    }

    fn add_entity(&mut self, block: EntityBlock) -> Result<(), ReadError> {
        let parent = block.parent();
        let stripped = parent.map(|(_, key)| key);

        let mut entity = Entity::new(block.classname().unwrap_or_default());
        if block.classname().is_none() {
            log::warn!("Line {}: entity has no classname", block.line);
        }
        for (key, value) in &block.attributes {
            if key != CLASSNAME_KEY && Some(key.as_str()) != stripped {
                entity.attributes.set(key.as_str(), value.as_str());
            }
        }

        let pending = PendingNode {
            line: block.line,
            parent: parent.map(|(parent, _)| parent),
            payload: PendingPayload::Entity(entity),
            brushes: build_brushes(block.brushes),
        };
        self.store(pending)
    }

    /// Insert `pending` if its container exists, otherwise queue it
    fn store(&mut self, pending: PendingNode) -> Result<(), ReadError> {
        let container = match pending.parent {
            None => Some(self.default_layer),
            Some(ParentRef::Layer(id)) => self.layers.get(&id).copied(),
            Some(ParentRef::Group(id)) => self.groups.get(&id).copied(),
        };
        match container {
            Some(container) => self.insert(container, pending),
            None => {
                self.unresolved.push(pending);
                Ok(())
            }
        }
    }

    fn insert(&mut self, container: NodeId, pending: PendingNode) -> Result<(), ReadError> {
        let node = match pending.payload {
            PendingPayload::Group(id, group) => {
                let node = self.tree.add_child(container, group)?;
                self.groups.insert(id, node);
                node
            }
            PendingPayload::Entity(entity) => self.tree.add_child(container, entity)?,
        };
        self.add_brushes(node, pending.brushes)
    }

    fn add_brushes(&mut self, container: NodeId, brushes: Vec<Brush>) -> Result<(), ReadError> {
        for brush in brushes {
            self.tree.add_child(container, brush)?;
        }
        Ok(())
    }

    /// Resolve children read before their containers
    fn finish(mut self) -> Result<NodeTree, ReadError> {
        while !self.unresolved.is_empty() {
            let pending = std::mem::take(&mut self.unresolved);
            let count = pending.len();
            for node in pending {
                self.store(node)?;
            }
            if self.unresolved.len() == count {
                let orphan = self.unresolved.remove(0);
                log::warn!(
                    "Line {}: container {:?} not found, adding to the default layer",
                    orphan.line,
                    orphan.parent
                );
                self.insert(self.default_layer, orphan)?;
            }
        }
        Ok(self.tree)
    }
}

fn build_brushes(parsed: Vec<ParsedBrush>) -> Vec<Brush> {
    parsed
        .into_iter()
        .filter_map(|brush| {
            let line = brush.line;
            let built = Brush::from_faces(brush.faces);
            if built.is_none() {
                log::warn!("Line {}: skipping brush: faces do not enclose a volume", line);
            }
            built
        })
        .collect()
}

fn parse_id(value: &str) -> Option<u64> {
    value.parse().ok().filter(|&id| id > 0)
}

fn parse_entities(text: &str) -> Result<Vec<EntityBlock>, ReadError> {
    let mut lines = Lines::new(text);
    let mut blocks = Vec::new();
    while let Some((line, content)) = lines.next_line() {
        if content != "{" {
            return Err(unexpected(line, "'{' opening an entity", content));
        }
        blocks.push(parse_entity(&mut lines, line)?);
    }
    Ok(blocks)
}

fn parse_entity(lines: &mut Lines<'_>, start: usize) -> Result<EntityBlock, ReadError> {
    let mut block = EntityBlock {
        line: start,
        attributes: Vec::new(),
        brushes: Vec::new(),
    };
    loop {
        let (line, content) = lines.next_line().ok_or(ReadError::Unterminated {
            line: start,
            block: "entity",
        })?;
        match content {
            "}" => return Ok(block),
            "{" => block.brushes.push(parse_brush(lines, line)?),
            _ if content.starts_with('"') => block.attributes.push(parse_attribute(line, content)?),
            _ => return Err(unexpected(line, "an attribute, a brush or '}'", content)),
        }
    }
}

fn parse_brush(lines: &mut Lines<'_>, start: usize) -> Result<ParsedBrush, ReadError> {
    let mut faces = Vec::new();
    loop {
        let (line, content) = lines.next_line().ok_or(ReadError::Unterminated {
            line: start,
            block: "brush",
        })?;
        if content == "}" {
            return Ok(ParsedBrush { line: start, faces });
        }
        faces.push(parse_face(line, content)?);
    }
}

fn parse_attribute(line: usize, content: &str) -> Result<(String, String), ReadError> {
    let malformed = || unexpected(line, "an attribute '\"key\" \"value\"'", content);
    let rest = content.strip_prefix('"').ok_or_else(malformed)?;
    let (key, rest) = rest.split_once('"').ok_or_else(malformed)?;
    let value = rest
        .trim_start()
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_face(line: usize, content: &str) -> Result<BrushFace, ReadError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let ["(", x, y, z, ")", distance, texture] = tokens.as_slice() else {
        return Err(unexpected(line, "a face '( x y z ) distance texture'", content));
    };
    let normal = Vec3::new(number(line, x)?, number(line, y)?, number(line, z)?);
    Ok(BrushFace::new(normal, number(line, distance)?, *texture))
}

fn number(line: usize, token: &str) -> Result<f32, ReadError> {
    token.parse().map_err(|_| ReadError::InvalidNumber {
        line,
        value: token.to_string(),
    })
}

fn unexpected(line: usize, expected: &'static str, found: &str) -> ReadError {
    ReadError::Unexpected {
        line,
        expected,
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::NodeWriter;
    use crate::model::{default_map, FaceRef, NodeKind, NodeType};

    fn cube(min: f32, texture: &str) -> Brush {
        Brush::cuboid(Vec3::new(min, min, min), Vec3::new(min + 16.0, min + 16.0, 32.5), texture)
    }

    fn write(tree: &NodeTree) -> String {
        let mut writer = NodeWriter::new(tree, String::new());
        writer.write_map().unwrap();
        writer.into_inner()
    }

    fn child_of_type(tree: &NodeTree, parent: NodeId, node_type: NodeType) -> NodeId {
        tree.children(parent)
            .iter()
            .copied()
            .find(|&child| tree[child].node_type() == node_type)
            .unwrap()
    }

    fn sample() -> NodeTree {
        let mut tree = default_map("e1m1");
        let world = tree.world().unwrap();
        let default_layer = tree.default_layer().unwrap();
        tree.add_child(default_layer, cube(-64.0, "base/floor")).unwrap();
        tree.add_child(default_layer, Entity::new("info_player_start").with_attribute("origin", "0 0 24"))
            .unwrap();

        let mut detail = Layer::new("Detail");
        detail.sort_index = 1;
        detail.locked = true;
        let detail = tree.add_child(world, detail).unwrap();
        let outer = tree.add_child(detail, Group::new("stairs")).unwrap();
        tree.add_child(outer, cube(0.0, "base/step")).unwrap();
        let inner = tree.add_child(outer, Group::new("rail")).unwrap();
        let door = tree
            .add_child(inner, Entity::new("func_door").with_attribute("speed", "100"))
            .unwrap();
        tree.add_child(door, cube(8.0, "base/door")).unwrap();
        tree.add_child(door, cube(-8.0, "base/door_frame")).unwrap();

        let mut notes = Layer::new("Notes");
        notes.sort_index = 2;
        notes.hidden = true;
        notes.omit_from_export = true;
        let notes = tree.add_child(world, notes).unwrap();
        tree.add_child(notes, Entity::new("info_note").with_attribute("message", "two words"))
            .unwrap();
        tree
    }

    #[test]
    fn test_written_map_reads_back_identically() {
        let text = write(&sample());
        let tree = NodeReader::new(&text).read_map("e1m1").unwrap();
        assert_eq!(write(&tree), text);
    }

    #[test]
    fn test_read_rebuilds_hierarchy() {
        let text = write(&sample());
        let tree = NodeReader::new(&text).read_map("e1m1").unwrap();

        let world = tree.world().unwrap();
        assert_eq!(tree[world].as_world().map(|world| world.name.as_str()), Some("e1m1"));
        let layers = tree.layers();
        assert_eq!(layers.len(), 3);

        let default_layer = layers[0];
        assert_eq!(tree[default_layer].as_layer().unwrap().name, DEFAULT_LAYER_NAME);
        assert_eq!(tree.children(default_layer).len(), 2);

        let detail = tree[layers[1]].as_layer().unwrap();
        assert_eq!((detail.name.as_str(), detail.sort_index, detail.locked, detail.hidden), ("Detail", 1, true, false));
        let notes = tree[layers[2]].as_layer().unwrap();
        assert!(notes.hidden && notes.omit_from_export && !notes.locked);

        let outer = child_of_type(&tree, layers[1], NodeType::Group);
        let inner = child_of_type(&tree, outer, NodeType::Group);
        let door = child_of_type(&tree, inner, NodeType::Entity);
        assert_eq!(tree.children(outer).len(), 2);
        assert_eq!(tree.children(door).len(), 2);

        let NodeKind::Entity(entity) = tree[door].kind() else {
            panic!("expected an entity");
        };
        assert_eq!(entity.classname, "func_door");
        assert_eq!(entity.attributes.get("speed"), Some("100"));
        assert_eq!(entity.attributes.get(GROUP_KEY), None);
        assert_eq!(entity.attributes.len(), 1);
    }

    #[test]
    fn test_children_before_containers_are_resolved() {
        let text = "\
{
\"classname\" \"worldspawn\"
\"message\" \"late containers\"
}
{
\"classname\" \"light\"
\"_tb_group\" \"7\"
}
{
\"classname\" \"func_group\"
\"_tb_type\" \"_tb_group\"
\"_tb_name\" \"lamps\"
\"_tb_id\" \"7\"
\"_tb_layer\" \"3\"
}
{
\"classname\" \"func_group\"
\"_tb_type\" \"_tb_layer\"
\"_tb_name\" \"Lighting\"
\"_tb_id\" \"3\"
}
";
        let tree = NodeReader::new(text).read_map("late").unwrap();

        let world = tree.world().unwrap();
        assert_eq!(tree[world].as_world().unwrap().attributes.get("message"), Some("late containers"));
        let lighting = tree.layers()[1];
        let lamps = child_of_type(&tree, lighting, NodeType::Group);
        let light = child_of_type(&tree, lamps, NodeType::Entity);
        let NodeKind::Entity(entity) = tree[light].kind() else {
            panic!("expected an entity");
        };
        assert!(entity.attributes.is_empty());
    }

    #[test]
    fn test_unusable_containers_fall_back_to_default_layer() {
        let text = "\
{
\"classname\" \"func_group\"
\"_tb_type\" \"_tb_layer\"
\"_tb_name\" \"Broken\"
\"_tb_id\" \"0\"
{
( -1 0 0 ) 0 base/a
( 1 0 0 ) 8 base/a
( 0 -1 0 ) 0 base/a
( 0 1 0 ) 8 base/a
( 0 0 -1 ) 0 base/a
( 0 0 1 ) 8 base/a
}
}
{
\"classname\" \"info_null\"
\"_tb_layer\" \"42\"
}
{
\"classname\" \"info_target\"
\"_tb_group\" \"nope\"
}
";
        let tree = NodeReader::new(text).read_map("broken").unwrap();

        assert_eq!(tree.layers().len(), 1);
        let default_layer = tree.default_layer().unwrap();
        let children = tree.children(default_layer);
        let types: Vec<_> = children.iter().map(|&child| tree[child].node_type()).collect();
        assert_eq!(types, [NodeType::Brush, NodeType::Entity, NodeType::Entity]);

        // an invalid id is kept, an id that resolves to nothing is stripped
        let attributes = |id: NodeId| match tree[id].kind() {
            NodeKind::Entity(entity) => entity.attributes.clone(),
            _ => panic!("expected an entity"),
        };
        assert_eq!(attributes(children[1]).get(GROUP_KEY), Some("nope"));
        assert_eq!(attributes(children[2]).get(LAYER_KEY), None);
    }

    #[test]
    fn test_open_brush_is_skipped() {
        let text = "\
{
\"classname\" \"worldspawn\"
{
( 0 0 -1 ) 0 base/a
( 0 0 1 ) 8 base/a
}
}
";
        let tree = NodeReader::new(text).read_map("open").unwrap();
        assert!(tree.children(tree.default_layer().unwrap()).is_empty());
    }

    #[test]
    fn test_syntax_errors_carry_line_numbers() {
        let unterminated = "// entity 0\n{\n\"classname\" \"worldspawn\"\n{\n( 1 0 0 ) 8 a\n";
        assert_eq!(
            NodeReader::new(unterminated).read_map("x").unwrap_err(),
            ReadError::Unterminated { line: 4, block: "brush" }
        );

        let bad_number = "{\n{\n( 1 zero 0 ) 8 a\n}\n}\n";
        assert_eq!(
            NodeReader::new(bad_number).read_map("x").unwrap_err(),
            ReadError::InvalidNumber { line: 3, value: "zero".to_string() }
        );

        let stray = "{\n\"classname\" \"worldspawn\"\n}\nworldspawn\n";
        assert!(matches!(
            NodeReader::new(stray).read_map("x"),
            Err(ReadError::Unexpected { line: 4, .. })
        ));

        let half_attribute = "{\n\"classname\" worldspawn\n}\n";
        assert!(matches!(
            NodeReader::new(half_attribute).read_map("x"),
            Err(ReadError::Unexpected { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_brush_faces() {
        let mut tree = default_map("faces");
        let layer = tree.default_layer().unwrap();
        let brush = tree.add_child(layer, cube(0.0, "base/wall")).unwrap();
        let mut writer = NodeWriter::new(&tree, String::new());
        writer
            .write_brush_faces(&[FaceRef::new(brush, 0), FaceRef::new(brush, 5)])
            .unwrap();
        let text = writer.into_inner();

        let faces = NodeReader::new(&text).read_brush_faces().unwrap();
        let expected = tree[brush].as_brush().unwrap().faces();
        assert_eq!(faces, [expected[0].clone(), expected[5].clone()]);
    }
}
