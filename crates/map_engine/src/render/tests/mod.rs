//! Scenario tests for the render partition


use super::MapRenderer;
use crate::config::Preferences;
use crate::foundation::math::Vec3;
use crate::model::{Brush, Entity, Group, Layer, MapDocument, NodeId, NodeType};

/// A document with a renderer loaded from it
///
/// ```text
/// world
///  ├─ default layer
///  │   ├─ first (brush)
///  │   ├─ second (brush)
///  │   └─ group
///  │       ├─ grouped (brush)
///  │       └─ door (entity)
///  │           └─ door_brush (brush)
///  └─ detail layer
///      └─ detail (brush)
/// ```
pub(super) struct Fixture {
    pub doc: MapDocument,
    pub renderer: MapRenderer,
    pub default_layer: NodeId,
    pub detail_layer: NodeId,
    pub first: NodeId,
    pub second: NodeId,
    pub group: NodeId,
    pub grouped: NodeId,
    pub door: NodeId,
    pub door_brush: NodeId,
    pub detail: NodeId,
}

pub(super) fn cube(offset: f32) -> Brush {
    Brush::cuboid(
        Vec3::new(offset, 0.0, 0.0),
        Vec3::new(offset + 32.0, 32.0, 32.0),
        "base/wall",
    )
}

pub(super) fn fixture() -> Fixture {
    let mut doc = MapDocument::new_map("scenario");
    let tree = doc.tree_mut();
    let world = tree.world().unwrap();
    let default_layer = tree.default_layer().unwrap();
    let first = tree.add_child(default_layer, cube(0.0)).unwrap();
    let second = tree.add_child(default_layer, cube(64.0)).unwrap();
    let group = tree.add_child(default_layer, Group::new("room")).unwrap();
    let grouped = tree.add_child(group, cube(128.0)).unwrap();
    let door = tree.add_child(group, Entity::new("func_door")).unwrap();
    let door_brush = tree.add_child(door, cube(192.0)).unwrap();
    let detail_layer = tree.add_child(world, Layer::new("Detail")).unwrap();
    let detail = tree.add_child(detail_layer, cube(256.0)).unwrap();

    let mut renderer = MapRenderer::new(&doc, &Preferences::default());
    renderer.document_loaded(&doc);

    Fixture {
        doc,
        renderer,
        default_layer,
        detail_layer,
        first,
        second,
        group,
        grouped,
        door,
        door_brush,
        detail,
    }
}

/// Check the placement of every renderable node against its selection state
pub(super) fn assert_partition(doc: &MapDocument, renderer: &MapRenderer) {
    let tree = doc.tree();
    let Some(world) = tree.world() else {
        return;
    };
    for id in tree.subtree(world) {
        let node = &tree[id];
        if !node.node_type().is_object() {
            continue;
        }
        let layer = tree.layer_of(id).unwrap();
        let in_layer = renderer.layer_batch(layer).unwrap().contains(id);
        let in_selection = renderer.selection_batch().contains(id);
        let highlighted = node.selected() || node.descendant_selected();

        for (other, batch) in renderer.layer_batches() {
            if other != layer {
                assert!(!batch.contains(id), "{id:?} is in a foreign layer batch");
            }
        }
        assert_eq!(in_selection, highlighted, "selection membership of {id:?}");
        if node.node_type() == NodeType::Brush {
            assert_eq!(in_layer, !node.selected(), "layer membership of brush {id:?}");
        } else {
            assert_eq!(in_layer, !highlighted, "layer membership of {id:?}");
        }
    }
}
