//! Map inspector
//!
//! Reads a map file or builds a sample map, applies a selection, prints how
//! the renderer partitions it and writes the map text.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use map_engine::editor::UNNAMED_MAP;
use map_engine::foundation::logging;
use map_engine::prelude::*;

const DEFAULT_LOG_FILTER: &str = "info";

/// Nodes of the sample map worth pointing at
struct SampleMap {
    pillar: NodeId,
    floor: NodeId,
    stairs: NodeId,
}

fn main() -> Result<()> {
    let matches = Command::new("map_inspect")
        .about("Inspects the render partition of a map and writes it as map text")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Map file to inspect instead of the built-in sample"),
        )
        .arg(
            Arg::new("preferences")
                .short('p')
                .long("preferences")
                .value_name("FILE")
                .help("Preference file (.toml or .ron)"),
        )
        .arg(
            Arg::new("save-preferences")
                .long("save-preferences")
                .value_name("FILE")
                .help("Write the effective preferences to FILE"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the map text to FILE instead of stdout"),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .action(ArgAction::SetTrue)
                .help("Leave out layers marked as omitted from export"),
        )
        .arg(
            Arg::new("select-faces")
                .long("select-faces")
                .action(ArgAction::SetTrue)
                .help("Select a brush face of the sample instead of whole nodes"),
        )
        .get_matches();

    logging::try_init_with_default(DEFAULT_LOG_FILTER);

    let preferences = match matches.get_one::<String>("preferences") {
        Some(path) => Preferences::load_from_file(path)
            .with_context(|| format!("Failed to load preferences from {path}"))?,
        None => Preferences::default(),
    };
    if let Some(path) = matches.get_one::<String>("save-preferences") {
        preferences
            .save_to_file(path)
            .with_context(|| format!("Failed to save preferences to {path}"))?;
        log::info!("Saved preferences to {}", path);
    }

    let mut editor = Editor::new(preferences);
    match matches.get_one::<String>("input") {
        Some(path) => {
            let path = PathBuf::from(path);
            let text = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path.file_stem().map_or_else(|| UNNAMED_MAP.into(), |stem| stem.to_string_lossy());
            let tree = NodeReader::new(&text)
                .read_map(&name)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            editor.load_document(tree);
            log::info!("Loaded {} nodes from {}", editor.tree().len(), path.display());
        }
        None => {
            let sample = build_sample_map(&mut editor).context("Failed to build the sample map")?;
            if matches.get_flag("select-faces") {
                editor.select_faces(&[FaceRef::new(sample.floor, 5)])?;
            } else {
                editor.select_nodes(&[sample.pillar, sample.stairs])?;
            }
        }
    }

    print_partition(&editor);

    let mut queue = RenderQueue::new();
    editor.render(&RenderContext::default(), &mut queue);
    println!(
        "frame: {} commands, {} batches, {} draw items",
        queue.commands().len(),
        queue.batch_count(),
        queue.total_item_count()
    );

    let mut writer = NodeWriter::new(editor.tree(), String::new());
    writer.set_exporting(matches.get_flag("export"));
    writer.write_map()?;
    let text = writer.into_inner();

    match matches.get_one::<String>("output") {
        Some(path) => {
            let path = PathBuf::from(path);
            std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote map to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn build_sample_map(editor: &mut Editor) -> Result<SampleMap, TreeError> {
    let world = editor.tree().world().ok_or(TreeError::MissingWorld)?;
    let default_layer = editor.tree().default_layer().ok_or(TreeError::MissingWorld)?;

    let floor = editor.add_node(
        default_layer,
        Brush::cuboid(Vec3::new(-256.0, -256.0, -16.0), Vec3::new(256.0, 256.0, 0.0), "base/floor"),
    )?;
    let pillar = editor.add_node(
        default_layer,
        Brush::cuboid(Vec3::new(-16.0, -16.0, 0.0), Vec3::new(16.0, 16.0, 128.0), "base/pillar"),
    )?;
    editor.add_node(
        default_layer,
        Entity::new("info_player_start").with_attribute("origin", "0 -128 24"),
    )?;

    let mut detail = Layer::new("Detail");
    detail.sort_index = 1;
    let detail = editor.add_node(world, detail)?;
    let stairs = editor.add_node(detail, Group::new("stairs"))?;
    for step in 0..3u8 {
        let height = f32::from(step) * 8.0;
        editor.add_node(
            stairs,
            Brush::cuboid(
                Vec3::new(64.0 + height * 2.0, -32.0, 0.0),
                Vec3::new(80.0 + height * 2.0, 32.0, height + 8.0),
                "base/step",
            ),
        )?;
    }
    let light = editor.add_node(stairs, Entity::new("light").with_attribute("origin", "72 0 64"))?;
    editor.add_node(light, Brush::cuboid(Vec3::new(68.0, -4.0, 60.0), Vec3::new(76.0, 4.0, 68.0), "base/lamp"))?;

    let mut notes = Layer::new("Notes");
    notes.sort_index = 2;
    notes.omit_from_export = true;
    let notes = editor.add_node(world, notes)?;
    editor.add_node(notes, Entity::new("info_note").with_attribute("message", "check the stairs"))?;

    Ok(SampleMap { pillar, floor, stairs })
}

fn print_partition(editor: &Editor) {
    let tree = editor.tree();
    let renderer = editor.renderer();
    for (layer, batch) in renderer.layer_batches() {
        let name = tree.get(layer).and_then(|node| node.as_layer()).map_or("?", |layer| layer.name.as_str());
        println!("layer {name:?}: {} objects", batch.object_count());
    }
    println!("selection: {} objects", renderer.selection_batch().object_count());
    for id in renderer.selection_batch().object_ids() {
        let node = &tree[id];
        println!(
            "  {:?} {:?}{}",
            node.node_type(),
            id,
            if node.selected() { "" } else { " (partially selected)" }
        );
    }
}
