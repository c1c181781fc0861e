// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use cad_scene_graph::{
    build_scene, MetaValue, Scene, SceneConfig, META_SOURCE_FORMAT, META_UNIT_FACTOR,
};
use cad_scene_model::{
    CartesianTransform, MaterialData, Model, Node, NodeKey, NodeKind, Occurrence, PartDefinition,
    Picture, PictureFormat, RepresentationItem, SourceFormat, StyleData, TessFace, Tessellation,
    TextureApplication, TextureDefinition, DEFAULT_MATERIAL_INDEX,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Unit quad as two triangles sharing one edge.
fn quad() -> Tessellation {
    let mut tessellation = Tessellation {
        positions: vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        normals: vec![0.0, 0.0, 1.0],
        ..Tessellation::default()
    };
    tessellation.faces.push(TessFace::new(
        vec![0, 3, 6, 0, 6, 9],
        vec![0, 0, 0, 0, 0, 0],
    ));
    tessellation
}

fn solid_item(model: &mut Model, name: &str) -> NodeKey {
    model.add_node(
        Node::new(NodeKind::RepresentationItem(RepresentationItem::solid(
            Some(quad()),
        )))
        .with_name(name),
    )
}

fn part_of(model: &mut Model, items: Vec<NodeKey>) -> NodeKey {
    model.add_node(Node::new(NodeKind::PartDefinition(PartDefinition { items })))
}

fn placed_occurrence(model: &mut Model, name: &str, part: NodeKey, x: f64) -> NodeKey {
    let location = model.add_node(Node::new(NodeKind::CartesianTransform(
        CartesianTransform {
            origin: [x, 0.0, 0.0],
            ..CartesianTransform::default()
        },
    )));
    let occurrence = model.add_node(
        Node::new(NodeKind::Occurrence(Occurrence {
            location: Some(location),
            part: Some(part),
            ..Occurrence::default()
        }))
        .with_name(name),
    );
    model.add_root(occurrence);
    occurrence
}

#[test]
fn assembly_builds_into_a_complete_scene() {
    init_tracing();

    let mut model = Model::new();
    model.name = Some("fixture".to_string());
    model.unit_factor = 0.001;
    model.format = SourceFormat::Step;
    let item = solid_item(&mut model, "plate");
    let part = part_of(&mut model, vec![item]);
    placed_occurrence(&mut model, "base", part, 2.0);

    let scene = build_scene(&model, &SceneConfig::default());

    assert_eq!(scene.name.as_deref(), Some("fixture"));
    assert_eq!(scene.node_count(), 4);

    let metadata = scene.root.metadata.as_ref().expect("root metadata");
    assert_eq!(metadata.get(META_UNIT_FACTOR), Some(&MetaValue::Double(0.001)));
    assert_eq!(
        metadata.get(META_SOURCE_FORMAT),
        Some(&MetaValue::Int(SourceFormat::Step.tag()))
    );

    let occurrence = &scene.root.children[0];
    assert_eq!(occurrence.name, "base");
    assert_relative_eq!(occurrence.transform[(0, 3)], 2.0);

    let item_node = &occurrence.children[0].children[0];
    assert_eq!(item_node.name, "plate");
    assert_eq!(item_node.meshes.len(), 1);

    let mesh = &scene.meshes[item_node.meshes[0] as usize];
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(scene.materials.len(), 1);
}

#[test]
fn instances_share_meshes_until_styles_diverge() {
    init_tracing();

    let mut model = Model::new();
    let red = model.graphics.add_color(1.0, 0.0, 0.0);
    let item = solid_item(&mut model, "bolt");
    let part = part_of(&mut model, vec![item]);
    placed_occurrence(&mut model, "first", part, 0.0);
    placed_occurrence(&mut model, "second", part, 1.0);
    let third = placed_occurrence(&mut model, "third", part, 2.0);
    if let Some(node) = model.node_mut(third) {
        node.style = Some(StyleData::rgb(red));
    }

    let scene = build_scene(&model, &SceneConfig::default());

    let mesh_of = |index: usize| scene.root.children[index].children[0].children[0].meshes.clone();
    assert_eq!(mesh_of(0), mesh_of(1));
    assert_ne!(mesh_of(0), mesh_of(2));
    // Two styles, two welded copies of the quad.
    assert_eq!(scene.meshes.len(), 2);
    assert_eq!(scene.materials.len(), 2);
}

#[test]
fn textures_export_next_to_the_scene() {
    init_tracing();

    let texture_dir = std::env::temp_dir().join(format!(
        "cad-scene-graph-it-{}",
        std::process::id()
    ));
    fs::create_dir_all(&texture_dir).expect("create texture dir");

    let mut model = Model::new();
    let diffuse = model.graphics.add_color(0.8, 0.8, 0.8);
    let record = model.graphics.add_material(MaterialData {
        name: Some("decal".to_string()),
        ambient: diffuse,
        diffuse,
        emissive: diffuse,
        specular: diffuse,
        diffuse_alpha: 1.0,
        ..MaterialData::default()
    });
    let picture = model.graphics.add_picture(Picture {
        format: PictureFormat::Png,
        width: 1,
        height: 1,
        data: vec![0x89, 0x50, 0x4e, 0x47],
    });
    let definition = model.graphics.add_texture_definition(TextureDefinition {
        picture,
        ..TextureDefinition::default()
    });
    let application = model.graphics.add_texture_application(TextureApplication {
        definition,
        material: record,
        next: DEFAULT_MATERIAL_INDEX,
    });
    let item = model.add_node(
        Node::new(NodeKind::RepresentationItem(RepresentationItem::solid(
            Some(quad()),
        )))
        .with_style(StyleData::material(application)),
    );
    let part = part_of(&mut model, vec![item]);
    placed_occurrence(&mut model, "textured", part, 0.0);

    let config = SceneConfig {
        texture_dir: texture_dir.clone(),
        ..SceneConfig::default()
    };
    let scene = build_scene(&model, &config);

    assert_eq!(scene.materials.len(), 1);
    let material = &scene.materials[0];
    assert_eq!(material.name.as_deref(), Some("decal"));
    assert_eq!(material.textures.len(), 1);

    let exported: PathBuf = material.textures[0].path.clone().expect("texture path");
    assert_eq!(
        exported.file_name().and_then(|n| n.to_str()),
        Some("texture0.png")
    );
    let written = fs::read(&exported).expect("exported picture");
    assert_eq!(written, vec![0x89, 0x50, 0x4e, 0x47]);

    let _ = fs::remove_dir_all(&texture_dir);
}

#[test]
fn mutual_occurrence_cycles_terminate() {
    init_tracing();

    let mut model = Model::new();
    let first = model.add_node(
        Node::new(NodeKind::Occurrence(Occurrence::default())).with_name("ping"),
    );
    let second = model.add_node(
        Node::new(NodeKind::Occurrence(Occurrence {
            children: vec![first],
            ..Occurrence::default()
        }))
        .with_name("pong"),
    );
    if let Some(node) = model.node_mut(first) {
        if let NodeKind::Occurrence(data) = &mut node.kind {
            data.children.push(second);
        }
    }
    model.add_root(first);

    let scene = build_scene(&model, &SceneConfig::default());

    // ping -> pong, then the back edge to ping is skipped.
    let ping = &scene.root.children[0];
    assert_eq!(ping.name, "ping");
    assert_eq!(ping.children.len(), 1);
    assert_eq!(ping.children[0].name, "pong");
    assert!(ping.children[0].children.is_empty());
}

#[test]
fn scenes_round_trip_through_json() {
    init_tracing();

    let mut model = Model::new();
    model.name = Some("serialized".to_string());
    let item = solid_item(&mut model, "panel");
    let part = part_of(&mut model, vec![item]);
    placed_occurrence(&mut model, "only", part, 3.5);

    let scene = build_scene(&model, &SceneConfig::default());
    let json = serde_json::to_string(&scene).expect("serialize scene");
    let back: Scene = serde_json::from_str(&json).expect("deserialize scene");

    assert_eq!(back.name, scene.name);
    assert_eq!(back.node_count(), scene.node_count());
    assert_eq!(back.meshes.len(), scene.meshes.len());
    assert_relative_eq!(back.root.children[0].transform[(0, 3)], 3.5);
}
