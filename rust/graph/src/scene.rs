// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output scene graph types.
//!
//! Everything in this module is renderer-ready and serializable: nodes own
//! their children, meshes and materials live in scene-wide arrays and are
//! referenced by index. Indices are stable once assigned — the arrays are
//! append-only during construction.

use std::path::PathBuf;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use cad_scene_model::{MappingMode, WrapMode};

// --- Metadata keys ---

/// Key of the nested material-properties bag on a node.
pub const META_MATERIAL: &str = "Material";
/// Key of the material density inside the [`META_MATERIAL`] bag.
pub const META_MATERIAL_DENSITY: &str = "MaterialDensity";
/// Key of the material name inside the [`META_MATERIAL`] bag.
pub const META_MATERIAL_NAME: &str = "MaterialName";
/// Root-node key carrying the source-unit → mm scale factor.
pub const META_UNIT_FACTOR: &str = "UnitFactor";
/// Root-node key carrying the source-format tag.
pub const META_SOURCE_FORMAT: &str = "SourceFormat";

/// Typed metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Int(i64),
    Double(f64),
    String(String),
    Bag(Metadata),
}

/// Ordered key/value bag attached to output nodes.
///
/// Keys are not required to be unique; entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn add(&mut self, key: impl Into<String>, value: MetaValue) {
        self.entries.push((key.into(), value));
    }

    /// First value stored under the key, if any.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// --- Texture references ---

/// How texture coordinates are generated, as published to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureMapping {
    #[default]
    None,
    Planar,
    Cylindrical,
    Spherical,
    Cubical,
}

impl From<MappingMode> for TextureMapping {
    fn from(mode: MappingMode) -> Self {
        match mode {
            MappingMode::None => TextureMapping::None,
            MappingMode::Planar => TextureMapping::Planar,
            MappingMode::Cylindrical => TextureMapping::Cylindrical,
            MappingMode::Spherical => TextureMapping::Spherical,
            MappingMode::Cubical => TextureMapping::Cubical,
        }
    }
}

/// Per-axis wrap behavior, as published to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureWrap {
    #[default]
    Repeat,
    Clamp,
}

impl From<WrapMode> for TextureWrap {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Repeat => TextureWrap::Repeat,
            WrapMode::Clamp => TextureWrap::Clamp,
        }
    }
}

/// 2-D texture transform decomposed from raw matrix coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureTransform {
    pub translation: [f64; 2],
    pub scale: [f64; 2],
    /// Rotation about the uv origin, radians.
    pub rotation: f64,
}

/// One flattened texture reference on an output material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTexture {
    /// Slot number, chain order starting at 0.
    pub slot: u32,
    /// Source texture-definition index.
    pub definition: u32,
    /// Source picture index.
    pub picture: u32,
    /// Path the image was exported under. Recorded whenever the picture
    /// record existed, even if writing the file failed.
    pub path: Option<PathBuf>,
    pub mapping: TextureMapping,
    pub wrap_u: TextureWrap,
    pub wrap_v: TextureWrap,
    /// Decomposed uv transform, when the definition carried one.
    pub transform: Option<TextureTransform>,
    pub alpha_test: bool,
}

// --- Materials ---

/// Flattened output material.
///
/// Built once per source style index and shared by every mesh that
/// resolved to that style. Absent properties stay `None` — a lookup that
/// missed during construction leaves its property unset rather than
/// inventing a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMaterial {
    pub name: Option<String>,
    /// RGBA colors, alpha from the source record's per-channel alpha.
    pub ambient: Option<[f64; 4]>,
    pub diffuse: Option<[f64; 4]>,
    pub emissive: Option<[f64; 4]>,
    pub specular: Option<[f64; 4]>,
    pub shininess: Option<f64>,
    /// Set when the source style culls neither face.
    pub two_sided: bool,
    /// [0, 1], present only when the source style defines transparency.
    pub opacity: Option<f64>,
    pub textures: Vec<SceneTexture>,
    /// Named factors copied through verbatim from material attributes.
    pub alpha_mode: Option<i64>,
    pub alpha_cutoff: Option<f64>,
    pub metallic_factor: Option<f64>,
    pub normal_texture_factor: Option<f64>,
    pub occlusion_texture_factor: Option<f64>,
    pub roughness_factor: Option<f64>,
}

// --- Meshes ---

/// Indexed triangle mesh, one material per mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMesh {
    /// Vertex positions (x, y, z).
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz).
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v); empty when the source carried none.
    pub texcoords: Vec<f32>,
    /// Triangle indices (i0, i1, i2).
    pub indices: Vec<u32>,
    /// Index into [`Scene::materials`].
    pub material: u32,
}

impl SceneMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// --- Nodes ---

/// One node of the output hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Local transform relative to the parent node.
    pub transform: Matrix4<f64>,
    /// Absent rather than empty when the source carried no metadata.
    pub metadata: Option<Metadata>,
    /// Indices into [`Scene::meshes`].
    pub meshes: Vec<u32>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Node with the given name, identity transform and nothing attached.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            metadata: None,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

// --- Scene ---

/// The finished scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Model name, when the source file carried one.
    pub name: Option<String>,
    pub root: SceneNode,
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
}

impl Scene {
    /// Empty scene whose root node carries the given name.
    pub fn new(name: Option<String>) -> Self {
        let root = SceneNode::new(name.clone().unwrap_or_default());
        Self {
            name,
            root,
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Appends a mesh, returning its index.
    pub(crate) fn add_mesh(&mut self, mesh: SceneMesh) -> u32 {
        self.meshes.push(mesh);
        (self.meshes.len() - 1) as u32
    }

    /// Appends a material, returning its index.
    pub(crate) fn add_material(&mut self, material: SceneMaterial) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    /// Total node count, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}
