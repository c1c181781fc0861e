//! CAD-Scene Graph Construction
//!
//! Converts in-memory CAD assembly models into renderer-ready scene
//! graphs: a node hierarchy with composed transforms, welded triangle
//! meshes deduplicated across instances, and resolved materials with
//! optional texture chains.
//!
//! ```
//! use cad_scene_model::{Model, Node, NodeKind, Occurrence};
//! use cad_scene_graph::{build_scene, SceneConfig};
//!
//! let mut model = Model::new();
//! let root = model.add_node(
//!     Node::new(NodeKind::Occurrence(Occurrence::default())).with_name("assembly"),
//! );
//! model.add_root(root);
//!
//! let scene = build_scene(&model, &SceneConfig::default());
//! assert_eq!(scene.root.children[0].name, "assembly");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod instance;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use builder::{build_scene, SceneBuilder};
pub use config::SceneConfig;
pub use error::{Error, Result};
pub use instance::{display_name, net_removed, net_show, net_style, InstancePath};
pub use material::MaterialResolver;
pub use mesh::MeshFactory;
pub use scene::{
    MetaValue, Metadata, Scene, SceneMaterial, SceneMesh, SceneNode, SceneTexture, TextureMapping,
    TextureTransform, TextureWrap, META_MATERIAL, META_MATERIAL_DENSITY, META_MATERIAL_NAME,
    META_SOURCE_FORMAT, META_UNIT_FACTOR,
};
pub use texture::{decompose_transform, picture_file_name, write_picture};
pub use transform::node_matrix;
