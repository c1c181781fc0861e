// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CAD-Scene Model
//!
//! In-memory representation of a hierarchical CAD assembly, as produced by
//! an upstream CAD kernel after loading a native file. This crate is the
//! contract between that kernel and the
//! [cad-scene-graph](https://docs.rs/cad-scene-graph) conversion engine:
//! the kernel populates a [`Model`], the engine turns it into a
//! renderer-ready scene graph.
//!
//! ## Overview
//!
//! - **Node arena**: every assembly node (occurrence, part definition,
//!   representation item, coordinate system, transform) lives in a
//!   [slotmap](https://docs.rs/slotmap) arena under a stable [`NodeKey`].
//! - **Closed node kinds**: [`NodeKind`] is a closed sum type — consumers
//!   dispatch with `match`, never by runtime type tags.
//! - **Tessellation buffers**: flat position/normal/texcoord arrays with
//!   per-face corner index triples, exactly as the kernel emitted them.
//! - **Graphics store**: the model-global color/material/texture/picture
//!   tables that style descriptors index into.
//! - **Display overrides**: per-node and per-face show/removed/style
//!   overrides, resolved along instance paths by the conversion engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use cad_scene_model::{Model, Node, NodeKind, Occurrence,
//!     PartDefinition, RepresentationItem};
//!
//! let mut model = Model::new();
//! let item = model.add_node(Node::new(NodeKind::RepresentationItem(
//!     RepresentationItem::solid(None),
//! )));
//! let part = model.add_node(Node::new(NodeKind::PartDefinition(
//!     PartDefinition { items: vec![item] },
//! )));
//! let occurrence = model.add_node(Node::new(NodeKind::Occurrence(Occurrence {
//!     part: Some(part),
//!     ..Occurrence::default()
//! })));
//! model.add_root(occurrence);
//!
//! assert_eq!(model.node_count(), 3);
//! assert_eq!(model.occurrence_part(occurrence), Some(part));
//! ```

pub mod attribute;
pub mod graphics;
pub mod key;
pub mod model;
pub mod node;
pub mod style;
pub mod tess;

pub use attribute::{Attribute, AttributeEntry, AttributeTitle, AttributeValue, MaterialProperties};
pub use graphics::{
    GraphicsStore, MappingMode, MaterialData, MaterialEntry, Picture, PictureFormat, RgbColor,
    TextureApplication, TextureDefinition, WrapMode,
};
pub use key::NodeKey;
pub use model::{Model, SourceFormat};
pub use node::{
    CartesianTransform, CoordinateSystem, GeneralTransform, ItemBody, Node, NodeKind, Occurrence,
    PartDefinition, RepresentationItem,
};
pub use style::{StyleData, DEFAULT_COLOR_INDEX, DEFAULT_MATERIAL_INDEX};
pub use tess::{TessFace, Tessellation};
