// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly node types: the closed set of hierarchy kinds.
//!
//! A node couples the fields every kind shares (name, display overrides,
//! attributes, material properties) with a [`NodeKind`] payload. Consumers
//! dispatch with `match` over the closed enum; there is no open class
//! hierarchy and no runtime type tag.

use crate::attribute::{Attribute, MaterialProperties};
use crate::key::NodeKey;
use crate::style::StyleData;
use crate::tess::Tessellation;

/// Placement built from a frame: origin, two axes, per-axis scale and a
/// mirror flag. The z axis is derived (`x × y`, negated when mirrored).
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianTransform {
    pub origin: [f64; 3],
    pub x_axis: [f64; 3],
    pub y_axis: [f64; 3],
    pub scale: [f64; 3],
    pub mirror: bool,
}

impl Default for CartesianTransform {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            mirror: false,
        }
    }
}

/// Raw affine transform: 16 coefficients, column-major (coefficients
/// 0, 4, 8, 12 form the first row of the matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralTransform {
    pub coefficients: [f64; 16],
}

impl Default for GeneralTransform {
    fn default() -> Self {
        let mut coefficients = [0.0; 16];
        coefficients[0] = 1.0;
        coefficients[5] = 1.0;
        coefficients[10] = 1.0;
        coefficients[15] = 1.0;
        Self { coefficients }
    }
}

/// Instanced placement of a part definition inside a parent assembly.
#[derive(Debug, Clone, Default)]
pub struct Occurrence {
    /// Transform node (cartesian or general) placing this occurrence.
    pub location: Option<NodeKey>,
    /// Part definition this occurrence instances.
    pub part: Option<NodeKey>,
    /// Occurrence to inherit `location`/`part` from when absent here.
    pub prototype: Option<NodeKey>,
    /// Nested child occurrences, in assembly order.
    pub children: Vec<NodeKey>,
}

/// Reusable product structure owning representation items.
#[derive(Debug, Clone, Default)]
pub struct PartDefinition {
    pub items: Vec<NodeKey>,
}

/// Geometry-bearing body or grouping of a representation item.
#[derive(Debug, Clone)]
pub enum ItemBody {
    /// Exact b-rep body with its precomputed tessellation.
    Solid(Option<Tessellation>),
    /// Tessellation-only body (no exact geometry behind it).
    PolySolid(Option<Tessellation>),
    /// Grouping of nested representation items; never geometry-bearing.
    Set(Vec<NodeKey>),
}

impl ItemBody {
    /// Tessellation of a geometry-bearing body; `None` for sets and for
    /// bodies the kernel left untessellated.
    pub fn tessellation(&self) -> Option<&Tessellation> {
        match self {
            ItemBody::Solid(tess) | ItemBody::PolySolid(tess) => tess.as_ref(),
            ItemBody::Set(_) => None,
        }
    }
}

/// Geometry-or-grouping element owned by a part definition.
#[derive(Debug, Clone)]
pub struct RepresentationItem {
    /// Attached local coordinate system, when the item defines one.
    pub coordinate_system: Option<NodeKey>,
    pub body: ItemBody,
}

impl RepresentationItem {
    pub fn solid(tessellation: Option<Tessellation>) -> Self {
        Self {
            coordinate_system: None,
            body: ItemBody::Solid(tessellation),
        }
    }

    pub fn poly_solid(tessellation: Option<Tessellation>) -> Self {
        Self {
            coordinate_system: None,
            body: ItemBody::PolySolid(tessellation),
        }
    }

    pub fn set(items: Vec<NodeKey>) -> Self {
        Self {
            coordinate_system: None,
            body: ItemBody::Set(items),
        }
    }

    pub fn with_coordinate_system(mut self, coordinate_system: NodeKey) -> Self {
        self.coordinate_system = Some(coordinate_system);
        self
    }
}

/// Local coordinate system attachable to representation items.
#[derive(Debug, Clone, Default)]
pub struct CoordinateSystem {
    /// Transform node (cartesian or general) realizing the system.
    pub transformation: Option<NodeKey>,
    /// A coordinate system may itself sit in another coordinate system.
    pub coordinate_system: Option<NodeKey>,
}

/// Closed set of assembly node kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Occurrence(Occurrence),
    PartDefinition(PartDefinition),
    RepresentationItem(RepresentationItem),
    CoordinateSystem(CoordinateSystem),
    CartesianTransform(CartesianTransform),
    GeneralTransform(GeneralTransform),
}

/// One assembly node: shared fields plus the kind payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    /// Local show override; `None` inherits along the instance path.
    pub show: Option<bool>,
    /// Local removed override; `None` inherits along the instance path.
    pub removed: Option<bool>,
    /// Local style override; `None` inherits along the instance path.
    pub style: Option<StyleData>,
    pub attributes: Vec<Attribute>,
    pub material_properties: Option<MaterialProperties>,
    pub kind: NodeKind,
}

impl Node {
    /// Node of the given kind with empty shared fields.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            show: None,
            removed: None,
            style: None,
            attributes: Vec::new(),
            material_properties: None,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }

    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = Some(removed);
        self
    }

    pub fn with_style(mut self, style: StyleData) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_material_properties(mut self, properties: MaterialProperties) -> Self {
        self.material_properties = Some(properties);
        self
    }

    /// Non-empty name, if the node has one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Kind label used as the display-name fallback for unnamed chains.
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            NodeKind::Occurrence(_) => "occurrence",
            NodeKind::PartDefinition(_) => "part",
            NodeKind::RepresentationItem(item) => match item.body {
                ItemBody::Solid(_) | ItemBody::PolySolid(_) => "solid",
                ItemBody::Set(_) => "set",
            },
            NodeKind::CoordinateSystem(_) => "coordinate system",
            NodeKind::CartesianTransform(_) | NodeKind::GeneralTransform(_) => "transform",
        }
    }
}
