// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transform composition across assembly node kinds.
//!
//! Every node kind answers with a 4x4 affine matrix: transform nodes from
//! their own data, occurrences through their resolved location,
//! representation items and coordinate systems through their attached
//! coordinate-system chain. Anything else, and anything dangling, is the
//! identity — transform lookup never fails.

use cad_scene_model::{CartesianTransform, Model, NodeKey, NodeKind};
use nalgebra::{Matrix4, Vector3};

/// Local 4x4 matrix of a node, identity for kinds (and keys) that carry
/// no transform.
pub fn node_matrix(model: &Model, key: NodeKey) -> Matrix4<f64> {
    let Some(node) = model.node(key) else {
        return Matrix4::identity();
    };

    match &node.kind {
        NodeKind::CartesianTransform(transform) => cartesian_matrix(transform),
        // Coefficients are column-major: 0, 4, 8, 12 form the first row.
        NodeKind::GeneralTransform(transform) => {
            Matrix4::from_column_slice(&transform.coefficients)
        }
        NodeKind::Occurrence(_) => match model.occurrence_location(key) {
            Some(location) => node_matrix(model, location),
            None => Matrix4::identity(),
        },
        NodeKind::RepresentationItem(item) => match item.coordinate_system {
            Some(system) => system_matrix(model, system),
            None => Matrix4::identity(),
        },
        NodeKind::CoordinateSystem(system) => match system.coordinate_system {
            Some(parent) => system_matrix(model, parent),
            None => Matrix4::identity(),
        },
        NodeKind::PartDefinition(_) => Matrix4::identity(),
    }
}

/// Matrix realized by an attached coordinate system: the system's own
/// placement composed with its transformation.
fn system_matrix(model: &Model, key: NodeKey) -> Matrix4<f64> {
    let own = node_matrix(model, key);

    let transformation = match model.node(key) {
        Some(node) => match &node.kind {
            NodeKind::CoordinateSystem(system) => system.transformation,
            _ => None,
        },
        None => None,
    };

    match transformation {
        Some(transformation) => own * node_matrix(model, transformation),
        None => own,
    }
}

fn cartesian_matrix(transform: &CartesianTransform) -> Matrix4<f64> {
    let x = Vector3::from(transform.x_axis);
    let y = Vector3::from(transform.y_axis);
    let mirror = if transform.mirror { -1.0 } else { 1.0 };
    let z = x.cross(&y) * mirror;
    let [sx, sy, sz] = transform.scale;
    let [ox, oy, oz] = transform.origin;

    // Basis columns scaled per component, origin in the last column.
    Matrix4::new(
        x.x * sx, y.x * sy, z.x * sz, ox,
        x.y * sx, y.y * sy, z.y * sz, oy,
        x.z * sx, y.z * sy, z.z * sz, oz,
        0.0, 0.0, 0.0, 1.0,
    )
}
