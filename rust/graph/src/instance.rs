// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instance paths and net visual state.
//!
//! The same part can sit under many occurrences, so per-instance state
//! (visibility, removal, style) is a function of the whole root-to-node
//! path, not of the node alone. An [`InstancePath`] records that chain,
//! and the `net_*` functions fold overrides along it, outermost first,
//! with the terminal node's face data having the last word.

use cad_scene_model::{Model, Node, NodeKey, NodeKind, StyleData, TessFace};
use smallvec::SmallVec;

/// Chain of node keys from a scene root down to the node under
/// consideration.
#[derive(Debug, Clone)]
pub struct InstancePath {
    nodes: SmallVec<[NodeKey; 8]>,
}

impl InstancePath {
    /// Starts a path at a root node.
    pub fn new(root: NodeKey) -> Self {
        let mut nodes = SmallVec::new();
        nodes.push(root);
        Self { nodes }
    }

    /// Extends the path one level down.
    pub fn push(&mut self, key: NodeKey) {
        self.nodes.push(key);
    }

    /// Drops the deepest node. The root element never leaves the path.
    pub fn pop(&mut self) {
        if self.nodes.len() > 1 {
            self.nodes.pop();
        }
    }

    /// Deepest node on the path.
    pub fn terminal(&self) -> NodeKey {
        self.nodes[self.nodes.len() - 1]
    }

    /// All keys, root first.
    pub fn nodes(&self) -> &[NodeKey] {
        &self.nodes
    }

    /// Whether the key already sits somewhere on the path. Guards
    /// traversal against reference cycles.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains(&key)
    }
}

/// Net visibility along a path, optionally refined by one face of the
/// terminal node's tessellation. Defaults to shown.
pub fn net_show(model: &Model, path: &InstancePath, face: Option<usize>) -> bool {
    net_value(model, path, face, |node| node.show, |face| face.show, true)
}

/// Net removal along a path. Defaults to kept.
pub fn net_removed(model: &Model, path: &InstancePath, face: Option<usize>) -> bool {
    net_value(
        model,
        path,
        face,
        |node| node.removed,
        |face| face.removed,
        false,
    )
}

/// Net display style along a path.
pub fn net_style(model: &Model, path: &InstancePath, face: Option<usize>) -> StyleData {
    net_value(
        model,
        path,
        face,
        |node| node.style,
        |face| face.style,
        StyleData::default(),
    )
}

/// Display name for the node at the end of a path: the name of the
/// deepest named node, else a label for the terminal node's kind.
pub fn display_name(model: &Model, path: &InstancePath) -> String {
    for &key in path.nodes().iter().rev() {
        if let Some(name) = model.node(key).and_then(Node::display_name) {
            return name.to_string();
        }
    }

    match model.node(path.terminal()) {
        Some(node) => node.kind_label().to_string(),
        None => String::new(),
    }
}

fn net_value<T: Copy>(
    model: &Model,
    path: &InstancePath,
    face: Option<usize>,
    node_field: impl Fn(&Node) -> Option<T>,
    face_field: impl Fn(&TessFace) -> Option<T>,
    default: T,
) -> T {
    let mut value = default;

    for &key in path.nodes() {
        let Some(node) = model.node(key) else {
            continue;
        };
        if let Some(local) = node_field(node) {
            value = local;
        }
    }

    if let Some(face) = face {
        if let Some(local) = face_override(model, path.terminal(), face, face_field) {
            value = local;
        }
    }

    value
}

fn face_override<T>(
    model: &Model,
    key: NodeKey,
    face: usize,
    face_field: impl Fn(&TessFace) -> Option<T>,
) -> Option<T> {
    let node = model.node(key)?;
    let NodeKind::RepresentationItem(item) = &node.kind else {
        return None;
    };
    let tessellation = item.body.tessellation()?;
    face_field(tessellation.faces.get(face)?)
}
