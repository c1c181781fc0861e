// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model root: the node arena plus model-global state.
//!
//! [`Model`] owns every assembly node for the lifetime of one conversion.
//! Consumers hold [`NodeKey`]s into it and read nodes through the accessor
//! methods; a key that does not resolve is answered with `None`, never a
//! panic, so damaged references degrade to skipped subtrees downstream.

use slotmap::SlotMap;

use crate::attribute::Attribute;
use crate::graphics::GraphicsStore;
use crate::key::NodeKey;
use crate::node::{Node, NodeKind, Occurrence};

/// Limit on prototype-chain hops when resolving occurrence fields. Guards
/// the resolver against reference cycles in damaged input.
const MAX_PROTOTYPE_DEPTH: usize = 64;

/// Source CAD format a model was loaded from.
///
/// The numeric tag is recorded in exported scene metadata, so the
/// discriminants must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Unknown = 0,
    Acis = 1,
    CatiaV4 = 2,
    CatiaV5 = 3,
    Creo = 4,
    Iges = 5,
    Inventor = 6,
    Jt = 7,
    Parasolid = 8,
    Prc = 9,
    SolidWorks = 10,
    Step = 11,
    Unigraphics = 12,
    Vda = 13,
    Rhino = 14,
    Revit = 15,
    Ifc = 16,
    U3d = 17,
}

impl SourceFormat {
    /// Integer tag recorded in exported scene metadata.
    pub fn tag(self) -> i64 {
        self as i64
    }
}

/// An in-memory CAD assembly.
///
/// # Example
///
/// ```
/// use cad_scene_model::{Model, Node, NodeKind, Occurrence};
///
/// let mut model = Model::new();
/// let root = model.add_node(
///     Node::new(NodeKind::Occurrence(Occurrence::default())).with_name("assembly"),
/// );
/// model.add_root(root);
///
/// assert_eq!(model.roots(), &[root]);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    pub(crate) roots: Vec<NodeKey>,
    /// Model display name, when the source file carried one.
    pub name: Option<String>,
    /// Conversion factor from source length units to millimeters.
    pub unit_factor: f64,
    /// Format of the file the upstream kernel loaded.
    pub format: SourceFormat,
    /// Model-level attribute records.
    pub attributes: Vec<Attribute>,
    /// Model-global color, material, texture and picture tables.
    pub graphics: GraphicsStore,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            name: None,
            unit_factor: 1.0,
            format: SourceFormat::default(),
            attributes: Vec::new(),
            graphics: GraphicsStore::new(),
        }
    }
}

impl Model {
    /// Creates a new, empty model with a unit factor of `1.0`.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node operations ---

    /// Adds a node to the arena and returns its key.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Returns the node for the given key, or `None` if not found.
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable access to the node for the given key.
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Returns the number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Root operations ---

    /// Appends a root occurrence.
    pub fn add_root(&mut self, key: NodeKey) {
        self.roots.push(key);
    }

    /// Root occurrences in assembly order.
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    // --- Occurrence resolution ---

    /// Location transform of an occurrence, following its prototype chain
    /// when the occurrence carries none itself.
    pub fn occurrence_location(&self, key: NodeKey) -> Option<NodeKey> {
        self.resolve_occurrence(key, |occurrence| occurrence.location)
    }

    /// Part definition of an occurrence, following its prototype chain
    /// when the occurrence carries none itself.
    pub fn occurrence_part(&self, key: NodeKey) -> Option<NodeKey> {
        self.resolve_occurrence(key, |occurrence| occurrence.part)
    }

    fn resolve_occurrence(
        &self,
        key: NodeKey,
        field: impl Fn(&Occurrence) -> Option<NodeKey>,
    ) -> Option<NodeKey> {
        let mut current = key;
        for _ in 0..MAX_PROTOTYPE_DEPTH {
            let node = self.nodes.get(current)?;
            let NodeKind::Occurrence(occurrence) = &node.kind else {
                return None;
            };
            if let Some(found) = field(occurrence) {
                return Some(found);
            }
            current = occurrence.prototype?;
        }
        None
    }
}
