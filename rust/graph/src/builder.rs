// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recursive scene graph construction.
//!
//! Walks the assembly depth first, one output node per assembly node:
//! occurrences carry placement and descend into their part and child
//! occurrences, parts collect their visible items, items carry meshes
//! or, for sets, further items. Node metadata is copied along the way.

use cad_scene_model::{
    Attribute, AttributeTitle, AttributeValue, ItemBody, Model, NodeKey, NodeKind,
};
use tracing::{debug, warn};

use crate::config::SceneConfig;
use crate::instance::{display_name, net_removed, net_show, InstancePath};
use crate::mesh::MeshFactory;
use crate::scene::{
    MetaValue, Metadata, Scene, SceneNode, META_MATERIAL, META_MATERIAL_DENSITY,
    META_MATERIAL_NAME, META_SOURCE_FORMAT, META_UNIT_FACTOR,
};
use crate::transform::node_matrix;

/// Builds the complete scene graph for a model.
///
/// Construction never fails: dangling references, missing tables and
/// degenerate geometry degrade to identity transforms, default
/// materials and empty mesh sets.
pub fn build_scene(model: &Model, config: &SceneConfig) -> Scene {
    SceneBuilder::new(model, config).build()
}

/// One-shot builder behind [`build_scene`]; owns the scene under
/// construction and the caches shared across the traversal.
pub struct SceneBuilder<'a> {
    model: &'a Model,
    config: &'a SceneConfig,
    scene: Scene,
    factory: MeshFactory,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(model: &'a Model, config: &'a SceneConfig) -> Self {
        Self {
            model,
            config,
            scene: Scene::new(model.name.clone()),
            factory: MeshFactory::new(),
        }
    }

    /// Runs the traversal and returns the finished scene.
    pub fn build(mut self) -> Scene {
        let mut metadata = Metadata::new();
        for attribute in &self.model.attributes {
            add_attribute(&mut metadata, attribute);
        }
        metadata.add(META_UNIT_FACTOR, MetaValue::Double(self.model.unit_factor));
        metadata.add(META_SOURCE_FORMAT, MetaValue::Int(self.model.format.tag()));
        self.scene.root.metadata = Some(metadata);

        for &root in self.model.roots() {
            let mut path = InstancePath::new(root);
            if let Some(node) = self.build_occurrence(&mut path) {
                self.scene.root.children.push(node);
            }
        }

        debug!(
            nodes = self.scene.node_count(),
            meshes = self.scene.meshes.len(),
            materials = self.scene.materials.len(),
            "scene graph built"
        );
        self.scene
    }

    fn build_occurrence(&mut self, path: &mut InstancePath) -> Option<SceneNode> {
        let key = path.terminal();
        let node = self.model.node(key)?;
        let NodeKind::Occurrence(occurrence) = &node.kind else {
            return None;
        };

        // Occurrences are named from the occurrence alone, not from the
        // full instance path.
        let mut output = SceneNode::new(display_name(self.model, &InstancePath::new(key)));
        output.transform = node_matrix(self.model, key);
        output.metadata = self.node_metadata(key);

        if let Some(part) = self.model.occurrence_part(key) {
            if self.guard_descend(path, part) {
                path.push(part);
                if let Some(child) = self.build_part(path) {
                    output.children.push(child);
                }
                path.pop();
            }
        }

        for &child in &occurrence.children {
            if !self.guard_descend(path, child) {
                continue;
            }
            path.push(child);
            if let Some(built) = self.build_occurrence(path) {
                output.children.push(built);
            }
            path.pop();
        }

        Some(output)
    }

    fn build_part(&mut self, path: &mut InstancePath) -> Option<SceneNode> {
        let key = path.terminal();
        let node = self.model.node(key)?;
        let NodeKind::PartDefinition(part) = &node.kind else {
            return None;
        };

        let mut output = SceneNode::new(display_name(self.model, path));
        output.metadata = self.node_metadata(key);

        for &item in &part.items {
            if !self.guard_descend(path, item) {
                continue;
            }
            path.push(item);
            if net_show(self.model, path, None) && !net_removed(self.model, path, None) {
                if let Some(child) = self.build_item(path) {
                    output.children.push(child);
                }
            }
            path.pop();
        }

        Some(output)
    }

    fn build_item(&mut self, path: &mut InstancePath) -> Option<SceneNode> {
        let key = path.terminal();
        let node = self.model.node(key)?;
        let NodeKind::RepresentationItem(item) = &node.kind else {
            return None;
        };

        let mut output = SceneNode::new(display_name(self.model, path));
        output.transform = node_matrix(self.model, key);
        output.metadata = self.node_metadata(key);

        match &item.body {
            ItemBody::Solid(_) | ItemBody::PolySolid(_) => {
                output.meshes =
                    self.factory
                        .mesh_indices(self.model, self.config, &mut self.scene, path);
            }
            // A set is pure grouping; its members recurse unfiltered.
            ItemBody::Set(items) => {
                for &child in items {
                    if !self.guard_descend(path, child) {
                        continue;
                    }
                    path.push(child);
                    if let Some(built) = self.build_item(path) {
                        output.children.push(built);
                    }
                    path.pop();
                }
            }
        }

        Some(output)
    }

    /// `false` when the child already sits on the path; descending
    /// would recurse forever.
    fn guard_descend(&self, path: &InstancePath, child: NodeKey) -> bool {
        if path.contains(child) {
            warn!(node = ?child, "cyclic reference skipped");
            return false;
        }
        true
    }

    fn node_metadata(&self, key: NodeKey) -> Option<Metadata> {
        let node = self.model.node(key)?;
        let mut metadata = Metadata::new();

        // Material properties surface only on occurrence and item nodes.
        if matches!(
            node.kind,
            NodeKind::Occurrence(_) | NodeKind::RepresentationItem(_)
        ) {
            if let Some(properties) = &node.material_properties {
                let mut bag = Metadata::new();
                if let Some(name) = &properties.name {
                    bag.add(META_MATERIAL_NAME, MetaValue::String(name.clone()));
                }
                if let Some(density) = properties.density {
                    bag.add(META_MATERIAL_DENSITY, MetaValue::Double(density));
                }
                if !bag.is_empty() {
                    metadata.add(META_MATERIAL, MetaValue::Bag(bag));
                }
            }
        }

        for attribute in &node.attributes {
            add_attribute(&mut metadata, attribute);
        }

        if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        }
    }
}

/// An attribute with a single untitled entry flattens to one value
/// under the record title; anything else becomes a nested bag.
fn add_attribute(metadata: &mut Metadata, attribute: &Attribute) {
    let title = attribute.title.to_key();

    if let [entry] = attribute.entries.as_slice() {
        if entry.title.is_none() {
            metadata.add(title, entry_value(&entry.value));
            return;
        }
    }

    let mut bag = Metadata::new();
    for entry in &attribute.entries {
        let key = entry
            .title
            .as_ref()
            .map(AttributeTitle::to_key)
            .unwrap_or_default();
        bag.add(key, entry_value(&entry.value));
    }
    metadata.add(title, MetaValue::Bag(bag));
}

fn entry_value(value: &AttributeValue) -> MetaValue {
    match value {
        AttributeValue::Int(v) | AttributeValue::Time(v) => MetaValue::Int(i64::from(*v)),
        AttributeValue::Real(v) => MetaValue::Double(*v),
        AttributeValue::String(v) => MetaValue::String(v.clone()),
    }
}
