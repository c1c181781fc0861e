// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation to output meshes, with caching and vertex welding.
//!
//! Faces are bucketed by effective style, each bucket becoming one mesh.
//! Corners weld on the exact source index triple, never on coordinate
//! values, so seams authored as distinct vertices stay distinct. Built
//! mesh sets are cached per (item, style) and shared across instances.

use cad_scene_model::{Model, NodeKey, NodeKind, StyleData, TessFace, Tessellation};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::config::SceneConfig;
use crate::instance::{net_removed, net_show, net_style, InstancePath};
use crate::material::MaterialResolver;
use crate::scene::{Scene, SceneMesh};

struct CachedMeshes {
    style: StyleData,
    indices: Vec<u32>,
}

/// Builds output meshes for representation items and reuses them across
/// the instances that share item and effective style.
#[derive(Default)]
pub struct MeshFactory {
    materials: MaterialResolver,
    cache: FxHashMap<NodeKey, Vec<CachedMeshes>>,
}

impl MeshFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene mesh indices for the representation item at the end of the
    /// path. Degenerate items yield an empty set, and the set (empty
    /// included) is cached under the item's effective style.
    pub fn mesh_indices(
        &mut self,
        model: &Model,
        config: &SceneConfig,
        scene: &mut Scene,
        path: &InstancePath,
    ) -> Vec<u32> {
        let item = path.terminal();
        let style = net_style(model, path, None);

        if let Some(hit) = self
            .cache
            .get(&item)
            .and_then(|entries| entries.iter().find(|entry| entry.style == style))
        {
            return hit.indices.clone();
        }

        let indices = self.build_meshes(model, config, scene, path);
        self.cache.entry(item).or_default().push(CachedMeshes {
            style,
            indices: indices.clone(),
        });
        indices
    }

    fn build_meshes(
        &mut self,
        model: &Model,
        config: &SceneConfig,
        scene: &mut Scene,
        path: &InstancePath,
    ) -> Vec<u32> {
        let tessellation = match model.node(path.terminal()).map(|node| &node.kind) {
            Some(NodeKind::RepresentationItem(item)) => item.body.tessellation(),
            _ => None,
        };
        let Some(tessellation) = tessellation else {
            return Vec::new();
        };

        let mut buckets: Vec<MeshBucket> = Vec::new();
        let mut skipped = 0usize;

        for (face_index, face) in tessellation.faces.iter().enumerate() {
            if !net_show(model, path, Some(face_index))
                || net_removed(model, path, Some(face_index))
            {
                continue;
            }

            let face_style = net_style(model, path, Some(face_index));
            // Bucket count per item is small; a linear scan beats hashing.
            let position = match buckets.iter().position(|bucket| bucket.style == face_style) {
                Some(position) => position,
                None => {
                    buckets.push(MeshBucket::new(face_style));
                    buckets.len() - 1
                }
            };
            buckets[position].add_face(tessellation, face, &mut skipped);
        }

        if skipped > 0 {
            warn!(
                node = ?path.terminal(),
                triangles = skipped,
                "dropped triangles with out-of-range indices"
            );
        }

        let mut indices = Vec::new();
        for bucket in buckets {
            if bucket.indices.is_empty() {
                continue;
            }
            let material = self
                .materials
                .material_index(model, config, scene, &bucket.style);
            indices.push(scene.add_mesh(bucket.into_mesh(material)));
        }
        indices
    }
}

/// Weld key: source offsets of position, normal and texcoord (0 when
/// the tessellation has none).
type CornerKey = (u32, u32, u32);

struct MeshBucket {
    style: StyleData,
    positions: Vec<f32>,
    normals: Vec<f32>,
    texcoords: Vec<f32>,
    indices: Vec<u32>,
    welded: FxHashMap<CornerKey, u32>,
}

impl MeshBucket {
    fn new(style: StyleData) -> Self {
        Self {
            style,
            positions: Vec::new(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            indices: Vec::new(),
            welded: FxHashMap::default(),
        }
    }

    fn add_face(&mut self, tessellation: &Tessellation, face: &TessFace, skipped: &mut usize) {
        for triangle in 0..face.triangle_count() {
            match self.weld_triangle(tessellation, face, triangle * 3) {
                Some(corners) => self.indices.extend_from_slice(&corners),
                None => *skipped += 1,
            }
        }
    }

    /// Welds one triangle, validating all three corners before any
    /// vertex data is appended so a bad corner never leaves a partial
    /// vertex behind.
    fn weld_triangle(
        &mut self,
        tessellation: &Tessellation,
        face: &TessFace,
        offset: usize,
    ) -> Option<[u32; 3]> {
        let keys = [
            corner_key(tessellation, face, offset)?,
            corner_key(tessellation, face, offset + 1)?,
            corner_key(tessellation, face, offset + 2)?,
        ];

        let mut corners = [0u32; 3];
        for (corner, key) in corners.iter_mut().zip(keys) {
            *corner = self.weld(tessellation, key)?;
        }
        Some(corners)
    }

    fn weld(&mut self, tessellation: &Tessellation, key: CornerKey) -> Option<u32> {
        if let Some(&index) = self.welded.get(&key) {
            return Some(index);
        }

        let (position_offset, normal_offset, texcoord_offset) = key;
        let position = tessellation.position(position_offset)?;
        let normal = tessellation.normal(normal_offset)?;
        let texcoord = if tessellation.has_texcoords() {
            Some(tessellation.texcoord(texcoord_offset)?)
        } else {
            None
        };

        self.positions.extend(position.iter().map(|&v| v as f32));
        self.normals.extend(normal.iter().map(|&v| v as f32));
        if let Some(texcoord) = texcoord {
            self.texcoords.extend(texcoord.iter().map(|&v| v as f32));
        }

        let index = (self.positions.len() / 3 - 1) as u32;
        self.welded.insert(key, index);
        Some(index)
    }

    fn into_mesh(self, material: u32) -> SceneMesh {
        SceneMesh {
            positions: self.positions,
            normals: self.normals,
            texcoords: self.texcoords,
            indices: self.indices,
            material,
        }
    }
}

/// Source offset triple of one triangle corner, validated against the
/// tessellation's flat arrays.
fn corner_key(tessellation: &Tessellation, face: &TessFace, corner: usize) -> Option<CornerKey> {
    let position_offset = *face.position_indices.get(corner)?;
    let normal_offset = *face.normal_indices.get(corner)?;
    tessellation.position(position_offset)?;
    tessellation.normal(normal_offset)?;

    let texcoord_offset = if tessellation.has_texcoords() {
        let offset = *face.texcoord_indices.get(corner)?;
        tessellation.texcoord(offset)?;
        offset
    } else {
        0
    };

    Some((position_offset, normal_offset, texcoord_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_scene_model::{Node, Occurrence, RepresentationItem};

    // Unit quad split into two triangles sharing an edge. Offsets step
    // by 3 into the flat arrays.
    fn quad_tessellation() -> Tessellation {
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

    fn item_with(model: &mut Model, tessellation: Tessellation) -> NodeKey {
        model.add_node(Node::new(NodeKind::RepresentationItem(
            RepresentationItem::solid(Some(tessellation)),
        )))
    }

    fn build(
        model: &Model,
        scene: &mut Scene,
        factory: &mut MeshFactory,
        path: &InstancePath,
    ) -> Vec<u32> {
        factory.mesh_indices(model, &SceneConfig::default(), scene, path)
    }

    #[test]
    fn shared_corners_weld_to_one_vertex() {
        let mut model = Model::new();
        let item = item_with(&mut model, quad_tessellation());
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));

        assert_eq!(indices.len(), 1);
        let mesh = &scene.meshes[indices[0] as usize];
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.texcoords.is_empty());
    }

    #[test]
    fn equal_coordinates_under_different_offsets_stay_apart() {
        let mut model = Model::new();
        let mut tessellation = Tessellation {
            // Offsets 0 and 3 hold the same point.
            positions: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            normals: vec![0.0, 0.0, 1.0],
            ..Tessellation::default()
        };
        tessellation
            .faces
            .push(TessFace::new(vec![0, 3, 6], vec![0, 0, 0]));
        let item = item_with(&mut model, tessellation);
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));
        assert_eq!(scene.meshes[indices[0] as usize].vertex_count(), 3);
    }

    #[test]
    fn hidden_and_removed_faces_are_dropped() {
        let mut model = Model::new();
        let mut tessellation = quad_tessellation();
        tessellation.faces[0] = TessFace::new(vec![0, 3, 6], vec![0, 0, 0]);
        tessellation
            .faces
            .push(TessFace::new(vec![0, 6, 9], vec![0, 0, 0]).with_show(false));
        tessellation
            .faces
            .push(TessFace::new(vec![0, 6, 9], vec![0, 0, 0]).with_removed(true));
        let item = item_with(&mut model, tessellation);
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));

        assert_eq!(indices.len(), 1);
        assert_eq!(scene.meshes[indices[0] as usize].triangle_count(), 1);
    }

    #[test]
    fn repeated_requests_reuse_cached_meshes() {
        let mut model = Model::new();
        let item = item_with(&mut model, quad_tessellation());
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();
        let path = InstancePath::new(item);

        let first = build(&model, &mut scene, &mut factory, &path);
        let meshes_after_first = scene.meshes.len();
        let materials_after_first = scene.materials.len();
        let second = build(&model, &mut scene, &mut factory, &path);

        assert_eq!(first, second);
        assert_eq!(scene.meshes.len(), meshes_after_first);
        assert_eq!(scene.materials.len(), materials_after_first);
    }

    #[test]
    fn instances_with_different_styles_build_separate_meshes() {
        let mut model = Model::new();
        let red = model.graphics.add_color(1.0, 0.0, 0.0);
        let blue = model.graphics.add_color(0.0, 0.0, 1.0);
        let item = item_with(&mut model, quad_tessellation());
        let parent_a = model.add_node(
            Node::new(NodeKind::Occurrence(Occurrence::default()))
                .with_style(StyleData::rgb(red)),
        );
        let parent_b = model.add_node(
            Node::new(NodeKind::Occurrence(Occurrence::default()))
                .with_style(StyleData::rgb(blue)),
        );
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let mut path_a = InstancePath::new(parent_a);
        path_a.push(item);
        let mut path_b = InstancePath::new(parent_b);
        path_b.push(item);

        let under_a = build(&model, &mut scene, &mut factory, &path_a);
        let under_b = build(&model, &mut scene, &mut factory, &path_b);
        let under_a_again = build(&model, &mut scene, &mut factory, &path_a);

        assert_ne!(under_a, under_b);
        assert_eq!(under_a, under_a_again);
        assert_eq!(scene.meshes.len(), 2);
        assert_ne!(
            scene.meshes[under_a[0] as usize].material,
            scene.meshes[under_b[0] as usize].material
        );
    }

    #[test]
    fn face_styles_split_into_buckets() {
        let mut model = Model::new();
        let red = model.graphics.add_color(1.0, 0.0, 0.0);
        let blue = model.graphics.add_color(0.0, 0.0, 1.0);
        let mut tessellation = quad_tessellation();
        tessellation.faces[0] =
            TessFace::new(vec![0, 3, 6], vec![0, 0, 0]).with_style(StyleData::rgb(red));
        tessellation
            .faces
            .push(TessFace::new(vec![0, 6, 9], vec![0, 0, 0]).with_style(StyleData::rgb(blue)));
        let item = item_with(&mut model, tessellation);
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));

        assert_eq!(indices.len(), 2);
        assert_ne!(
            scene.meshes[indices[0] as usize].material,
            scene.meshes[indices[1] as usize].material
        );
    }

    #[test]
    fn out_of_range_corners_skip_whole_triangles() {
        let mut model = Model::new();
        let mut tessellation = quad_tessellation();
        // Second triangle points past the position array.
        tessellation.faces[0] = TessFace::new(vec![0, 3, 6, 0, 6, 99], vec![0, 0, 0, 0, 0, 0]);
        let item = item_with(&mut model, tessellation);
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));

        let mesh = &scene.meshes[indices[0] as usize];
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn texcoords_weld_into_the_key() {
        let mut model = Model::new();
        let mut tessellation = quad_tessellation();
        tessellation.texcoords = vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        // Same positions, two different uv offsets for the shared edge.
        tessellation.faces[0] = TessFace::new(vec![0, 3, 6, 0, 6, 9], vec![0; 6])
            .with_texcoords(vec![0, 2, 4, 6, 4, 6]);
        let item = item_with(&mut model, tessellation);
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        let indices = build(&model, &mut scene, &mut factory, &InstancePath::new(item));

        let mesh = &scene.meshes[indices[0] as usize];
        // Position offset 0 appears with uv offsets 0 and 6, so it
        // contributes two vertices; offsets 6/4 weld.
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.texcoords.len(), 10);
    }

    #[test]
    fn degenerate_terminals_yield_empty_sets() {
        let mut model = Model::new();
        let bare = model.add_node(Node::new(NodeKind::RepresentationItem(
            RepresentationItem::solid(None),
        )));
        let occurrence =
            model.add_node(Node::new(NodeKind::Occurrence(Occurrence::default())));
        let mut scene = Scene::new(None);
        let mut factory = MeshFactory::new();

        assert!(build(&model, &mut scene, &mut factory, &InstancePath::new(bare)).is_empty());
        assert!(
            build(&model, &mut scene, &mut factory, &InstancePath::new(occurrence)).is_empty()
        );
        assert!(build(&model, &mut scene, &mut factory, &InstancePath::new(bare)).is_empty());
        assert!(scene.meshes.is_empty());
        assert!(scene.materials.is_empty());
    }
}
