// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Style resolution into scene materials.
//!
//! Styles come in three shapes: a bare color index, a plain material
//! record, or a texture-application chain. Each shape resolves through
//! its own cache so one style index never produces two scene materials,
//! and equal styles met on different nodes reuse the same slot.

use cad_scene_model::{
    AttributeValue, MaterialData, Model, StyleData, TextureApplication, TextureDefinition,
    DEFAULT_COLOR_INDEX, DEFAULT_MATERIAL_INDEX,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::SceneConfig;
use crate::scene::{Scene, SceneMaterial, SceneTexture};
use crate::texture::{decompose_transform, picture_file_name, write_picture};

/// Caches material construction per style index, one cache per style
/// shape. Indices live in separate spaces, so a texture application and
/// a bare color may share a numeric index without colliding.
#[derive(Debug, Default)]
pub struct MaterialResolver {
    textured: FxHashMap<u32, u32>,
    plain: FxHashMap<u32, u32>,
    rgb: FxHashMap<u32, u32>,
}

impl MaterialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene material slot for a style, building and appending the
    /// material on first sight.
    pub fn material_index(
        &mut self,
        model: &Model,
        config: &SceneConfig,
        scene: &mut Scene,
        style: &StyleData,
    ) -> u32 {
        if style.material {
            if model.graphics.is_texture(style.index) {
                find_or_create(&mut self.textured, scene, style.index, || {
                    textured_material(model, config, style)
                })
            } else {
                find_or_create(&mut self.plain, scene, style.index, || {
                    plain_material(model, style)
                })
            }
        } else {
            find_or_create(&mut self.rgb, scene, style.index, || {
                flat_material(model, config, style)
            })
        }
    }
}

fn find_or_create(
    cache: &mut FxHashMap<u32, u32>,
    scene: &mut Scene,
    index: u32,
    build: impl FnOnce() -> SceneMaterial,
) -> u32 {
    if let Some(&slot) = cache.get(&index) {
        return slot;
    }

    let slot = scene.add_material(build());
    cache.insert(index, slot);
    slot
}

/// Style carrying neither a material record nor a texture: a single
/// diffuse color, the configured default under the reserved index.
fn flat_material(model: &Model, config: &SceneConfig, style: &StyleData) -> SceneMaterial {
    let mut material = SceneMaterial {
        diffuse: Some(flat_diffuse(model, config, style.index)),
        ..SceneMaterial::default()
    };
    apply_style_flags(&mut material, style);
    material
}

fn flat_diffuse(model: &Model, config: &SceneConfig, index: u32) -> [f64; 4] {
    if index == DEFAULT_COLOR_INDEX {
        let [r, g, b] = config.default_color;
        return [r, g, b, 1.0];
    }

    match model.graphics.color(index) {
        Some(color) => [color.r, color.g, color.b, 1.0],
        None => [0.0, 0.0, 0.0, 1.0],
    }
}

fn plain_material(model: &Model, style: &StyleData) -> SceneMaterial {
    let Some(record) = model.graphics.material(style.index) else {
        return SceneMaterial::default();
    };

    let mut material = SceneMaterial::default();
    apply_material_record(&mut material, model, record);
    apply_style_flags(&mut material, style);
    material
}

fn textured_material(model: &Model, config: &SceneConfig, style: &StyleData) -> SceneMaterial {
    let Some(application) = model.graphics.texture_application(style.index) else {
        return SceneMaterial::default();
    };

    let mut material = SceneMaterial::default();
    apply_texture_chain(&mut material, model, config, application, 0);
    apply_style_flags(&mut material, style);
    material
}

/// Walks one link of a texture-application chain: record the texture
/// reference, fold in the link's material record, then follow `next`.
/// A missing table entry silently truncates the chain at that link.
fn apply_texture_chain(
    material: &mut SceneMaterial,
    model: &Model,
    config: &SceneConfig,
    application: TextureApplication,
    slot: u32,
) {
    let Some(definition) = model.graphics.texture_definition(application.definition) else {
        return;
    };

    material.textures.push(texture_reference(
        model,
        config,
        application.definition,
        definition,
        slot,
    ));

    let Some(record) = model.graphics.material(application.material) else {
        return;
    };

    apply_material_record(material, model, record);
    if let Some(name) = &record.name {
        material.name = Some(name.clone());
    }
    apply_named_factors(material, record);

    if application.next != DEFAULT_MATERIAL_INDEX {
        if let Some(next) = model.graphics.texture_application(application.next) {
            apply_texture_chain(material, model, config, next, slot + 1);
        }
    }
}

fn texture_reference(
    model: &Model,
    config: &SceneConfig,
    definition_index: u32,
    definition: &TextureDefinition,
    slot: u32,
) -> SceneTexture {
    let path = model.graphics.picture(definition.picture).map(|picture| {
        let path = config
            .texture_dir
            .join(picture_file_name(definition.picture, picture));
        if let Err(error) = write_picture(&path, picture) {
            debug!(path = %path.display(), %error, "texture export failed");
        }
        path
    });

    SceneTexture {
        slot,
        definition: definition_index,
        picture: definition.picture,
        path,
        mapping: definition.mapping.into(),
        wrap_u: definition.wrap_u.into(),
        wrap_v: definition.wrap_v.into(),
        transform: definition.transform.as_ref().map(decompose_transform),
        alpha_test: definition.alpha_test,
    }
}

fn apply_material_record(material: &mut SceneMaterial, model: &Model, record: &MaterialData) {
    material.ambient = Some(color_with_alpha(model, record.ambient, record.ambient_alpha));
    material.diffuse = Some(color_with_alpha(model, record.diffuse, record.diffuse_alpha));
    material.emissive = Some(color_with_alpha(
        model,
        record.emissive,
        record.emissive_alpha,
    ));
    material.specular = Some(color_with_alpha(
        model,
        record.specular,
        record.specular_alpha,
    ));
    material.shininess = Some(record.shininess);
}

fn color_with_alpha(model: &Model, index: u32, alpha: f64) -> [f64; 4] {
    match model.graphics.color(index) {
        Some(color) => [color.r, color.g, color.b, alpha],
        None => [0.0, 0.0, 0.0, alpha],
    }
}

/// Well-known material attributes spilled into dedicated output fields.
fn apply_named_factors(material: &mut SceneMaterial, record: &MaterialData) {
    for attribute in &record.attributes {
        let Some(title) = attribute.title.as_text() else {
            continue;
        };
        let Some(entry) = attribute.entries.first() else {
            continue;
        };

        match (title, &entry.value) {
            ("AlphaMode", AttributeValue::Int(value)) => {
                material.alpha_mode = Some(i64::from(*value));
            }
            ("AlphaCutOff", AttributeValue::Real(value)) => {
                material.alpha_cutoff = Some(*value);
            }
            ("MetallicFactor", AttributeValue::Real(value)) => {
                material.metallic_factor = Some(*value);
            }
            ("NormalTextureFactor", AttributeValue::Real(value)) => {
                material.normal_texture_factor = Some(*value);
            }
            ("OcclusionTextureFactor", AttributeValue::Real(value)) => {
                material.occlusion_texture_factor = Some(*value);
            }
            ("RoughnessFactor", AttributeValue::Real(value)) => {
                material.roughness_factor = Some(*value);
            }
            _ => {}
        }
    }
}

/// Culling flags and transparency apply on every successful resolution.
fn apply_style_flags(material: &mut SceneMaterial, style: &StyleData) {
    material.two_sided = !style.front_culling && !style.back_culling;
    if style.transparency_defined {
        material.opacity = Some(f64::from(style.transparency) / 255.0);
    }
}
