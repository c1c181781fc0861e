// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model-global graphics tables: colors, materials, textures, pictures.
//!
//! Style descriptors do not embed appearance data; they carry indices into
//! these tables. Plain materials and texture applications share one index
//! space (a style cannot tell which it points at — that is what
//! [`GraphicsStore::is_texture`] answers). All accessors return `Option`;
//! a miss is the recoverable "record not found" case the conversion engine
//! degrades on.

use crate::attribute::Attribute;

/// RGB color record, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Plain (untextured) material record. The four color fields are indices
/// into the color table, each paired with its own alpha.
#[derive(Debug, Clone, Default)]
pub struct MaterialData {
    pub name: Option<String>,
    pub ambient: u32,
    pub diffuse: u32,
    pub emissive: u32,
    pub specular: u32,
    pub ambient_alpha: f64,
    pub diffuse_alpha: f64,
    pub emissive_alpha: f64,
    pub specular_alpha: f64,
    pub shininess: f64,
    /// Attributes attached to the material entity (alpha mode, PBR
    /// factors and the like); copied through by the material resolver.
    pub attributes: Vec<Attribute>,
}

/// One link of a texture-application chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureApplication {
    /// Texture-definition table index.
    pub definition: u32,
    /// Material table index of the plain material this link applies to.
    pub material: u32,
    /// Next link in the chain; [`crate::DEFAULT_MATERIAL_INDEX`] ends it.
    pub next: u32,
}

/// How texture coordinates are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingMode {
    #[default]
    None,
    Planar,
    Cylindrical,
    Spherical,
    Cubical,
}

/// Per-axis texture wrap behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
}

/// Texture definition record.
#[derive(Debug, Clone, Default)]
pub struct TextureDefinition {
    /// Picture table index of the raster payload.
    pub picture: u32,
    pub mapping: MappingMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    /// Column-major 4x4 coefficients of the uv transform, when one is set.
    pub transform: Option<[f64; 16]>,
    pub alpha_test: bool,
}

/// Raster payload format of an embedded picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureFormat {
    Png,
    Jpg,
    Bmp,
    /// Raw 8-bit RGB triples.
    Rgb,
    /// Raw 8-bit RGBA quads.
    Rgba,
    /// Raw 8-bit greyscale.
    Grey,
    /// Raw 8-bit greyscale with alpha.
    GreyAlpha,
}

impl PictureFormat {
    /// File extension used when the picture is exported to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            PictureFormat::Png => "png",
            PictureFormat::Jpg => "jpg",
            PictureFormat::Bmp => "bmp",
            PictureFormat::Rgb => "rgb",
            PictureFormat::Rgba => "rgba",
            PictureFormat::Grey => "grey",
            PictureFormat::GreyAlpha => "greya",
        }
    }
}

/// Embedded raster record. Bytes are opaque to this workspace — they are
/// written to disk unmodified, never decoded.
#[derive(Debug, Clone)]
pub struct Picture {
    pub format: PictureFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Entry of the shared material index space.
#[derive(Debug, Clone)]
pub enum MaterialEntry {
    Material(MaterialData),
    Texture(TextureApplication),
}

/// Model-global lookup tables style descriptors point into.
///
/// Indices are dense and assigned by insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStore {
    colors: Vec<RgbColor>,
    materials: Vec<MaterialEntry>,
    texture_definitions: Vec<TextureDefinition>,
    pictures: Vec<Picture>,
}

impl GraphicsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Color table ---

    /// Adds an RGB color, returning its index.
    pub fn add_color(&mut self, r: f64, g: f64, b: f64) -> u32 {
        self.colors.push(RgbColor { r, g, b });
        (self.colors.len() - 1) as u32
    }

    pub fn color(&self, index: u32) -> Option<RgbColor> {
        self.colors.get(index as usize).copied()
    }

    // --- Material table (shared with texture applications) ---

    /// Adds a plain material, returning its index.
    pub fn add_material(&mut self, data: MaterialData) -> u32 {
        self.materials.push(MaterialEntry::Material(data));
        (self.materials.len() - 1) as u32
    }

    /// Adds a texture application into the same index space as materials.
    pub fn add_texture_application(&mut self, application: TextureApplication) -> u32 {
        self.materials.push(MaterialEntry::Texture(application));
        (self.materials.len() - 1) as u32
    }

    /// `true` when the index refers to a texture application rather than
    /// a plain material. Unknown indices answer `false`.
    pub fn is_texture(&self, index: u32) -> bool {
        matches!(
            self.materials.get(index as usize),
            Some(MaterialEntry::Texture(_))
        )
    }

    /// Plain material at the index; `None` for texture applications or
    /// unknown indices.
    pub fn material(&self, index: u32) -> Option<&MaterialData> {
        match self.materials.get(index as usize)? {
            MaterialEntry::Material(data) => Some(data),
            MaterialEntry::Texture(_) => None,
        }
    }

    /// Texture application at the index; `None` for plain materials or
    /// unknown indices.
    pub fn texture_application(&self, index: u32) -> Option<TextureApplication> {
        match self.materials.get(index as usize)? {
            MaterialEntry::Texture(application) => Some(*application),
            MaterialEntry::Material(_) => None,
        }
    }

    // --- Texture definition table ---

    pub fn add_texture_definition(&mut self, definition: TextureDefinition) -> u32 {
        self.texture_definitions.push(definition);
        (self.texture_definitions.len() - 1) as u32
    }

    pub fn texture_definition(&self, index: u32) -> Option<&TextureDefinition> {
        self.texture_definitions.get(index as usize)
    }

    // --- Picture table ---

    pub fn add_picture(&mut self, picture: Picture) -> u32 {
        self.pictures.push(picture);
        (self.pictures.len() - 1) as u32
    }

    pub fn picture(&self, index: u32) -> Option<&Picture> {
        self.pictures.get(index as usize)
    }
}
