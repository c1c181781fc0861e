// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appearance (style) descriptors attached to nodes and tessellation faces.

/// Sentinel style index meaning "no explicit color supplied". A flat style
/// carrying it resolves to the configured default color downstream.
pub const DEFAULT_COLOR_INDEX: u32 = u32::MAX;

/// Sentinel material index. Also terminates texture-application chains:
/// a link whose next-application field carries it is the last link.
pub const DEFAULT_MATERIAL_INDEX: u32 = u32::MAX;

/// Appearance record attached to an assembly node or a tessellation face.
///
/// Every field is integral, so the derived equality is exact bitwise
/// equality — the mesh factory's style buckets and the (item, style) mesh
/// cache both depend on that. Two styles are the same style only if every
/// bit matches; there is no semantic comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleData {
    /// When `true`, [`index`](Self::index) refers to the material table
    /// (a plain material or a texture application); when `false`, to the
    /// RGB color table.
    pub material: bool,
    /// Source color or material index; [`DEFAULT_COLOR_INDEX`] when the
    /// source supplied none.
    pub index: u32,
    /// `true` when [`transparency`](Self::transparency) carries a value.
    pub transparency_defined: bool,
    /// Transparency byte: 0 = opaque, 255 = fully transparent.
    pub transparency: u8,
    pub front_culling: bool,
    pub back_culling: bool,
    /// Line pattern index; unused for surface rendering but part of the
    /// style identity.
    pub line_pattern: u32,
    /// When `true`, [`line_pattern`](Self::line_pattern) refers to the
    /// picture-pattern table instead of the line-pattern table.
    pub v_picture: bool,
}

impl StyleData {
    /// Style referencing an entry of the RGB color table.
    pub fn rgb(index: u32) -> Self {
        Self {
            material: false,
            index,
            ..Self::default()
        }
    }

    /// Style referencing an entry of the material table (plain material
    /// or texture application).
    pub fn material(index: u32) -> Self {
        Self {
            material: true,
            index,
            ..Self::default()
        }
    }

    /// Same style with an explicit transparency byte.
    pub fn with_transparency(mut self, transparency: u8) -> Self {
        self.transparency_defined = true;
        self.transparency = transparency;
        self
    }

    /// Same style with the given culling flags.
    pub fn with_culling(mut self, front: bool, back: bool) -> Self {
        self.front_culling = front;
        self.back_culling = back;
        self
    }
}

impl Default for StyleData {
    fn default() -> Self {
        Self {
            material: false,
            index: DEFAULT_COLOR_INDEX,
            transparency_defined: false,
            transparency: 0,
            front_culling: false,
            back_culling: false,
            line_pattern: DEFAULT_MATERIAL_INDEX,
            v_picture: false,
        }
    }
}
