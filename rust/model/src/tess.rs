// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw tessellation buffers owned by representation items.
//!
//! The upstream kernel tessellates exact geometry into flat coordinate
//! arrays and per-face triangle index lists. Indices are raw element
//! offsets into the flat arrays (stride 3 for positions/normals, stride 2
//! for texcoords), exactly as emitted — the conversion engine welds on
//! those offsets, never on coordinate values.

use crate::style::StyleData;

/// One topological face of a tessellation.
///
/// The three index arrays run in parallel, one entry per triangle corner
/// (three per triangle). `texcoord_indices` is empty when the tessellation
/// carries no texture coordinates.
#[derive(Debug, Clone, Default)]
pub struct TessFace {
    /// Offsets into [`Tessellation::positions`].
    pub position_indices: Vec<u32>,
    /// Offsets into [`Tessellation::normals`].
    pub normal_indices: Vec<u32>,
    /// Offsets into [`Tessellation::texcoords`], or empty.
    pub texcoord_indices: Vec<u32>,
    /// Face-level show override; `None` inherits the item-level value.
    pub show: Option<bool>,
    /// Face-level removed override; `None` inherits the item-level value.
    pub removed: Option<bool>,
    /// Face-level style override; `None` inherits the item-level value.
    pub style: Option<StyleData>,
}

impl TessFace {
    /// Face made of the given triangle corner offsets, no overrides.
    pub fn new(position_indices: Vec<u32>, normal_indices: Vec<u32>) -> Self {
        Self {
            position_indices,
            normal_indices,
            ..Self::default()
        }
    }

    pub fn with_texcoords(mut self, texcoord_indices: Vec<u32>) -> Self {
        self.texcoord_indices = texcoord_indices;
        self
    }

    pub fn with_style(mut self, style: StyleData) -> Self {
        self.style = Some(style);
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

    /// Number of whole triangles this face carries.
    pub fn triangle_count(&self) -> usize {
        self.position_indices.len() / 3
    }
}

/// Triangulated geometry attached to a representation item.
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    /// Flat xyz coordinates.
    pub positions: Vec<f64>,
    /// Flat xyz normals.
    pub normals: Vec<f64>,
    /// Flat uv coordinates; empty when the item is untextured.
    pub texcoords: Vec<f64>,
    /// Topological faces, each a list of triangles.
    pub faces: Vec<TessFace>,
}

impl Tessellation {
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// xyz at a raw element offset, `None` when out of range.
    pub fn position(&self, offset: u32) -> Option<[f64; 3]> {
        triple(&self.positions, offset)
    }

    /// Normal xyz at a raw element offset, `None` when out of range.
    pub fn normal(&self, offset: u32) -> Option<[f64; 3]> {
        triple(&self.normals, offset)
    }

    /// uv at a raw element offset, `None` when out of range.
    pub fn texcoord(&self, offset: u32) -> Option<[f64; 2]> {
        let i = offset as usize;
        let uv = self.texcoords.get(i..i + 2)?;
        Some([uv[0], uv[1]])
    }
}

fn triple(values: &[f64], offset: u32) -> Option<[f64; 3]> {
    let i = offset as usize;
    let xyz = values.get(i..i + 3)?;
    Some([xyz[0], xyz[1], xyz[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_access_is_bounds_checked() {
        let tess = Tessellation {
            positions: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            normals: vec![0.0, 0.0, 1.0],
            ..Tessellation::default()
        };

        assert_eq!(tess.position(0), Some([0.0, 1.0, 2.0]));
        assert_eq!(tess.position(3), Some([3.0, 4.0, 5.0]));
        // Offsets are element offsets, not point numbers.
        assert_eq!(tess.position(1), Some([1.0, 2.0, 3.0]));
        assert_eq!(tess.position(4), None);
        assert_eq!(tess.normal(0), Some([0.0, 0.0, 1.0]));
        assert_eq!(tess.texcoord(0), None);
        assert!(!tess.has_texcoords());
    }

    #[test]
    fn face_triangle_count() {
        let face = TessFace::new(vec![0, 3, 6, 6, 3, 9], vec![0, 0, 0, 0, 0, 0]);
        assert_eq!(face.triangle_count(), 2);
    }
}
