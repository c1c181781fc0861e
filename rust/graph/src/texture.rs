// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Texture image export and UV transform decomposition.

use std::path::Path;

use cad_scene_model::Picture;
use nalgebra::Vector3;

use crate::error::Result;
use crate::scene::TextureTransform;

/// File name for an exported picture, derived from its store index and
/// pixel format.
pub fn picture_file_name(index: u32, picture: &Picture) -> String {
    format!("texture{}.{}", index, picture.format.extension())
}

/// Writes raw picture bytes to disk.
pub fn write_picture(path: &Path, picture: &Picture) -> Result<()> {
    std::fs::write(path, &picture.data)?;
    Ok(())
}

/// Splits a 4x4 UV matrix into the translation, scale and rotation the
/// scene output carries.
pub fn decompose_transform(coefficients: &[f64; 16]) -> TextureTransform {
    let u = Vector3::new(coefficients[0], coefficients[1], coefficients[2]);
    let v = Vector3::new(coefficients[4], coefficients[5], coefficients[6]);

    TextureTransform {
        translation: [coefficients[12], coefficients[13]],
        scale: [u.norm(), v.norm()],
        rotation: coefficients[1].atan2(coefficients[0]),
    }
}
