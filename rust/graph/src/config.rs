// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion configuration.

use std::path::PathBuf;

/// Settings for one conversion run, passed by reference into the builder.
///
/// # Example
///
/// ```
/// use cad_scene_graph::SceneConfig;
///
/// let config = SceneConfig {
///     texture_dir: "/tmp/textures".into(),
///     ..SceneConfig::default()
/// };
/// assert_eq!(config.default_color, [1.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Directory embedded texture images are written to.
    pub texture_dir: PathBuf,
    /// Diffuse color applied when a style carries no explicit color index.
    pub default_color: [f64; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_dir: std::env::temp_dir(),
            default_color: [1.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fallbacks() {
        let config = SceneConfig::default();
        assert_eq!(config.texture_dir, std::env::temp_dir());
        assert_eq!(config.default_color, [1.0, 0.0, 0.0]);
    }
}
