use std::path::PathBuf;

use crate::resources::{asset_dir, asset_path};

/// A texture to register while preparing the scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSource {
    pub tag: String,
    pub file_name: String,
}

impl TextureSource {
    pub fn new(tag: &str, file_name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            file_name: file_name.to_string(),
        }
    }
}

/// Application settings.
///
/// `Default` gives the desk scene as shipped: a 1000x800 window, textures read
/// from [`asset_dir`] and the full texture manifest.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_dir: PathBuf,
    pub clear_colour: wgpu::Color,
    pub textures: Vec<TextureSource>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "Desk Scene".to_string(),
            width: 1000,
            height: 800,
            asset_dir: asset_dir(),
            clear_colour: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            textures: desk_textures(),
        }
    }
}

impl SceneConfig {
    /// Full path of every manifest entry, paired with its tag.
    pub fn texture_paths(&self) -> impl Iterator<Item = (&str, PathBuf)> + '_ {
        self.textures
            .iter()
            .map(|source| (source.tag.as_str(), asset_path(&self.asset_dir, &source.file_name)))
    }
}

/// The sixteen textures the desk scene uses, in slot order.
pub fn desk_textures() -> Vec<TextureSource> {
    [
        ("wood", "wood.jpg"),
        ("plant", "plant.jpg"),
        ("marble", "black_marble.jpg"),
        ("tile", "tile.jpg"),
        ("coffee", "coffee.png"),
        ("metallic", "metallic.jpg"),
        ("silver", "silver_floral.jpeg"),
        ("gold", "gold.jpg"),
        ("gold2", "gold2.jpeg"),
        ("floor", "pavers.jpg"),
        ("cylinder", "gold-seamless-texture.jpg"),
        ("cylinder_top", "circular-brushed-gold-texture.jpg"),
        ("plank", "rusticwood.jpg"),
        ("box", "tilesf2.jpg"),
        ("ball", "stainedglass.jpg"),
        ("cone", "abstract.jpg"),
    ]
    .into_iter()
    .map(|(tag, file)| TextureSource::new(tag, file))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::registry::MAX_TEXTURES;

    #[test]
    fn manifest_fits_the_texture_units() {
        let textures = desk_textures();
        assert_eq!(textures.len(), MAX_TEXTURES);
        let mut tags: Vec<_> = textures.iter().map(|t| t.tag.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), MAX_TEXTURES);
    }

    #[test]
    fn paths_are_joined_onto_the_asset_dir() {
        let config = SceneConfig {
            asset_dir: PathBuf::from("/tmp/desk"),
            ..Default::default()
        };
        let (tag, path) = config.texture_paths().nth(2).unwrap();
        assert_eq!(tag, "marble");
        assert_eq!(path, PathBuf::from("/tmp/desk/black_marble.jpg"));
    }
}
