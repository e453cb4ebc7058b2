use std::path::Path;

use desk_scene::{
    config::{SceneConfig, TextureSource},
    render::{MeshDrawer, TextureBackend},
    resources::{mesh::Shape, texture::DecodedImage},
    uniforms::{ObjectUniforms, ShaderUniforms, UniformError, UniformSink, UniformValue},
};
use tempfile::TempDir;

/// Backend that keeps everything in memory and records what the scene asked for.
///
/// Handles are plain numbers handed out in creation order.
pub(crate) struct FakeBackend {
    pub uniforms: ShaderUniforms,
    pub created: Vec<(u32, String)>,
    pub bound: Vec<(u32, u32)>,
    pub released: Vec<u32>,
    pub loaded: Vec<Shape>,
    pub draws: Vec<(Shape, ObjectUniforms)>,
    pub reject_uploads: Vec<String>,
    next_handle: u32,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            uniforms: ShaderUniforms::new(),
            created: Vec::new(),
            bound: Vec::new(),
            released: Vec::new(),
            loaded: Vec::new(),
            draws: Vec::new(),
            reject_uploads: Vec::new(),
            next_handle: 0,
        }
    }

    /// Make `create_texture` fail for `label`.
    pub fn rejecting(mut self, label: &str) -> Self {
        self.reject_uploads.push(label.to_string());
        self
    }

    pub fn created_labels(&self) -> Vec<&str> {
        self.created.iter().map(|(_, label)| label.as_str()).collect()
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSink for FakeBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        self.uniforms.set_uniform(name, value)
    }
}

impl TextureBackend for FakeBackend {
    type Handle = u32;

    fn create_texture(&mut self, _image: &DecodedImage, label: &str) -> anyhow::Result<u32> {
        if self.reject_uploads.iter().any(|rejected| rejected == label) {
            anyhow::bail!("out of texture memory");
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.created.push((handle, label.to_string()));
        Ok(handle)
    }

    fn bind_texture(&mut self, unit: u32, handle: &u32) {
        self.bound.push((unit, *handle));
    }

    fn release_texture(&mut self, handle: u32) {
        self.released.push(handle);
    }
}

impl MeshDrawer for FakeBackend {
    fn load_mesh(&mut self, shape: Shape) {
        if !self.loaded.contains(&shape) {
            self.loaded.push(shape);
        }
    }

    fn draw_mesh(&mut self, shape: Shape) {
        self.draws.push((shape, self.uniforms.object));
    }
}

/// Write a small RGB image for every manifest entry except `skip`.
pub(crate) fn write_textures(dir: &Path, textures: &[TextureSource], skip: &[&str]) {
    for source in textures {
        if skip.contains(&source.tag.as_str()) {
            continue;
        }
        let image = image::RgbImage::from_fn(4, 4, |x, y| image::Rgb([(x * 60) as u8, (y * 60) as u8, 128]));
        image.save(dir.join(&source.file_name)).unwrap();
    }
}

/// Default scene config reading its textures from a fresh temporary directory.
/// Keep the returned `TempDir` alive for as long as the files are needed.
pub(crate) fn config_with_textures(skip: &[&str]) -> (TempDir, SceneConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = SceneConfig {
        asset_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    write_textures(dir.path(), &config.textures, skip);
    (dir, config)
}
