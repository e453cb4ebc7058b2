//! Backend seams between the scene logic and the GPU.
//!
//! The scene never talks to wgpu directly. It goes through three traits that a
//! backend implements together (see [`SceneBackend`]):
//!
//! - [`UniformSink`] receives named shader parameters
//! - [`TextureBackend`] creates, binds and releases textures
//! - [`MeshDrawer`] loads and draws the primitive shapes
//!
//! [`crate::renderer::GpuRenderer`] is the wgpu implementation.

use crate::{resources::mesh::Shape, resources::texture::DecodedImage, uniforms::UniformSink};

pub trait TextureBackend {
    /// Backend resource for one texture.
    type Handle;

    /// Upload an image as a repeat-wrapped, linearly filtered, mipmapped 2D texture.
    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> anyhow::Result<Self::Handle>;

    /// Make `handle` the texture sampled through `unit`.
    fn bind_texture(&mut self, unit: u32, handle: &Self::Handle);

    fn release_texture(&mut self, handle: Self::Handle);
}

pub trait MeshDrawer {
    /// Create the GPU geometry for `shape`. Loading a shape twice is a no-op.
    fn load_mesh(&mut self, shape: Shape);

    /// Draw `shape` with whatever uniform state is current.
    fn draw_mesh(&mut self, shape: Shape);
}

/// Everything the scene needs from a backend.
pub trait SceneBackend: UniformSink + TextureBackend + MeshDrawer {}

impl<T: UniformSink + TextureBackend + MeshDrawer + ?Sized> SceneBackend for T {}
