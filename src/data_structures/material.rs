//! Surface material definitions used by the Phong shader.

use cgmath::Vector3;

/// A named set of Phong material properties.
///
/// Materials are defined once while preparing the scene and never change
/// afterwards. The `tag` is the lookup key used by draw calls.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub ambient_color: Vector3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: impl Into<String>,
        ambient_color: impl Into<Vector3<f32>>,
        ambient_strength: f32,
        diffuse_color: impl Into<Vector3<f32>>,
        specular_color: impl Into<Vector3<f32>>,
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.into(),
            ambient_color: ambient_color.into(),
            ambient_strength,
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        }
    }
}
