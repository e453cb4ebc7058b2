//! Shader uniform sink: the by-name parameter interface of the scene shader.
//!
//! Everything that changes shader state goes through [`UniformSink::set_uniform`].
//! The draw-state pipeline, the light rig and the scene view are pure producers
//! into a sink and keep no copy of what they pushed.
//!
//! [`ShaderUniforms`] is the CPU-side mirror of the WGSL uniform blocks in
//! `pipelines/phong.wgsl`. It routes each uniform name to a field of a
//! `bytemuck::Pod` struct that is uploaded verbatim. [`RecordingSink`] keeps an
//! ordered log of every push instead, which makes the pipeline observable in tests.

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::data_structures::light::MAX_LIGHTS;

pub const MODEL: &str = "model";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

/// A single uniform value, tagged with its GLSL-style type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    pub fn kind(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) => "int",
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<Vector2<f32>> for UniformValue {
    fn from(value: Vector2<f32>) -> Self {
        UniformValue::Vec2(value.into())
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(value: Vector3<f32>) -> Self {
        UniformValue::Vec3(value.into())
    }
}

impl From<cgmath::Point3<f32>> for UniformValue {
    fn from(value: cgmath::Point3<f32>) -> Self {
        UniformValue::Vec3(value.into())
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(value: Vector4<f32>) -> Self {
        UniformValue::Vec4(value.into())
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(value: Matrix4<f32>) -> Self {
        UniformValue::Mat4(value.into())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UniformError {
    #[error("the shader has no uniform named `{0}`")]
    UnknownName(String),
    #[error("uniform `{name}` expects a {expected} but got a {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("uniform `{name}` addresses light {index}, the shader declares {max}", max = MAX_LIGHTS)]
    LightIndex { name: String, index: usize },
}

/// Destination for uniform uploads by name.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError>;

    /// Whether pushes reach a shader program at all.
    fn is_bound(&self) -> bool {
        true
    }
}

impl<S: UniformSink + ?Sized> UniformSink for &mut S {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        (**self).set_uniform(name, value)
    }

    fn is_bound(&self) -> bool {
        (**self).is_bound()
    }
}

/// A missing sink stands for "no shader program bound": every push is dropped.
impl<S: UniformSink> UniformSink for Option<S> {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        match self {
            Some(sink) => sink.set_uniform(name, value),
            None => Ok(()),
        }
    }

    fn is_bound(&self) -> bool {
        self.as_ref().is_some_and(|sink| sink.is_bound())
    }
}

/**
 * Per-draw block, bound with a dynamic offset so every draw call keeps the
 * values that were current when it was issued.
 *
 * Field order and padding follow the WGSL `ObjectUniforms` struct.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub ambient_color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    pub use_texture: u32,
    pub uv_scale: [f32; 2],
    pub texture_slot: i32,
    _padding: u32,
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            model: identity,
            normal: identity,
            object_color: [1.0, 1.0, 1.0, 1.0],
            ambient_color: [1.0, 1.0, 1.0],
            ambient_strength: 0.1,
            diffuse_color: [1.0, 1.0, 1.0],
            shininess: 1.0,
            specular_color: [0.0, 0.0, 0.0],
            use_texture: 0,
            uv_scale: [1.0, 1.0],
            texture_slot: -1,
            _padding: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub focal_strength: f32,
    pub ambient_color: [f32; 3],
    pub specular_intensity: f32,
    pub diffuse_color: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub specular_color: [f32; 3],
    _padding2: u32,
}

/// Per-frame block: camera matrices and the light array.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub use_lighting: u32,
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            view: identity,
            projection: identity,
            view_position: [0.0; 3],
            use_lighting: 0,
            lights: [bytemuck::Zeroable::zeroed(); MAX_LIGHTS],
        }
    }
}

/// CPU-side mirror of the scene shader's uniform state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderUniforms {
    pub object: ObjectUniforms,
    pub frame: FrameUniforms,
}

impl ShaderUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_light(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let unknown = || UniformError::UnknownName(name.to_string());
        let rest = name.strip_prefix("lightSources[").ok_or_else(unknown)?;
        let (index, field) = rest.split_once("].").ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;
        let light = self
            .frame
            .lights
            .get_mut(index)
            .ok_or_else(|| UniformError::LightIndex {
                name: name.to_string(),
                index,
            })?;
        match field {
            "position" => light.position = vec3(name, value)?,
            "ambientColor" => light.ambient_color = vec3(name, value)?,
            "diffuseColor" => light.diffuse_color = vec3(name, value)?,
            "specularColor" => light.specular_color = vec3(name, value)?,
            "focalStrength" => light.focal_strength = float(name, value)?,
            "specularIntensity" => light.specular_intensity = float(name, value)?,
            _ => return Err(unknown()),
        }
        Ok(())
    }
}

impl UniformSink for ShaderUniforms {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        match name {
            MODEL => {
                let model = mat4(name, value)?;
                self.object.model = model;
                self.object.normal = normal_matrix(model);
            }
            OBJECT_COLOR => self.object.object_color = vec4(name, value)?,
            OBJECT_TEXTURE => self.object.texture_slot = int(name, value)?,
            USE_TEXTURE => self.object.use_texture = flag(name, value)?,
            USE_LIGHTING => self.frame.use_lighting = flag(name, value)?,
            UV_SCALE => self.object.uv_scale = vec2(name, value)?,
            VIEW => self.frame.view = mat4(name, value)?,
            PROJECTION => self.frame.projection = mat4(name, value)?,
            VIEW_POSITION => self.frame.view_position = vec3(name, value)?,
            MATERIAL_AMBIENT_COLOR => self.object.ambient_color = vec3(name, value)?,
            MATERIAL_AMBIENT_STRENGTH => self.object.ambient_strength = float(name, value)?,
            MATERIAL_DIFFUSE_COLOR => self.object.diffuse_color = vec3(name, value)?,
            MATERIAL_SPECULAR_COLOR => self.object.specular_color = vec3(name, value)?,
            MATERIAL_SHININESS => self.object.shininess = float(name, value)?,
            _ => self.set_light(name, value)?,
        }
        Ok(())
    }
}

/// Inverse transpose of the model matrix, used to move normals into world space.
/// Degenerate (zero-scale) models fall back to the model matrix itself.
fn normal_matrix(model: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let model = Matrix4::from(model);
    match model.invert() {
        Some(inverse) => inverse.transpose().into(),
        None => model.into(),
    }
}

fn mismatch(name: &str, expected: &'static str, value: UniformValue) -> UniformError {
    UniformError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: value.kind(),
    }
}

// Flags are accepted as bools or ints, the way GLSL treats them.
fn flag(name: &str, value: UniformValue) -> Result<u32, UniformError> {
    match value {
        UniformValue::Bool(b) => Ok(b as u32),
        UniformValue::Int(i) => Ok((i != 0) as u32),
        other => Err(mismatch(name, "bool", other)),
    }
}

fn int(name: &str, value: UniformValue) -> Result<i32, UniformError> {
    match value {
        UniformValue::Int(i) => Ok(i),
        other => Err(mismatch(name, "int", other)),
    }
}

fn float(name: &str, value: UniformValue) -> Result<f32, UniformError> {
    match value {
        UniformValue::Float(f) => Ok(f),
        other => Err(mismatch(name, "float", other)),
    }
}

fn vec2(name: &str, value: UniformValue) -> Result<[f32; 2], UniformError> {
    match value {
        UniformValue::Vec2(v) => Ok(v),
        other => Err(mismatch(name, "vec2", other)),
    }
}

fn vec3(name: &str, value: UniformValue) -> Result<[f32; 3], UniformError> {
    match value {
        UniformValue::Vec3(v) => Ok(v),
        other => Err(mismatch(name, "vec3", other)),
    }
}

fn vec4(name: &str, value: UniformValue) -> Result<[f32; 4], UniformError> {
    match value {
        UniformValue::Vec4(v) => Ok(v),
        other => Err(mismatch(name, "vec4", other)),
    }
}

fn mat4(name: &str, value: UniformValue) -> Result<[[f32; 4]; 4], UniformError> {
    match value {
        UniformValue::Mat4(m) => Ok(m),
        other => Err(mismatch(name, "mat4", other)),
    }
}

/// Sink that records every push in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pushes: Vec<(String, UniformValue)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value pushed under `name`.
    pub fn last(&self, name: &str) -> Option<&UniformValue> {
        self.pushes
            .iter()
            .rev()
            .find(|(pushed, _)| pushed == name)
            .map(|(_, value)| value)
    }

    pub fn pushes(&self) -> &[(String, UniformValue)] {
        &self.pushes
    }

    pub fn len(&self) -> usize {
        self.pushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pushes.is_empty()
    }

    pub fn clear(&mut self) {
        self.pushes.clear();
    }
}

impl UniformSink for RecordingSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        self.pushes.push((name.to_string(), value));
        Ok(())
    }
}
