//! Per-draw shader state.
//!
//! [`DrawState`] turns transform parameters and texture/material tags into
//! uniform pushes on a [`UniformSink`]. It keeps nothing between calls: the
//! sink's current values are the only state, so a setter that is skipped
//! leaves whatever the previous draw pushed.
//!
//! The individual setters keep those leaking semantics. [`DrawState::apply`]
//! takes a complete [`RenderState`] instead and pushes every per-draw value,
//! after first making sure all of its tags resolve.

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    data_structures::{
        material::Material,
        registry::{MaterialLibrary, TextureRegistry},
        transform::{EulerDegrees, Transform},
    },
    uniforms::{self, UniformError, UniformSink, UniformValue},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DrawStateError {
    #[error("no texture registered under `{0}`")]
    UnknownTexture(String),
    #[error("no material defined under `{0}`")]
    UnknownMaterial(String),
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

/// What an object's surface looks like: a flat colour or a registered texture.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    Color([f32; 4]),
    Texture(String),
}

/// Every per-draw value, set explicitly so nothing leaks from the previous draw.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub transform: Transform,
    pub surface: Surface,
    pub material: String,
    pub uv_scale: [f32; 2],
}

impl RenderState {
    pub fn colored(transform: Transform, color: [f32; 4], material: &str) -> Self {
        Self {
            transform,
            surface: Surface::Color(color),
            material: material.to_string(),
            uv_scale: [1.0, 1.0],
        }
    }

    pub fn textured(transform: Transform, texture: &str, material: &str) -> Self {
        Self {
            transform,
            surface: Surface::Texture(texture.to_string()),
            material: material.to_string(),
            uv_scale: [1.0, 1.0],
        }
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = [u, v];
        self
    }
}

/// Read-only view of the registries used to resolve tags while drawing.
pub struct DrawState<'r, H> {
    textures: &'r TextureRegistry<H>,
    materials: &'r MaterialLibrary,
}

impl<'r, H> DrawState<'r, H> {
    pub fn new(textures: &'r TextureRegistry<H>, materials: &'r MaterialLibrary) -> Self {
        Self {
            textures,
            materials,
        }
    }

    /// Push the model matrix `T · Rx · Ry · Rz · S` for `transform`.
    pub fn set_transform(
        &self,
        sink: &mut impl UniformSink,
        transform: &Transform,
    ) -> Result<(), DrawStateError> {
        sink.set_uniform(uniforms::MODEL, transform.to_matrix().into())?;
        Ok(())
    }

    /// Same as [`Self::set_transform`] with the parameters spelled out.
    pub fn set_transformations(
        &self,
        sink: &mut impl UniformSink,
        scale: Vector3<f32>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: Vector3<f32>,
    ) -> Result<(), DrawStateError> {
        let transform = Transform::from_parts(
            scale,
            EulerDegrees::new(x_rotation_degrees, y_rotation_degrees, z_rotation_degrees),
            position,
        );
        self.set_transform(sink, &transform)
    }

    pub fn set_color(
        &self,
        sink: &mut impl UniformSink,
        color: [f32; 4],
    ) -> Result<(), DrawStateError> {
        sink.set_uniform(uniforms::USE_TEXTURE, false.into())?;
        sink.set_uniform(uniforms::OBJECT_COLOR, Vector4::from(color).into())?;
        Ok(())
    }

    /// Sample the texture registered under `tag`. Nothing is pushed when the
    /// tag is unknown.
    pub fn set_texture(&self, sink: &mut impl UniformSink, tag: &str) -> Result<(), DrawStateError> {
        if !sink.is_bound() {
            return Ok(());
        }
        let slot = self.resolve_texture(tag)?;
        push_texture(sink, slot)
    }

    /// Push the material registered under `tag`.
    ///
    /// An unknown tag pushes nothing, so the previous material stays in effect.
    pub fn set_material(&self, sink: &mut impl UniformSink, tag: &str) -> Result<(), DrawStateError> {
        if !sink.is_bound() {
            return Ok(());
        }
        let material = self.resolve_material(tag)?;
        push_material(sink, material)
    }

    pub fn set_texture_uv_scale(
        &self,
        sink: &mut impl UniformSink,
        u: f32,
        v: f32,
    ) -> Result<(), DrawStateError> {
        sink.set_uniform(uniforms::UV_SCALE, Vector2::new(u, v).into())?;
        Ok(())
    }

    /// Push a complete render state.
    ///
    /// Texture and material tags are resolved before the first push: if either
    /// is unknown the sink is left exactly as it was.
    pub fn apply(&self, sink: &mut impl UniformSink, state: &RenderState) -> Result<(), DrawStateError> {
        let slot = match &state.surface {
            Surface::Texture(tag) => Some(self.resolve_texture(tag)?),
            Surface::Color(_) => None,
        };
        let material = self.resolve_material(&state.material)?;

        self.set_transform(sink, &state.transform)?;
        match (slot, &state.surface) {
            (Some(slot), _) => push_texture(sink, slot)?,
            (None, Surface::Color(color)) => self.set_color(sink, *color)?,
            // a texture surface always resolved to a slot above
            (None, Surface::Texture(_)) => {}
        }
        push_material(sink, material)?;
        self.set_texture_uv_scale(sink, state.uv_scale[0], state.uv_scale[1])
    }

    /// Check that `state` would apply cleanly without pushing anything.
    pub fn validate(&self, state: &RenderState) -> Result<(), DrawStateError> {
        if let Surface::Texture(tag) = &state.surface {
            self.resolve_texture(tag)?;
        }
        self.resolve_material(&state.material).map(|_| ())
    }

    fn resolve_texture(&self, tag: &str) -> Result<usize, DrawStateError> {
        self.textures.find_slot(tag).ok_or_else(|| {
            log::warn!("Texture `{tag}` is not registered");
            DrawStateError::UnknownTexture(tag.to_string())
        })
    }

    fn resolve_material(&self, tag: &str) -> Result<&'r Material, DrawStateError> {
        self.materials.find(tag).ok_or_else(|| {
            log::warn!("Material `{tag}` is not defined");
            DrawStateError::UnknownMaterial(tag.to_string())
        })
    }
}

fn push_texture(sink: &mut impl UniformSink, slot: usize) -> Result<(), DrawStateError> {
    sink.set_uniform(uniforms::USE_TEXTURE, true.into())?;
    sink.set_uniform(uniforms::OBJECT_TEXTURE, UniformValue::Int(slot as i32))?;
    Ok(())
}

fn push_material(sink: &mut impl UniformSink, material: &Material) -> Result<(), DrawStateError> {
    sink.set_uniform(uniforms::MATERIAL_AMBIENT_COLOR, material.ambient_color.into())?;
    sink.set_uniform(uniforms::MATERIAL_AMBIENT_STRENGTH, material.ambient_strength.into())?;
    sink.set_uniform(uniforms::MATERIAL_DIFFUSE_COLOR, material.diffuse_color.into())?;
    sink.set_uniform(uniforms::MATERIAL_SPECULAR_COLOR, material.specular_color.into())?;
    sink.set_uniform(uniforms::MATERIAL_SHININESS, material.shininess.into())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Matrix4};

    use super::*;
    use crate::uniforms::{RecordingSink, ShaderUniforms};

    fn registries() -> (TextureRegistry<u32>, MaterialLibrary) {
        let mut textures = TextureRegistry::new();
        textures.insert("wood", 10).unwrap();
        textures.insert("marble", 11).unwrap();
        textures.insert("gold", 12).unwrap();
        let mut materials = MaterialLibrary::new();
        materials.define(Material::new("gold", (1.0, 0.9, 0.6), 0.5, (0.8, 0.6, 0.2), (1.0, 0.8, 0.6), 2.0));
        materials.define(Material::new("glass", (0.3, 0.4, 0.4), 0.1, (0.1, 0.1, 0.1), (1.8, 1.8, 1.8), 64.0));
        (textures, materials)
    }

    fn approx_eq(a: Matrix4<f32>, b: Matrix4<f32>) -> bool {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        a.iter().flatten().zip(b.iter().flatten()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn transform_is_translate_rotate_scale() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();
        state
            .set_transformations(&mut sink, Vector3::new(2.0, 1.0, 1.0), 0.0, 90.0, 0.0, Vector3::new(0.0, 0.0, 0.0))
            .unwrap();

        let expected = Matrix4::from_angle_y(Deg(90.0)) * Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0);
        match sink.last(uniforms::MODEL) {
            Some(UniformValue::Mat4(m)) => assert!(approx_eq(Matrix4::from(*m), expected)),
            other => panic!("no model matrix pushed: {other:?}"),
        }
    }

    #[test]
    fn translation_column_matches_position() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();
        state
            .set_transformations(&mut sink, Vector3::new(3.0, 0.5, 2.0), 30.0, 45.0, 60.0, Vector3::new(-6.5, 4.5, 1.5))
            .unwrap();
        match sink.last(uniforms::MODEL) {
            Some(UniformValue::Mat4(m)) => assert_eq!(m[3], [-6.5, 4.5, 1.5, 1.0]),
            other => panic!("no model matrix pushed: {other:?}"),
        }
    }

    #[test]
    fn color_and_texture_toggle_the_texture_flag() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();

        state.set_color(&mut sink, [1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(sink.last(uniforms::USE_TEXTURE), Some(&UniformValue::Bool(false)));
        assert_eq!(sink.last(uniforms::OBJECT_COLOR), Some(&UniformValue::Vec4([1.0, 0.0, 0.0, 1.0])));

        state.set_texture(&mut sink, "marble").unwrap();
        assert_eq!(sink.last(uniforms::USE_TEXTURE), Some(&UniformValue::Bool(true)));
        assert_eq!(sink.last(uniforms::OBJECT_TEXTURE), Some(&UniformValue::Int(1)));
    }

    #[test]
    fn unknown_texture_pushes_nothing() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();
        assert_eq!(
            state.set_texture(&mut sink, "abstract"),
            Err(DrawStateError::UnknownTexture("abstract".to_string()))
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn unknown_material_keeps_the_previous_one() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut uniforms = ShaderUniforms::new();

        state.set_material(&mut uniforms, "gold").unwrap();
        let gold = uniforms.object;
        assert_eq!(gold.shininess, 2.0);
        assert_eq!(gold.ambient_strength, 0.5);

        let err = state.set_material(&mut uniforms, "nonexistent").unwrap_err();
        assert_eq!(err, DrawStateError::UnknownMaterial("nonexistent".to_string()));
        assert_eq!(uniforms.object, gold);
    }

    #[test]
    fn material_pushes_all_five_fields() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();
        state.set_material(&mut sink, "glass").unwrap();
        let names: Vec<_> = sink.pushes().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            [
                uniforms::MATERIAL_AMBIENT_COLOR,
                uniforms::MATERIAL_AMBIENT_STRENGTH,
                uniforms::MATERIAL_DIFFUSE_COLOR,
                uniforms::MATERIAL_SPECULAR_COLOR,
                uniforms::MATERIAL_SHININESS,
            ]
        );
        assert_eq!(sink.last(uniforms::MATERIAL_SPECULAR_COLOR), Some(&UniformValue::Vec3([1.8, 1.8, 1.8])));
    }

    #[test]
    fn uv_scale_is_pushed_as_vec2() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();
        state.set_texture_uv_scale(&mut sink, 2.0, 4.0).unwrap();
        assert_eq!(sink.last(uniforms::UV_SCALE), Some(&UniformValue::Vec2([2.0, 4.0])));
    }

    #[test]
    fn missing_sink_is_a_no_op() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink: Option<RecordingSink> = None;
        state.set_color(&mut sink, [0.0, 0.0, 0.0, 1.0]).unwrap();
        state.set_texture(&mut sink, "wood").unwrap();
        state.set_material(&mut sink, "gold").unwrap();
        state.set_transform(&mut sink, &Transform::new()).unwrap();
        // unknown tags go unnoticed without a bound program
        state.set_texture(&mut sink, "velvet").unwrap();
        state.set_material(&mut sink, "velvet").unwrap();
        assert!(sink.is_none());
    }

    #[test]
    fn apply_sets_every_per_draw_value() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut uniforms = ShaderUniforms::new();

        let textured = RenderState::textured(Transform::from(Vector3::new(1.0, 2.0, 3.0)), "gold", "glass")
            .with_uv_scale(2.0, 2.0);
        state.apply(&mut uniforms, &textured).unwrap();
        assert_eq!(uniforms.object.use_texture, 1);
        assert_eq!(uniforms.object.texture_slot, 2);
        assert_eq!(uniforms.object.uv_scale, [2.0, 2.0]);
        assert_eq!(uniforms.object.shininess, 64.0);

        // nothing from the textured draw survives into the coloured one
        let colored = RenderState::colored(Transform::new(), [0.0, 1.0, 0.0, 1.0], "gold");
        state.apply(&mut uniforms, &colored).unwrap();
        assert_eq!(uniforms.object.use_texture, 0);
        assert_eq!(uniforms.object.object_color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniforms.object.uv_scale, [1.0, 1.0]);
        assert_eq!(uniforms.object.shininess, 2.0);
        assert_eq!(uniforms.object.model[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let mut sink = RecordingSink::new();

        let bad_material = RenderState::textured(Transform::new(), "wood", "chrome");
        assert_eq!(
            state.apply(&mut sink, &bad_material),
            Err(DrawStateError::UnknownMaterial("chrome".to_string()))
        );
        let bad_texture = RenderState::textured(Transform::new(), "abstract", "gold");
        assert!(matches!(
            state.apply(&mut sink, &bad_texture),
            Err(DrawStateError::UnknownTexture(_))
        ));
        assert!(sink.is_empty());
        assert!(state.validate(&bad_material).is_err());
        assert!(state.validate(&RenderState::textured(Transform::new(), "wood", "gold")).is_ok());
    }

    #[test]
    fn uniform_errors_are_forwarded() {
        struct Rejecting;
        impl UniformSink for Rejecting {
            fn set_uniform(&mut self, name: &str, _: UniformValue) -> Result<(), UniformError> {
                Err(UniformError::UnknownName(name.to_string()))
            }
        }
        let (textures, materials) = registries();
        let state = DrawState::new(&textures, &materials);
        let err = state.set_texture_uv_scale(&mut Rejecting, 1.0, 1.0).unwrap_err();
        assert_eq!(err, DrawStateError::Uniform(UniformError::UnknownName("UVscale".to_string())));
    }
}
