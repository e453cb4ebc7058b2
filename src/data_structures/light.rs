//! Point lights feeding the `lightSources[]` uniform array.

use cgmath::Vector3;

use crate::uniforms::{self, UniformError, UniformSink, UniformValue};

/// Number of light slots the shader declares.
pub const MAX_LIGHTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vector3<f32>,
    pub ambient_color: Vector3<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    /// Exponent applied to the specular highlight.
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    /// A light that contributes nothing. Unused slots are filled with it.
    pub fn off() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            ambient_color: Vector3::new(0.0, 0.0, 0.0),
            diffuse_color: Vector3::new(0.0, 0.0, 0.0),
            specular_color: Vector3::new(0.0, 0.0, 0.0),
            focal_strength: 1.0,
            specular_intensity: 0.0,
        }
    }
}

/// Up to [`MAX_LIGHTS`] lights, pushed to the shader once per scene.
#[derive(Clone, Debug, Default)]
pub struct LightRig {
    lights: Vec<LightSource>,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light. Returns `false` and drops the light once all slots are taken.
    pub fn add(&mut self, light: LightSource) -> bool {
        if self.lights.len() >= MAX_LIGHTS {
            log::warn!("Light rig is full ({MAX_LIGHTS} lights), ignoring additional light");
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// Enable lighting and push every slot. Slots without a light are switched off
    /// so that a previously configured rig does not bleed through.
    pub fn push(&self, sink: &mut impl UniformSink) -> Result<(), UniformError> {
        sink.set_uniform(uniforms::USE_LIGHTING, UniformValue::Bool(true))?;
        for index in 0..MAX_LIGHTS {
            let light = self.lights.get(index).copied().unwrap_or_else(LightSource::off);
            let field = |name: &str| format!("lightSources[{index}].{name}");
            sink.set_uniform(&field("position"), light.position.into())?;
            sink.set_uniform(&field("ambientColor"), light.ambient_color.into())?;
            sink.set_uniform(&field("diffuseColor"), light.diffuse_color.into())?;
            sink.set_uniform(&field("specularColor"), light.specular_color.into())?;
            sink.set_uniform(&field("focalStrength"), light.focal_strength.into())?;
            sink.set_uniform(&field("specularIntensity"), light.specular_intensity.into())?;
        }
        Ok(())
    }
}
