//! Per-draw transformation data.
//!
//! Every object in the scene is placed by a [`Transform`]: a non-uniform scale,
//! three independent axis rotations in degrees, and a translation. The model
//! matrix is always composed as `T · Rx · Ry · Rz · S`.

use cgmath::{Deg, Matrix4, Vector3};

/// Rotation angles in degrees around the X, Y and Z axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerDegrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerDegrees {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Scale, rotation and position of a single draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation: EulerDegrees,
    pub position: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (unit scale, no rotation, at the origin).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: EulerDegrees::default(),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn from_parts(
        scale: impl Into<Vector3<f32>>,
        rotation: EulerDegrees,
        position: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation,
            position: position.into(),
        }
    }

    /// Compose the model matrix.
    ///
    /// Rotations are applied X-then-Y-then-Z on the right of the translation,
    /// so the translation column of the result always equals `position`.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}
