//! Scene data types.
//!
//! - `transform` holds scale, Euler rotation and position and builds model matrices
//! - `material` describes Phong surface parameters
//! - `light` holds the fixed set of point lights pushed each frame
//! - `registry` contains the texture registry and the material library
//! - `texture` wraps GPU textures and their creation

pub mod light;
pub mod material;
pub mod registry;
pub mod texture;
pub mod transform;
