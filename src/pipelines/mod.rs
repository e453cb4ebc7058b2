//! Render pipelines.
//!
//! `phong` is the lit, textured scene pipeline together with its shader and
//! bind group layouts.

pub mod phong;
