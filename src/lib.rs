//! desk-scene
//!
//! A small retained renderer that draws a desk, built entirely from primitive
//! meshes, with Phong lighting and a fly camera. Objects describe their
//! per-draw state declaratively; a backend trait receives uniform pushes,
//! texture binds and mesh draws, which keeps the scene logic testable without
//! a GPU.
//!
//! High-level modules
//! - `uniforms`: shader uniform names, values and the CPU-side uniform blocks
//! - `data_structures`: transforms, materials, lights and the texture registry
//! - `draw_state`: resolves a per-draw `RenderState` into uniform pushes
//! - `camera` / `view`: fly camera, projection and input handling
//! - `scene`: the desk object list and the `SceneManager` that replays it
//! - `render` / `renderer`: backend traits and their wgpu implementation
//! - `context` / `flow`: window, device and the winit application loop
//! - `pipelines`, `resources`: shaders, mesh generation and image decoding
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod draw_state;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod uniforms;
pub mod view;
