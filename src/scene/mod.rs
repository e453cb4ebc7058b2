//! Scene preparation and the per-frame draw sequence.
//!
//! [`SceneManager`] owns the texture registry, the material library, the light
//! rig and the list of objects to draw. It is generic over the backend's
//! texture handle so the same code runs against wgpu and against the fakes in
//! the integration tests.

pub mod desk;

use crate::{
    config::SceneConfig,
    data_structures::{
        light::LightRig,
        registry::{MaterialLibrary, RegistryError, TextureRegistry},
    },
    draw_state::{DrawState, RenderState, Surface},
    render::SceneBackend,
    resources::mesh::Shape,
    uniforms::UniformError,
};

/// Flat colour drawn in place of a texture that failed to load.
pub const MISSING_TEXTURE_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// One draw call: a primitive shape and everything the shader needs for it.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub label: String,
    pub shape: Shape,
    pub state: RenderState,
}

impl SceneObject {
    pub fn new(label: &str, shape: Shape, state: RenderState) -> Self {
        Self {
            label: label.to_string(),
            shape,
            state,
        }
    }
}

#[derive(Debug)]
pub struct TextureFailure {
    pub tag: String,
    pub error: RegistryError,
}

/// What [`SceneManager::prepare_scene`] had to work around.
#[derive(Debug, Default)]
pub struct PrepareReport {
    pub textures_registered: usize,
    pub texture_failures: Vec<TextureFailure>,
    /// Objects drawn with [`MISSING_TEXTURE_COLOR`] because their texture is not registered.
    pub fallback_objects: Vec<String>,
    /// Objects left out because their material is not defined.
    pub dropped_objects: Vec<String>,
}

impl PrepareReport {
    pub fn is_clean(&self) -> bool {
        self.texture_failures.is_empty()
            && self.fallback_objects.is_empty()
            && self.dropped_objects.is_empty()
    }
}

#[derive(Debug)]
pub struct SceneManager<H> {
    textures: TextureRegistry<H>,
    materials: MaterialLibrary,
    lights: LightRig,
    objects: Vec<SceneObject>,
}

impl<H> Default for SceneManager<H> {
    fn default() -> Self {
        Self {
            textures: TextureRegistry::new(),
            materials: MaterialLibrary::new(),
            lights: LightRig::new(),
            objects: Vec::new(),
        }
    }
}

impl<H> SceneManager<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Load the desk scene: textures from `config`, then materials, lights,
    /// meshes and the object list.
    ///
    /// Missing textures and unknown materials do not abort preparation, they
    /// end up in the returned report. Only a rejected uniform push is an error.
    pub fn prepare_scene<B>(
        &mut self,
        backend: &mut B,
        config: &SceneConfig,
    ) -> Result<PrepareReport, UniformError>
    where
        B: SceneBackend<Handle = H>,
    {
        let mut report = PrepareReport::default();

        for (tag, path) in config.texture_paths() {
            match self.textures.register_texture(backend, &path, tag) {
                Ok(_) => report.textures_registered += 1,
                Err(error) => report.texture_failures.push(TextureFailure {
                    tag: tag.to_string(),
                    error,
                }),
            }
        }
        self.textures.bind_all(backend);

        for material in desk::materials() {
            self.materials.define(material);
        }

        self.lights = desk::lights();
        self.lights.push(backend)?;

        for shape in Shape::ALL {
            backend.load_mesh(shape);
        }

        self.objects = self.resolve_objects(desk::objects(), &mut report);
        log::info!(
            "Scene prepared: {} textures, {} materials, {} objects",
            self.textures.len(),
            self.materials.len(),
            self.objects.len()
        );
        Ok(report)
    }

    /// Swap unresolved textures for the fallback colour and drop objects
    /// whose material is unknown, so every kept object applies cleanly.
    fn resolve_objects(&self, objects: Vec<SceneObject>, report: &mut PrepareReport) -> Vec<SceneObject> {
        objects
            .into_iter()
            .filter_map(|mut object| {
                if self.materials.find(&object.state.material).is_none() {
                    log::warn!(
                        "Dropping `{}`: material `{}` is not defined",
                        object.label,
                        object.state.material
                    );
                    report.dropped_objects.push(object.label);
                    return None;
                }
                if let Surface::Texture(tag) = &object.state.surface {
                    if self.textures.find_slot(tag).is_none() {
                        log::warn!("`{}` uses unregistered texture `{tag}`, drawing it flat", object.label);
                        object.state.surface = Surface::Color(MISSING_TEXTURE_COLOR);
                        report.fallback_objects.push(object.label.clone());
                    }
                }
                Some(object)
            })
            .collect()
    }

    /// Replay the draw sequence. Returns the number of objects drawn.
    pub fn render_scene<B>(&self, backend: &mut B) -> usize
    where
        B: SceneBackend<Handle = H>,
    {
        let state = DrawState::new(&self.textures, &self.materials);
        let mut drawn = 0;
        for object in &self.objects {
            match state.apply(backend, &object.state) {
                Ok(()) => {
                    backend.draw_mesh(object.shape);
                    drawn += 1;
                }
                Err(err) => log::error!("Skipping `{}`: {err}", object.label),
            }
        }
        drawn
    }

    /// Release every texture handle through the backend.
    pub fn destroy<B>(&mut self, backend: &mut B)
    where
        B: SceneBackend<Handle = H>,
    {
        self.textures.destroy_all(backend);
    }
}
