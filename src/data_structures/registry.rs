//! Texture and material registries.
//!
//! Both registries are insertion-ordered lists with first-match lookup by tag.
//! They are filled once while the scene is prepared and only read afterwards.
//!
//! A texture's position in [`TextureRegistry`] is also the texture unit it is
//! bound to: [`TextureRegistry::bind_all`] binds slot `i` to unit `i`, and the
//! draw-state pipeline hands slot `i` to the shader sampler.

use std::path::{Path, PathBuf};

use crate::{
    data_structures::material::Material,
    render::TextureBackend,
    resources::texture::decode_image,
};

/// Number of texture units available to the scene shader.
pub const MAX_TEXTURES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("texture registry is full ({capacity} slots), cannot register `{tag}`")]
    Full { tag: String, capacity: usize },
    #[error("a texture tagged `{0}` is already registered")]
    DuplicateTag(String),
    #[error("could not load image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {} has {channels} channels, only 3 and 4 are supported", path.display())]
    UnsupportedChannels { path: PathBuf, channels: u8 },
    #[error("could not upload texture `{tag}`: {reason}")]
    Upload { tag: String, reason: String },
}

/// A registered texture: its tag and the backend's handle for it.
#[derive(Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
}

/// Up to [`MAX_TEXTURES`] textures, addressed by tag or slot.
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_TEXTURES),
        }
    }
}

impl<H> TextureRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TextureEntry<H>] {
        &self.entries
    }

    fn check_free(&self, tag: &str) -> Result<(), RegistryError> {
        if self.entries.len() >= MAX_TEXTURES {
            return Err(RegistryError::Full {
                tag: tag.to_string(),
                capacity: MAX_TEXTURES,
            });
        }
        if self.find_slot(tag).is_some() {
            return Err(RegistryError::DuplicateTag(tag.to_string()));
        }
        Ok(())
    }

    /// Append an already created handle at the next free slot.
    pub fn insert(&mut self, tag: &str, handle: H) -> Result<usize, RegistryError> {
        self.check_free(tag)?;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(self.entries.len() - 1)
    }

    /// Decode `path`, upload it through `backend` and register it under `tag`.
    ///
    /// Capacity and tag uniqueness are checked before anything is decoded, so a
    /// failed registration leaves both the registry and the GPU untouched.
    /// Returns the slot the texture landed in.
    pub fn register_texture<B>(
        &mut self,
        backend: &mut B,
        path: &Path,
        tag: &str,
    ) -> Result<usize, RegistryError>
    where
        B: TextureBackend<Handle = H> + ?Sized,
    {
        let result = self.check_free(tag).and_then(|_| {
            let image = decode_image(path)?;
            backend
                .create_texture(&image, tag)
                .map_err(|err| RegistryError::Upload {
                    tag: tag.to_string(),
                    reason: format!("{err:#}"),
                })
        });
        match result {
            Ok(handle) => self.insert(tag, handle),
            Err(err) => {
                log::error!("Could not register texture `{tag}`: {err}");
                Err(err)
            }
        }
    }

    /// Bind every texture to the unit matching its slot.
    pub fn bind_all<B>(&self, backend: &mut B)
    where
        B: TextureBackend<Handle = H> + ?Sized,
    {
        for (slot, entry) in self.entries.iter().enumerate() {
            backend.bind_texture(slot as u32, &entry.handle);
        }
    }

    /// Slot of the first texture registered under `tag`.
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    pub fn find_handle(&self, tag: &str) -> Option<&H> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| &entry.handle)
    }

    /// Release every handle and empty the registry.
    pub fn destroy_all<B>(&mut self, backend: &mut B)
    where
        B: TextureBackend<Handle = H> + ?Sized,
    {
        for entry in self.entries.drain(..) {
            backend.release_texture(entry.handle);
        }
    }
}

/// Ordered list of materials. Duplicate tags are allowed but only the first
/// one is ever found.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, material: Material) {
        if self.find(&material.tag).is_some() {
            log::warn!(
                "Material `{}` is already defined, the new definition will never be used",
                material.tag
            );
        }
        self.materials.push(material);
    }

    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
