//! wgpu implementation of the scene backend traits.
//!
//! Uniform pushes update a CPU copy of the shader's uniform blocks. Each
//! `draw_mesh` call snapshots the per-object block, and [`GpuRenderer::flush`]
//! uploads all snapshots into one dynamic-offset buffer before replaying the
//! draws in order. That keeps the "last pushed value wins" behaviour of an
//! immediate-mode API while wgpu only sees one buffer write per frame.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{registry::MAX_TEXTURES, texture::{self, Texture}},
    pipelines::phong::{PhongLayouts, SAMPLER_BINDING, mk_phong_pipeline},
    render::{MeshDrawer, TextureBackend},
    resources::{
        mesh::{Shape, build_mesh},
        texture::DecodedImage,
    },
    uniforms::{ObjectUniforms, ShaderUniforms, UniformError, UniformSink, UniformValue},
};

const INITIAL_DRAW_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

/// Where a frame is drawn to.
pub struct FrameTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
    pub clear_colour: wgpu::Color,
}

pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    layouts: PhongLayouts,
    uniforms: ShaderUniforms,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: usize,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    placeholder: Texture,
    units: Vec<Option<Texture>>,
    texture_bind_group: Option<wgpu::BindGroup>,
    meshes: HashMap<Shape, GpuMesh>,
    draws: Vec<(Shape, ObjectUniforms)>,
}

impl GpuRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let layouts = PhongLayouts::new(device);
        let pipeline = mk_phong_pipeline(device, color_format, &layouts);

        let uniforms = ShaderUniforms::new();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms.frame]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let object_stride = object_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (object_buffer, object_bind_group) =
            mk_object_buffer(device, &layouts.object, object_stride, INITIAL_DRAW_CAPACITY);

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            uniforms,
            frame_buffer,
            frame_bind_group,
            object_stride,
            object_capacity: INITIAL_DRAW_CAPACITY,
            object_buffer,
            object_bind_group,
            sampler: texture::create_scene_sampler(device),
            placeholder: Texture::create_placeholder(device, queue),
            units: vec![None; MAX_TEXTURES],
            texture_bind_group: None,
            meshes: HashMap::new(),
            draws: Vec::new(),
            layouts,
        }
    }

    /// Current CPU copy of the shader uniforms.
    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// Number of draws recorded since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    fn ensure_object_capacity(&mut self, draws: usize) {
        if draws <= self.object_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("Growing object uniform buffer to {capacity} draws");
        let (buffer, bind_group) =
            mk_object_buffer(&self.device, &self.layouts.object, self.object_stride, capacity);
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_capacity = capacity;
    }

    fn rebuild_texture_bind_group(&mut self) {
        if self.texture_bind_group.is_none() {
            let mut entries: Vec<wgpu::BindGroupEntry> = self
                .units
                .iter()
                .enumerate()
                .map(|(unit, texture)| wgpu::BindGroupEntry {
                    binding: unit as u32,
                    resource: wgpu::BindingResource::TextureView(
                        &texture.as_ref().unwrap_or(&self.placeholder).view,
                    ),
                })
                .collect();
            entries.push(wgpu::BindGroupEntry {
                binding: SAMPLER_BINDING,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.layouts.textures,
                entries: &entries,
                label: Some("texture_bind_group"),
            });
            self.texture_bind_group = Some(bind_group);
        }
    }

    /// Record the render pass for every draw since the last flush.
    pub fn flush(&mut self, encoder: &mut wgpu::CommandEncoder, target: &FrameTarget) {
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[self.uniforms.frame]));

        self.ensure_object_capacity(self.draws.len());
        let stride = self.object_stride as usize;
        let mut staging = vec![0u8; stride * self.draws.len()];
        for (i, (_, snapshot)) in self.draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(snapshot);
            staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.object_buffer, 0, &staging);
        }

        self.rebuild_texture_bind_group();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(target.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            if let Some(textures) = &self.texture_bind_group {
                render_pass.set_bind_group(2, textures, &[]);
            }
            for (i, (shape, _)) in self.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(shape) else {
                    continue;
                };
                let offset = (i as u64 * self.object_stride) as u32;
                render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }
        }
        self.draws.clear();
    }
}

impl UniformSink for GpuRenderer {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        self.uniforms.set_uniform(name, value)
    }
}

impl TextureBackend for GpuRenderer {
    type Handle = Texture;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> anyhow::Result<Texture> {
        let limit = self.device.limits().max_texture_dimension_2d;
        if image.width() > limit || image.height() > limit {
            anyhow::bail!(
                "{}x{} exceeds the device limit of {limit} pixels",
                image.width(),
                image.height()
            );
        }
        Ok(Texture::from_decoded(&self.device, &self.queue, image, label))
    }

    fn bind_texture(&mut self, unit: u32, handle: &Texture) {
        match self.units.get_mut(unit as usize) {
            Some(slot) => {
                *slot = Some(handle.clone());
                self.texture_bind_group = None;
            }
            None => log::warn!("Texture unit {unit} does not exist, the shader has {MAX_TEXTURES}"),
        }
    }

    fn release_texture(&mut self, handle: Texture) {
        for slot in self.units.iter_mut() {
            if slot.as_ref().is_some_and(|bound| bound.texture == handle.texture) {
                *slot = None;
                self.texture_bind_group = None;
            }
        }
        handle.texture.destroy();
    }
}

impl MeshDrawer for GpuRenderer {
    fn load_mesh(&mut self, shape: Shape) {
        if self.meshes.contains_key(&shape) {
            return;
        }
        let data = build_mesh(shape);
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{shape:?} Vertex Buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{shape:?} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.insert(
            shape,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                num_indices: data.indices.len() as u32,
            },
        );
    }

    fn draw_mesh(&mut self, shape: Shape) {
        if !self.meshes.contains_key(&shape) {
            log::warn!("Drawing {shape:?} before it was loaded, skipping");
            return;
        }
        self.draws.push((shape, self.uniforms.object));
    }
}

/// Distance between two per-draw snapshots in the object buffer.
fn object_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<ObjectUniforms>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

fn mk_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
            }),
        }],
        label: Some("object_bind_group"),
    });
    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::FrameUniforms;

    #[test]
    fn stride_respects_alignment() {
        assert_eq!(object_stride(256), 256);
        assert_eq!(object_stride(64), 208);
        assert_eq!(object_stride(16), 208);
        assert_eq!(object_stride(128), 256);
    }

    #[test]
    fn frame_block_fits_one_binding() {
        assert!(std::mem::size_of::<FrameUniforms>() <= 16 * 1024);
    }
}
