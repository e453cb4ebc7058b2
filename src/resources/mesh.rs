//! Procedural geometry for the primitive shapes the scene is built from.
//!
//! Every shape is generated around a unit size so that the per-draw transform
//! alone decides its final dimensions:
//!
//! - `Box`: cube from -0.5 to 0.5 on every axis
//! - `Plane`: XZ square from -1 to 1, facing +Y
//! - `Cylinder`, `Cone`, `TaperedCylinder`: radius 1 at y = 0, top at y = 1
//!   (the tapered top has radius 0.5, the cone ends in a point)
//! - `Prism`: triangular cross-section in XY, extruded from z = -0.5 to 0.5
//! - `Pyramid4`: square base from -0.5 to 0.5 at y = 0, apex at y = 1
//! - `Sphere`: radius 1 around the origin
//! - `Torus`: ring radius 1 around the Y axis, tube radius 0.2
//!
//! Flat faces get one normal per face, round surfaces smooth per-vertex normals.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Box,
    Plane,
    Cylinder,
    Cone,
    Prism,
    Pyramid4,
    Sphere,
    TaperedCylinder,
    Torus,
}

impl Shape {
    pub const ALL: [Shape; 9] = [
        Shape::Box,
        Shape::Plane,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Prism,
        Shape::Pyramid4,
        Shape::Sphere,
        Shape::TaperedCylinder,
        Shape::Torus,
    ];
}

const ROUND_SEGMENTS: u32 = 36;
const SPHERE_STACKS: u32 = 24;
const TORUS_MAJOR_SEGMENTS: u32 = 36;
const TORUS_MINOR_SEGMENTS: u32 = 18;
const TORUS_TUBE_RADIUS: f32 = 0.2;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex for ShapeVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn vertex(&mut self, position: Vector3<f32>, normal: Vector3<f32>, uv: [f32; 2]) -> u32 {
        self.vertices.push(ShapeVertex {
            position: position.into(),
            normal: normal.normalize().into(),
            tex_coords: uv,
        });
        self.vertices.len() as u32 - 1
    }

    /**
     * Add a flat convex polygon. The winding is chosen so the face normal points
     * away from `inside`, which spares every caller from ordering corners by hand.
     */
    fn flat_face(&mut self, corners: &[Vector3<f32>], uvs: &[[f32; 2]], inside: Vector3<f32>) {
        let centroid = corners.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, c| acc + c)
            / corners.len() as f32;
        let mut normal = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
        let outward = normal.dot(centroid - inside) >= 0.0;
        if !outward {
            normal = -normal;
        }
        let first = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            self.vertex(*corner, normal, *uv);
        }
        for i in 1..corners.len() as u32 - 1 {
            if outward {
                self.indices.extend([first, first + i, first + i + 1]);
            } else {
                self.indices.extend([first, first + i + 1, first + i]);
            }
        }
    }

    /// Quad strips over a `(rows + 1) x (columns + 1)` vertex grid starting at `first`.
    fn grid(&mut self, first: u32, rows: u32, columns: u32) {
        let stride = columns + 1;
        for row in 0..rows {
            for column in 0..columns {
                let a = first + row * stride + column;
                let b = a + stride;
                self.indices.extend([a, a + 1, b, a + 1, b + 1, b]);
            }
        }
    }
}

pub fn build_mesh(shape: Shape) -> MeshData {
    match shape {
        Shape::Box => unit_box(),
        Shape::Plane => plane(),
        Shape::Cylinder => frustum(1.0, 1.0),
        Shape::Cone => frustum(1.0, 0.0),
        Shape::TaperedCylinder => frustum(1.0, 0.5),
        Shape::Prism => prism(),
        Shape::Pyramid4 => pyramid4(),
        Shape::Sphere => sphere(),
        Shape::Torus => torus(),
    }
}

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const TRIANGLE_UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]];

fn unit_box() -> MeshData {
    let mut mesh = MeshData::default();
    let origin = Vector3::new(0.0, 0.0, 0.0);
    let axes = [Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()];
    for (i, normal) in axes.iter().enumerate() {
        let u = axes[(i + 1) % 3];
        let v = axes[(i + 2) % 3];
        for sign in [1.0, -1.0] {
            let center = normal * (0.5 * sign);
            let corners = [
                center - u * 0.5 - v * 0.5,
                center + u * 0.5 - v * 0.5,
                center + u * 0.5 + v * 0.5,
                center - u * 0.5 + v * 0.5,
            ];
            mesh.flat_face(&corners, &QUAD_UVS, origin);
        }
    }
    mesh
}

fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    let corners = [
        Vector3::new(-1.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, -1.0),
        Vector3::new(-1.0, 0.0, -1.0),
    ];
    mesh.flat_face(&corners, &QUAD_UVS, Vector3::new(0.0, -1.0, 0.0));
    mesh
}

fn prism() -> MeshData {
    let mut mesh = MeshData::default();
    let origin = Vector3::new(0.0, 0.0, 0.0);
    let profile = [(-0.5, -0.5), (0.5, -0.5), (0.0, 0.5)];
    let front: Vec<_> = profile.iter().map(|&(x, y)| Vector3::new(x, y, 0.5)).collect();
    let back: Vec<_> = profile.iter().map(|&(x, y)| Vector3::new(x, y, -0.5)).collect();
    mesh.flat_face(&front, &TRIANGLE_UVS, origin);
    mesh.flat_face(&back, &TRIANGLE_UVS, origin);
    for i in 0..profile.len() {
        let j = (i + 1) % profile.len();
        mesh.flat_face(&[front[i], front[j], back[j], back[i]], &QUAD_UVS, origin);
    }
    mesh
}

fn pyramid4() -> MeshData {
    let mut mesh = MeshData::default();
    let inside = Vector3::new(0.0, 0.25, 0.0);
    let apex = Vector3::new(0.0, 1.0, 0.0);
    let base = [
        Vector3::new(-0.5, 0.0, 0.5),
        Vector3::new(0.5, 0.0, 0.5),
        Vector3::new(0.5, 0.0, -0.5),
        Vector3::new(-0.5, 0.0, -0.5),
    ];
    mesh.flat_face(&base, &QUAD_UVS, inside);
    for i in 0..base.len() {
        let j = (i + 1) % base.len();
        mesh.flat_face(&[base[i], base[j], apex], &TRIANGLE_UVS, inside);
    }
    mesh
}

/// Open-ended surface of revolution between two radii, plus flat caps.
/// A zero top radius produces a cone.
fn frustum(bottom_radius: f32, top_radius: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let segments = ROUND_SEGMENTS;
    let first = mesh.vertices.len() as u32;
    for (row, (radius, y)) in [(bottom_radius, 0.0), (top_radius, 1.0)].into_iter().enumerate() {
        for column in 0..=segments {
            let theta = 2.0 * PI * column as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            let position = Vector3::new(radius * cos, y, radius * sin);
            // slope normal of the side wall for a height of 1
            let normal = Vector3::new(cos, bottom_radius - top_radius, sin);
            let uv = [column as f32 / segments as f32, row as f32];
            mesh.vertex(position, normal, uv);
        }
    }
    let stride = segments + 1;
    for column in 0..segments {
        let a = first + column;
        let b = a + stride;
        mesh.indices.extend([a, b, a + 1, a + 1, b, b + 1]);
    }
    cap(&mut mesh, bottom_radius, 0.0, -1.0);
    if top_radius > 0.0 {
        cap(&mut mesh, top_radius, 1.0, 1.0);
    }
    mesh
}

fn cap(mesh: &mut MeshData, radius: f32, y: f32, facing: f32) {
    let normal = Vector3::new(0.0, facing, 0.0);
    let center = mesh.vertex(Vector3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
    let segments = ROUND_SEGMENTS;
    for column in 0..=segments {
        let theta = 2.0 * PI * column as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        mesh.vertex(
            Vector3::new(radius * cos, y, radius * sin),
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        );
    }
    for column in 0..segments {
        let a = center + 1 + column;
        if facing > 0.0 {
            mesh.indices.extend([center, a + 1, a]);
        } else {
            mesh.indices.extend([center, a, a + 1]);
        }
    }
}

fn sphere() -> MeshData {
    let mut mesh = MeshData::default();
    let stacks = SPHERE_STACKS;
    let slices = ROUND_SEGMENTS;
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        let (ring, y) = phi.sin_cos();
        for slice in 0..=slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            let (sin, cos) = theta.sin_cos();
            let position = Vector3::new(ring * cos, y, ring * sin);
            let uv = [
                slice as f32 / slices as f32,
                1.0 - stack as f32 / stacks as f32,
            ];
            mesh.vertex(position, position, uv);
        }
    }
    mesh.grid(0, stacks, slices);
    mesh
}

fn torus() -> MeshData {
    let mut mesh = MeshData::default();
    let major = TORUS_MAJOR_SEGMENTS;
    let minor = TORUS_MINOR_SEGMENTS;
    for i in 0..=major {
        let u = 2.0 * PI * i as f32 / major as f32;
        let (sin_u, cos_u) = u.sin_cos();
        let center = Vector3::new(cos_u, 0.0, sin_u);
        for j in 0..=minor {
            let v = 2.0 * PI * j as f32 / minor as f32;
            let (sin_v, cos_v) = v.sin_cos();
            let normal = Vector3::new(cos_v * cos_u, sin_v, cos_v * sin_u);
            let uv = [i as f32 / major as f32, j as f32 / minor as f32];
            mesh.vertex(center + normal * TORUS_TUBE_RADIUS, normal, uv);
        }
    }
    mesh.grid(0, major, minor);
    mesh
}
