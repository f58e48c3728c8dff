//! Core types for the rasterizer

use super::math::{Vec2, Vec3};
use crate::error::{RenderError, Result};

/// Float RGBA color, components nominally 0.0-1.0 (not clamped)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };
    pub const CYAN: Color = Color { r: 0.0, g: 1.0, b: 1.0, a: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit components
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Scale by 255 and truncate (saturating outside 0.0-1.0)
    #[inline]
    pub fn component_to_u8(c: f32) -> u8 {
        (c * 255.0) as u8
    }

    /// [r, g, b, a] as bytes
    pub fn to_bytes(self) -> [u8; 4] {
        [
            Self::component_to_u8(self.r),
            Self::component_to_u8(self.g),
            Self::component_to_u8(self.b),
            Self::component_to_u8(self.a),
        ]
    }

    /// Rec. 601 luma, used when drawing into single-channel images
    pub fn luma(self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, tex_coord: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            tex_coord: Vec2::default(),
            normal: Vec3::ZERO,
        }
    }
}

/// A triangle face (indices into the mesh vertex list)
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub indices: [usize; 3],
    pub normal: Vec3,
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex, returning its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Append a face. The normal follows the winding v0 -> v1 -> v2.
    pub fn add_face(&mut self, v0: usize, v1: usize, v2: usize) -> Result<usize> {
        for &i in &[v0, v1, v2] {
            if i >= self.vertices.len() {
                return Err(RenderError::invalid(format!(
                    "face index {} out of range ({} vertices)",
                    i,
                    self.vertices.len()
                )));
            }
        }
        let p0 = self.vertices[v0].position;
        let p1 = self.vertices[v1].position;
        let p2 = self.vertices[v2].position;
        let normal = (p1 - p0).cross(p2 - p0).normalize();

        self.faces.push(Face {
            indices: [v0, v1, v2],
            normal,
        });
        Ok(self.faces.len() - 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}
