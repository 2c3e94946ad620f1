//! Draw-list rendering
//!
//! Drawing code emits colored triangles into a [`DrawList`]; the host uploads
//! `as_bytes()` to whatever backend it has (WebGL, wgpu, a 2D canvas shim).

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::{Vertex, colors};

/// Triangle list for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    vertices: Vec<Vertex>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Raw vertex bytes for a GPU buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn extend(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }

    pub fn rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        self.extend(shapes::rect(min, size, color));
    }

    pub fn gradient_rect(&mut self, min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
        self.extend(shapes::gradient_rect(min, size, top, bottom));
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
        self.extend(shapes::circle(center, radius, color, segments));
    }
}
