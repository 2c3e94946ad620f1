//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// `#rrggbb` + alpha as linear RGBA
pub const fn rgb(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for the preview scene
pub mod colors {
    use super::rgb;

    pub const SKY_TOP: [f32; 4] = rgb(0x1a1a2e, 1.0);
    pub const SKY_BOTTOM: [f32; 4] = rgb(0x16213e, 1.0);
    pub const GROUND_TOP: [f32; 4] = rgb(0x30475e, 1.0);
    pub const GROUND_BOTTOM: [f32; 4] = rgb(0x2c3e50, 1.0);
    pub const RUNNER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SHADOW: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
    pub const PARTICLE: [f32; 4] = [1.0, 1.0, 1.0, 0.15];
}
