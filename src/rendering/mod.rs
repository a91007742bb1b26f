//! Rendering: canvas tessellation and the wgpu presentation pipeline.

mod system;
mod tessellate;

pub use system::{padded_bytes_per_row, RenderSystem, ScreenUniforms};
pub use tessellate::{catmull_rom, cubic_bezier, MeshCanvas, Vertex};
