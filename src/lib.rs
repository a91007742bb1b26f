//! Sonomandala library - audio-reactive radial mandala renderer

pub mod audio;
pub mod canvas;
pub mod cli;
pub mod compositor;
pub mod error;
pub mod mapping;
pub mod noise;
pub mod params;
pub mod pattern;
pub mod rendering;
pub mod shapes;
pub mod system;

pub use error::{MandalaError, Result};
pub use system::{MandalaConfig, MandalaSystem};
