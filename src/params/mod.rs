//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, degrees, samples, frames)
//! - Documented ranges and meanings
//! - Defaults reproducing the canonical mandala

mod audio;
mod mapping;
mod pattern;
mod render;

// Re-export all types
pub use audio::{AudioInputConfig, BaselineConfig};
pub use mapping::{
    AudioReactiveMapping, ColorMode, CompositorConfig, DrawOrder, EnergySource, MotionMapping,
    RotationMode, ScaleMode,
};
pub use pattern::{GeneratorConfig, PaletteConfig};
pub use render::{RecordingConfig, RenderConfig};
