//! Audio level acquisition and ambient baseline tracking.
//!
//! Level sources are polled once per frame and never block; the tracker turns
//! the polled levels into the excess-energy signal the visuals follow.

mod baseline;
mod input;
mod wav;

// Re-export public types
pub use baseline::{AmbientBaselineTracker, AudioState};
pub use input::{find_input_device, list_input_devices, MicrophoneInput};
pub use wav::WavLevelSource;

/// A non-blocking supplier of instantaneous input amplitude (0 - 1)
pub trait LevelSource {
    /// Level for the given frame, or `None` when no new sample is available
    fn level(&mut self, frame_index: u64) -> Option<f32>;
}

/// Fixed level, handy for tests and for running without an input device
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantLevel(pub f32);

impl LevelSource for ConstantLevel {
    fn level(&mut self, _frame_index: u64) -> Option<f32> {
        Some(self.0)
    }
}

/// Root-mean-square amplitude of a block of samples (0 for an empty block)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
