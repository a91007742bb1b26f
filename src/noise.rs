//! Coherent noise driving the organic "breathing" of layer radii.
//!
//! Neighbouring phases give neighbouring values, so stepping the phase by a
//! small amount each frame produces smooth motion rather than jitter.

use noise::{NoiseFn, Perlin};

/// Second coordinate of every sample; off the integer lattice where Perlin is zero
const SAMPLE_ROW: f64 = 0.5;

/// Seeded 1D coherent noise field
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
}

impl NoiseField {
    /// Create new noise field with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// Sample the field at a phase
    ///
    /// Returns value in range [0, 1]
    pub fn sample(&self, phase: f64) -> f32 {
        let value = self.perlin.get([phase, SAMPLE_ROW]);
        ((value * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
