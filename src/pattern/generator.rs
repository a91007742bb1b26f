//! Procedural pattern generation.

use log::debug;
use rand::Rng;

use super::{Layer, Pattern};
use crate::params::GeneratorConfig;

/// Draws new patterns from a caller-owned random generator
///
/// The generator holds no randomness of its own: reseeding the `Rng` passed to
/// [`ParameterGenerator::generate`] is what makes a pattern reproducible.
#[derive(Debug, Clone)]
pub struct ParameterGenerator {
    config: GeneratorConfig,
}

impl ParameterGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid generator config");
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a complete pattern for a canvas of the given size
    ///
    /// # Arguments
    /// * `rng` - Random source; the same seed and canvas size give an identical pattern
    /// * `canvas_width` / `canvas_height` - Canvas size in pixels
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Pattern {
        let c = &self.config;

        let segment_count = rng.gen_range(c.segment_range.clone());
        let base_stroke_width = rng.gen_range(c.stroke_width_range.clone());
        let layer_count = rng.gen_range(c.layer_range.clone());

        // Base radius upper bound follows the shorter canvas side
        let max_radius = canvas_width.min(canvas_height) * c.max_radius_fraction;

        let layers = (0..layer_count)
            .map(|index| {
                // On small canvases the bound falls below the minimum: draw from [bound, min)
                let drawn = if max_radius > c.min_radius_px {
                    rng.gen_range(c.min_radius_px..max_radius)
                } else if max_radius > 0.0 && max_radius < c.min_radius_px {
                    rng.gen_range(max_radius..c.min_radius_px)
                } else {
                    c.min_radius_px
                };
                let radius = drawn * (1.0 + index as f32 * c.radius_growth);
                let shape = c.shapes[rng.gen_range(0..c.shapes.len() as u32) as usize];
                let noise_seed = rng.gen_range(0.0..c.noise_seed_max);

                Layer {
                    radius,
                    shape,
                    noise_seed,
                }
            })
            .collect();

        let pattern = Pattern {
            segment_count,
            base_stroke_width,
            layers,
        };

        debug!(
            "Generated pattern: {} segments, {} layers, stroke {:.2}",
            pattern.segment_count,
            pattern.layer_count(),
            pattern.base_stroke_width
        );

        pattern
    }
}

impl Default for ParameterGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
