//! Pattern and palette generation parameters.

use std::ops::Range;

use crate::pattern::ShapeKind;

/// Ranges the parameter generator draws a new pattern from
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Rotational segment count (half-open range, start must be ≥ 1)
    pub segment_range: Range<u32>,

    /// Base stroke width (pixels)
    pub stroke_width_range: Range<f32>,

    /// Number of layers (half-open range, start must be ≥ 1)
    pub layer_range: Range<u32>,

    /// Lower bound of a layer's base radius (pixels)
    pub min_radius_px: f32,

    /// Upper bound of a layer's base radius as a fraction of the shorter canvas side
    pub max_radius_fraction: f32,

    /// Radius growth per layer index: radius *= 1 + index * growth
    /// Observed values: 0.15 - 0.2
    pub radius_growth: f32,

    /// Exclusive upper bound for per-layer noise phase offsets
    pub noise_seed_max: f32,

    /// Shape variants available to layers (index = shape type)
    pub shapes: Vec<ShapeKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            segment_range: 16..48,
            stroke_width_range: 0.5..3.0,
            layer_range: 8..20,
            min_radius_px: 50.0,
            max_radius_fraction: 0.45,
            radius_growth: 0.15,
            noise_seed_max: 1000.0,
            shapes: ShapeKind::CANONICAL.to_vec(),
        }
    }
}

impl GeneratorConfig {
    /// Swap the twelve-dot ring for the single-dot variant
    pub fn with_legacy_dots(mut self) -> Self {
        for shape in &mut self.shapes {
            if *shape == ShapeKind::DotRing {
                *shape = ShapeKind::Dot;
            }
        }
        self
    }

    /// Validate configuration (non-empty ranges, positive radii, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.segment_range.start == 0 || self.segment_range.is_empty() {
            return Err(format!(
                "Segment range must be non-empty and start at 1 or more, got {:?}",
                self.segment_range
            ));
        }
        if self.layer_range.start == 0 || self.layer_range.is_empty() {
            return Err(format!(
                "Layer range must be non-empty and start at 1 or more, got {:?}",
                self.layer_range
            ));
        }
        if !(self.stroke_width_range.start > 0.0)
            || self.stroke_width_range.start >= self.stroke_width_range.end
        {
            return Err(format!(
                "Stroke width range must be positive and non-empty, got {:?}",
                self.stroke_width_range
            ));
        }
        if !(self.min_radius_px > 0.0) {
            return Err("Minimum radius must be > 0".to_string());
        }
        if !(self.radius_growth >= 0.0) {
            return Err("Radius growth must be >= 0".to_string());
        }
        if !(self.noise_seed_max > 0.0) {
            return Err("Noise seed bound must be > 0".to_string());
        }
        if self.shapes.is_empty() {
            return Err("At least one shape variant is required".to_string());
        }
        Ok(())
    }
}

/// Precomputed palette library parameters
#[derive(Debug, Clone)]
pub struct PaletteConfig {
    /// Number of palettes built at startup
    pub library_size: usize,

    /// Hues per palette (half-open range)
    pub hue_count_range: Range<usize>,

    /// Step between neighbouring hues (degrees)
    pub hue_step_range: Range<f32>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            library_size: 1000,
            hue_count_range: 3..7,
            hue_step_range: 15.0..35.0,
        }
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.library_size == 0 {
            return Err("Palette library must hold at least one palette".to_string());
        }
        if self.hue_count_range.start == 0 || self.hue_count_range.is_empty() {
            return Err(format!(
                "Hue count range must be non-empty and start at 1 or more, got {:?}",
                self.hue_count_range
            ));
        }
        if self.hue_step_range.start >= self.hue_step_range.end {
            return Err(format!(
                "Hue step range must be non-empty, got {:?}",
                self.hue_step_range
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(PaletteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_segments_rejected() {
        let config = GeneratorConfig {
            segment_range: 0..12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_legacy_dots_swaps_ring() {
        let config = GeneratorConfig::default().with_legacy_dots();
        assert_eq!(config.shapes.len(), 7);
        assert!(config.shapes.contains(&ShapeKind::Dot));
        assert!(!config.shapes.contains(&ShapeKind::DotRing));
    }
}
