//! Audio energy → bounded visual parameters.
//!
//! Every mapping is a stateless clamped linear interpolation: frame-to-frame
//! memory lives entirely in the baseline tracker.

use crate::audio::AudioState;
use crate::params::{AudioReactiveMapping, EnergySource};

/// Linearly map `value` from `[in_lo, in_hi]` to `[out_lo, out_hi]`, clamped
///
/// The result never leaves the output range, whatever the input (including
/// values outside the input range, NaN, or a reversed output range).
pub fn map_clamped(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let t = (value - in_lo) / (in_hi - in_lo);
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let out = out_lo + (out_hi - out_lo) * t;

    // Guard the last ulp against rounding outside the bounds
    out.clamp(out_lo.min(out_hi), out_lo.max(out_hi))
}

/// Visual parameters resolved for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParams {
    /// Base hue (degrees)
    pub hue: f32,
    /// Stroke width of the innermost layer (pixels)
    pub stroke_weight: f32,
    /// Brightness (0 - 100)
    pub brightness: f32,
    /// Saturation (0 - 100)
    pub saturation: f32,
    /// Audio-driven scale factor
    pub audio_scale: f32,
}

/// Stateless mapper from tracker output to [`VisualParams`]
#[derive(Debug, Clone, Default)]
pub struct AudioFeatureMapper {
    mapping: AudioReactiveMapping,
}

impl AudioFeatureMapper {
    pub fn new(mapping: AudioReactiveMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &AudioReactiveMapping {
        &self.mapping
    }

    /// Pick the configured driving signal out of a tracker snapshot
    pub fn energy(&self, audio: &AudioState) -> f32 {
        match self.mapping.source {
            EnergySource::Excess => audio.excess_energy,
            EnergySource::Smoothed => audio.smoothed_level,
            EnergySource::Raw => audio.raw_level,
        }
    }

    /// Map one frame's audio state
    ///
    /// # Arguments
    /// * `audio` - Tracker snapshot for this frame
    /// * `base_stroke_width` - Stroke width of the current pattern (pixels)
    pub fn map(&self, audio: &AudioState, base_stroke_width: f32) -> VisualParams {
        let m = &self.mapping;
        let energy = self.energy(audio);
        let lerp = |lo: f32, hi: f32| map_clamped(energy, 0.0, m.input_max, lo, hi);

        VisualParams {
            hue: lerp(m.hue_range.0, m.hue_range.1),
            stroke_weight: lerp(base_stroke_width, base_stroke_width * m.stroke_multiplier),
            brightness: m
                .brightness_range
                .map_or(m.default_brightness, |(lo, hi)| lerp(lo, hi)),
            saturation: m
                .saturation_range
                .map_or(m.default_saturation, |(lo, hi)| lerp(lo, hi)),
            audio_scale: lerp(m.scale_range.0, m.scale_range.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state_with_excess(excess_energy: f32) -> AudioState {
        AudioState {
            excess_energy,
            ..Default::default()
        }
    }

    #[test]
    fn test_map_clamped_interpolates() {
        assert_relative_eq!(map_clamped(0.025, 0.0, 0.05, 180.0, 360.0), 270.0, epsilon = 1e-4);
        assert_relative_eq!(map_clamped(0.5, 0.0, 1.0, 0.5, 0.01), 0.255, epsilon = 1e-6);
    }

    #[test]
    fn test_map_clamped_never_extrapolates() {
        let inputs = [-10.0, -0.001, 0.0, 0.03, 0.05, 0.2, 1e9, f32::NAN, f32::INFINITY];
        for &v in &inputs {
            let out = map_clamped(v, 0.0, 0.05, 180.0, 360.0);
            assert!((180.0..=360.0).contains(&out), "{} -> {}", v, out);

            let reversed = map_clamped(v, 0.0, 1.0, 0.5, 0.01);
            assert!((0.01..=0.5).contains(&reversed), "{} -> {}", v, reversed);
        }
    }

    #[test]
    fn test_degenerate_input_range() {
        assert_eq!(map_clamped(3.0, 1.0, 1.0, 10.0, 20.0), 10.0);
    }

    #[test]
    fn test_silence_pins_minimum() {
        let mapper = AudioFeatureMapper::default();
        let params = mapper.map(&state_with_excess(0.0), 2.0);

        assert_eq!(params.hue, 180.0);
        assert_eq!(params.stroke_weight, 2.0);
        assert_eq!(params.brightness, 90.0);
        assert_eq!(params.saturation, 90.0);
        assert_relative_eq!(params.audio_scale, 0.3);
    }

    #[test]
    fn test_loud_input_saturates() {
        let mapper = AudioFeatureMapper::new(AudioReactiveMapping::full());
        let params = mapper.map(&state_with_excess(5.0), 1.5);

        assert_eq!(params.hue, 360.0);
        assert_relative_eq!(params.stroke_weight, 1.5 * 7.0);
        assert_eq!(params.brightness, 100.0);
        assert_eq!(params.saturation, 100.0);
        assert_relative_eq!(params.audio_scale, 1.2);
    }

    #[test]
    fn test_outputs_bounded_for_any_energy() {
        let mapper = AudioFeatureMapper::new(AudioReactiveMapping::full());
        for i in -50..200 {
            let params = mapper.map(&state_with_excess(i as f32 * 0.001), 1.0);
            assert!((180.0..=360.0).contains(&params.hue));
            assert!((1.0..=7.0).contains(&params.stroke_weight));
            assert!((60.0..=100.0).contains(&params.brightness));
            assert!((70.0..=100.0).contains(&params.saturation));
            assert!((0.3..=1.2).contains(&params.audio_scale));
        }
    }

    #[test]
    fn test_energy_source_selection() {
        let audio = AudioState {
            raw_level: 0.9,
            smoothed_level: 0.4,
            ambient_baseline: 0.1,
            excess_energy: 0.3,
        };

        let raw = AudioFeatureMapper::new(AudioReactiveMapping {
            source: EnergySource::Raw,
            ..Default::default()
        });
        assert_eq!(raw.energy(&audio), 0.9);

        let smoothed = AudioFeatureMapper::new(AudioReactiveMapping {
            source: EnergySource::Smoothed,
            ..Default::default()
        });
        assert_eq!(smoothed.energy(&audio), 0.4);

        assert_eq!(AudioFeatureMapper::default().energy(&audio), 0.3);
    }
}
