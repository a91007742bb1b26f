//! Radial compositor: lays out pattern layers around the canvas center.
//!
//! Per frame every layer is resolved once (noise-animated radius, hue,
//! stroke weight) and then stamped into each rotational segment. Each stamp
//! runs inside its own transform scope and carries its full style, so
//! nothing set for one shape is visible to the next.

use glam::{Affine2, Vec2};

use crate::canvas::{rotation, with_transform, Canvas};
use crate::mapping::{map_clamped, VisualParams};
use crate::noise::NoiseField;
use crate::params::{ColorMode, CompositorConfig, DrawOrder};
use crate::pattern::{Palette, Pattern, ShapeKind};
use crate::shapes::{ShapeGeometry, ShapeStyle};

/// Global inputs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Audio-mapped style
    pub visual: VisualParams,
    /// Combined pointer/audio scale factor
    pub scale: f32,
    /// Accumulated global rotation (degrees)
    pub rotation_degrees: f32,
    /// Canvas center (pixels)
    pub center: Vec2,
}

/// One layer, fully resolved for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLayer {
    pub shape: ShapeKind,
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

pub struct RadialCompositor {
    config: CompositorConfig,
    noise: NoiseField,
}

impl RadialCompositor {
    pub fn new(config: CompositorConfig, noise: NoiseField) -> Self {
        Self { config, noise }
    }

    /// Replace the noise field (on regenerate)
    pub fn reseed_noise(&mut self, noise: NoiseField) {
        self.noise = noise;
    }

    /// Resolve every layer's geometry and style for a frame
    ///
    /// # Arguments
    /// * `pattern` - Current pattern
    /// * `palette` - Active palette, used when the color mode is `Palette`
    /// * `inputs` - Audio-mapped style and global scale
    /// * `frame_index` - Explicit frame counter driving the noise phase
    pub fn resolve_layers(
        &self,
        pattern: &Pattern,
        palette: Option<&Palette>,
        inputs: &FrameInputs,
        frame_index: u64,
    ) -> Vec<ResolvedLayer> {
        let layer_count = pattern.layer_count() as f32;
        let visual = &inputs.visual;
        let phase = frame_index as f64 * self.config.noise_phase_per_frame;
        let jitter = self.config.radius_jitter_px;

        pattern
            .layers
            .iter()
            .enumerate()
            .map(|(j, layer)| {
                let noise_factor = self.noise.sample(phase + layer.noise_seed as f64);
                let animated_radius = layer.radius + map_clamped(noise_factor, 0.0, 1.0, -jitter, jitter);

                let hue = match (self.config.color_mode, palette) {
                    (ColorMode::Palette, Some(palette)) => palette.hue(j),
                    _ => (visual.hue + j as f32 * self.config.layer_hue_step).rem_euclid(360.0),
                };

                let stroke_weight = map_clamped(
                    j as f32,
                    0.0,
                    layer_count,
                    visual.stroke_weight,
                    visual.stroke_weight * self.config.outer_stroke_fraction,
                );

                ResolvedLayer {
                    shape: layer.shape,
                    geometry: ShapeGeometry {
                        final_radius: animated_radius * inputs.scale,
                        base_radius: layer.radius,
                    },
                    style: ShapeStyle {
                        hue,
                        stroke_weight,
                        brightness: visual.brightness,
                        saturation: visual.saturation,
                    },
                }
            })
            .collect()
    }

    /// Draw one frame of the pattern
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        pattern: &Pattern,
        palette: Option<&Palette>,
        inputs: &FrameInputs,
        frame_index: u64,
    ) {
        debug_assert!(pattern.segment_count > 0);

        let layers = self.resolve_layers(pattern, palette, inputs, frame_index);
        let step = pattern.angle_step_degrees();
        let segments = pattern.segment_count;
        let origin = Affine2::from_translation(inputs.center) * rotation(inputs.rotation_degrees);

        with_transform(canvas, origin, |canvas| match self.config.draw_order {
            DrawOrder::LayerMajor => {
                for layer in &layers {
                    for i in 0..segments {
                        stamp(canvas, layer, i as f32 * step);
                    }
                }
            }
            DrawOrder::SegmentMajor => {
                for i in 0..segments {
                    for layer in &layers {
                        stamp(canvas, layer, i as f32 * step);
                    }
                }
            }
        });
    }
}

fn stamp<C: Canvas + ?Sized>(canvas: &mut C, layer: &ResolvedLayer, angle_degrees: f32) {
    with_transform(canvas, rotation(angle_degrees), |canvas| {
        layer.shape.draw(canvas, &layer.geometry, &layer.style)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use crate::pattern::{Layer, PaletteLibrary};
    use crate::params::PaletteConfig;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pattern() -> Pattern {
        Pattern {
            segment_count: 8,
            base_stroke_width: 2.0,
            layers: vec![
                Layer { radius: 60.0, shape: ShapeKind::Spoke, noise_seed: 10.0 },
                Layer { radius: 90.0, shape: ShapeKind::EllipseWithDot, noise_seed: 250.0 },
                Layer { radius: 130.0, shape: ShapeKind::DotRing, noise_seed: 777.0 },
            ],
        }
    }

    fn inputs() -> FrameInputs {
        FrameInputs {
            visual: VisualParams {
                hue: 200.0,
                stroke_weight: 4.0,
                brightness: 90.0,
                saturation: 90.0,
                audio_scale: 1.0,
            },
            scale: 1.0,
            rotation_degrees: 0.0,
            center: Vec2::new(400.0, 300.0),
        }
    }

    fn compositor(draw_order: DrawOrder) -> RadialCompositor {
        let config = CompositorConfig {
            draw_order,
            ..Default::default()
        };
        RadialCompositor::new(config, NoiseField::new(7))
    }

    #[test]
    fn test_call_count_and_transform_restored() {
        let mut canvas = RecordingCanvas::new();
        compositor(DrawOrder::LayerMajor).render(&mut canvas, &pattern(), None, &inputs(), 0);

        // Spoke: 1, EllipseWithDot: 2, DotRing: 12 primitives per segment
        assert_eq!(canvas.calls.len(), 8 * (1 + 2 + 12));
        assert_eq!(canvas.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_layer_major_keeps_layer_z_order() {
        let mut canvas = RecordingCanvas::new();
        compositor(DrawOrder::LayerMajor).render(&mut canvas, &pattern(), None, &inputs(), 0);

        // First 8 calls are the spokes of layer 0
        for call in &canvas.calls[..8] {
            assert!(matches!(call.primitive, crate::canvas::recording::Primitive::Line { .. }));
        }
    }

    #[test]
    fn test_segment_major_interleaves_layers() {
        let mut canvas = RecordingCanvas::new();
        compositor(DrawOrder::SegmentMajor).render(&mut canvas, &pattern(), None, &inputs(), 0);

        use crate::canvas::recording::Primitive;
        assert!(matches!(canvas.calls[0].primitive, Primitive::Line { .. }));
        assert!(matches!(canvas.calls[1].primitive, Primitive::Ellipse { .. }));
        assert!(matches!(canvas.calls[2].primitive, Primitive::Circle { .. }));
        assert_eq!(canvas.calls.len(), 8 * 15);
    }

    #[test]
    fn test_style_identical_across_segments() {
        let mut canvas = RecordingCanvas::new();
        compositor(DrawOrder::SegmentMajor).render(&mut canvas, &pattern(), None, &inputs(), 42);

        // Per segment: 15 calls; compare each segment to the first
        let per_segment = 15;
        let first = &canvas.calls[..per_segment];
        for segment in canvas.calls.chunks(per_segment).skip(1) {
            for (a, b) in first.iter().zip(segment) {
                assert_eq!(a.primitive.stroke(), b.primitive.stroke());
                assert_eq!(a.primitive.fill(), b.primitive.fill());
            }
        }
    }

    #[test]
    fn test_segments_are_rotated_copies() {
        let mut canvas = RecordingCanvas::new();
        compositor(DrawOrder::LayerMajor).render(&mut canvas, &pattern(), None, &inputs(), 0);

        let center = inputs().center;
        for (i, call) in canvas.calls[..8].iter().enumerate() {
            let expected = Affine2::from_translation(center) * rotation(i as f32 * 45.0);
            assert!(call.transform.abs_diff_eq(expected, 1e-3));
        }
    }

    #[test]
    fn test_radius_stays_within_jitter() {
        let compositor = compositor(DrawOrder::LayerMajor);
        let pattern = pattern();
        for frame in (0..2000).step_by(37) {
            let layers = compositor.resolve_layers(&pattern, None, &inputs(), frame);
            for (layer, resolved) in pattern.layers.iter().zip(&layers) {
                let delta = resolved.geometry.final_radius - layer.radius;
                assert!(delta.abs() <= 20.0 + 1e-3, "delta {} at frame {}", delta, frame);
                assert_eq!(resolved.geometry.base_radius, layer.radius);
            }
        }
    }

    #[test]
    fn test_scale_applies_to_final_radius() {
        let compositor = compositor(DrawOrder::LayerMajor);
        let unscaled = compositor.resolve_layers(&pattern(), None, &inputs(), 5);
        let half = FrameInputs { scale: 0.5, ..inputs() };
        let scaled = compositor.resolve_layers(&pattern(), None, &half, 5);

        for (a, b) in unscaled.iter().zip(&scaled) {
            assert_relative_eq!(b.geometry.final_radius, a.geometry.final_radius * 0.5, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_hue_shift_and_stroke_taper() {
        let layers = compositor(DrawOrder::LayerMajor).resolve_layers(&pattern(), None, &inputs(), 0);

        assert_relative_eq!(layers[0].style.hue, 200.0);
        assert_relative_eq!(layers[1].style.hue, 220.0);
        assert_relative_eq!(layers[2].style.hue, 240.0);

        assert_relative_eq!(layers[0].style.stroke_weight, 4.0);
        assert!(layers[1].style.stroke_weight < layers[0].style.stroke_weight);
        assert!(layers[2].style.stroke_weight >= 2.0);
    }

    #[test]
    fn test_hue_shift_wraps() {
        let mut late = inputs();
        late.visual.hue = 350.0;
        let layers = compositor(DrawOrder::LayerMajor).resolve_layers(&pattern(), None, &late, 0);
        assert_relative_eq!(layers[1].style.hue, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_palette_mode_uses_palette_hues() {
        let mut rng = StdRng::seed_from_u64(3);
        let library = PaletteLibrary::build(&mut rng, &PaletteConfig::default());
        let palette = library.select_random(&mut rng);

        let config = CompositorConfig {
            color_mode: ColorMode::Palette,
            ..Default::default()
        };
        let compositor = RadialCompositor::new(config, NoiseField::new(7));
        let layers = compositor.resolve_layers(&pattern(), Some(palette), &inputs(), 0);

        for (j, layer) in layers.iter().enumerate() {
            assert_eq!(layer.style.hue, palette.hue(j));
        }
    }

    #[test]
    fn test_noise_animates_smoothly() {
        let compositor = compositor(DrawOrder::LayerMajor);
        let a = compositor.resolve_layers(&pattern(), None, &inputs(), 100);
        let b = compositor.resolve_layers(&pattern(), None, &inputs(), 101);
        for (x, y) in a.iter().zip(&b) {
            // One frame moves the noise phase by 0.005; radius change stays small
            assert!((x.geometry.final_radius - y.geometry.final_radius).abs() < 2.0);
        }
    }
}
