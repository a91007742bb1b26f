//! Shape recipes: the only code that issues drawing primitives.
//!
//! Every recipe draws in a local frame whose +x axis points from the mandala
//! center through the current segment; the compositor's rotation places it.

use glam::Vec2;

use crate::canvas::{Canvas, Fill, Hsba, Stroke};
use crate::pattern::ShapeKind;

/// Stroke opacity shared by all outlined shapes
const STROKE_ALPHA: f32 = 0.8;
const TRIANGLE_ALPHA: f32 = 0.5;
const DOT_ALPHA: f32 = 0.7;
/// Dots on a `DotRing`
const RING_DOTS: usize = 12;

/// Resolved size of one shape instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeGeometry {
    /// Animated, scaled distance from the center (pixels)
    pub final_radius: f32,
    /// The layer's unanimated radius, used for proportions (pixels)
    pub base_radius: f32,
}

/// Resolved style of one shape instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub hue: f32,
    pub stroke_weight: f32,
    pub brightness: f32,
    pub saturation: f32,
}

impl ShapeStyle {
    fn stroke(&self) -> Stroke {
        Stroke {
            color: Hsba::new(self.hue, self.saturation, self.brightness, STROKE_ALPHA),
            width: self.stroke_weight,
        }
    }

    fn fill(&self, saturation: f32, brightness: f32, alpha: f32) -> Fill {
        Fill {
            color: Hsba::new(self.hue, saturation, brightness, alpha),
        }
    }
}

impl ShapeKind {
    /// Draw one instance of this shape
    pub fn draw<C: Canvas + ?Sized>(self, canvas: &mut C, geometry: &ShapeGeometry, style: &ShapeStyle) {
        match self {
            ShapeKind::EllipseWithDot => draw_ellipse_with_dot(canvas, geometry, style),
            ShapeKind::Spoke => draw_spoke(canvas, geometry, style),
            ShapeKind::ArcSweep => draw_arc_sweep(canvas, geometry, style),
            ShapeKind::MirroredBezier => draw_mirrored_bezier(canvas, geometry, style),
            ShapeKind::Petal => draw_petal(canvas, geometry, style),
            ShapeKind::TriangleFan => draw_triangle_fan(canvas, geometry, style),
            ShapeKind::DotRing => draw_dot_ring(canvas, geometry, style),
            ShapeKind::Dot => draw_dot(canvas, geometry, style),
        }
    }
}

fn draw_ellipse_with_dot<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let center = Vec2::new(g.final_radius, 0.0);
    canvas.ellipse(
        center,
        Vec2::new(g.base_radius * 0.2, g.base_radius * 0.5),
        &s.stroke(),
    );
    // Center dot at full brightness
    canvas.circle(center, s.stroke_weight, &s.fill(s.saturation, 100.0, 1.0));
}

fn draw_spoke<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    canvas.line(Vec2::ZERO, Vec2::new(g.final_radius, 0.0), &s.stroke());
}

fn draw_arc_sweep<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let diameter = g.final_radius * 1.5;
    canvas.arc(Vec2::ZERO, Vec2::splat(diameter), -30.0, 30.0, &s.stroke());
}

fn draw_mirrored_bezier<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let r = g.final_radius;
    let offset = g.base_radius * 0.5;
    let stroke = s.stroke();

    for side in [-1.0, 1.0] {
        canvas.bezier(
            [
                Vec2::ZERO,
                Vec2::new(offset, side * offset),
                Vec2::new(r - offset, side * offset),
                Vec2::new(r, 0.0),
            ],
            &stroke,
        );
    }
}

fn draw_petal<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let r = g.final_radius;
    let stroke = s.stroke();

    for side in [1.0, -1.0] {
        canvas.curve(
            [
                Vec2::new(r, 0.0),
                Vec2::new(r * 0.9, 0.0),
                Vec2::new(r * 0.8, side * r * 0.2),
                Vec2::new(r * 0.7, side * r * 0.3),
            ],
            &stroke,
        );
    }
}

fn draw_triangle_fan<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let r = g.final_radius;
    let fill = s.fill((s.saturation - 10.0).max(0.0), s.brightness, TRIANGLE_ALPHA);
    canvas.triangle(Vec2::ZERO, Vec2::new(r, -10.0), Vec2::new(r, 10.0), &fill);
}

fn draw_dot_ring<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let fill = s.fill(s.saturation, s.brightness, DOT_ALPHA);
    let diameter = s.stroke_weight * 1.5;

    for k in 0..RING_DOTS {
        let angle = (k as f32 * 360.0 / RING_DOTS as f32).to_radians();
        let center = Vec2::new(angle.cos(), angle.sin()) * g.final_radius;
        canvas.circle(center, diameter, &fill);
    }
}

fn draw_dot<C: Canvas + ?Sized>(canvas: &mut C, g: &ShapeGeometry, s: &ShapeStyle) {
    let fill = s.fill(s.saturation, s.brightness, DOT_ALPHA);
    canvas.circle(Vec2::new(g.final_radius, 0.0), s.stroke_weight * 2.0, &fill);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Primitive, RecordingCanvas};
    use approx::assert_relative_eq;

    const GEOMETRY: ShapeGeometry = ShapeGeometry {
        final_radius: 100.0,
        base_radius: 80.0,
    };

    const STYLE: ShapeStyle = ShapeStyle {
        hue: 200.0,
        stroke_weight: 2.0,
        brightness: 90.0,
        saturation: 90.0,
    };

    fn draw(kind: ShapeKind) -> Vec<Primitive> {
        let mut canvas = RecordingCanvas::new();
        kind.draw(&mut canvas, &GEOMETRY, &STYLE);
        canvas.calls.into_iter().map(|c| c.primitive).collect()
    }

    #[test]
    fn test_ellipse_with_dot() {
        let calls = draw(ShapeKind::EllipseWithDot);
        assert_eq!(calls.len(), 2);

        match &calls[0] {
            Primitive::Ellipse { center, size, stroke } => {
                assert_eq!(*center, Vec2::new(100.0, 0.0));
                assert_relative_eq!(size.x, 16.0);
                assert_relative_eq!(size.y, 40.0);
                assert_eq!(stroke.width, 2.0);
                assert_eq!(stroke.color.alpha, 0.8);
            }
            other => panic!("expected ellipse, got {:?}", other),
        }
        match &calls[1] {
            Primitive::Circle { center, diameter, fill } => {
                assert_eq!(*center, Vec2::new(100.0, 0.0));
                assert_eq!(*diameter, 2.0);
                assert_eq!(fill.color.brightness, 100.0);
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn test_spoke_and_arc() {
        assert_eq!(
            draw(ShapeKind::Spoke),
            vec![Primitive::Line {
                from: Vec2::ZERO,
                to: Vec2::new(100.0, 0.0),
                stroke: STYLE.stroke(),
            }]
        );

        match &draw(ShapeKind::ArcSweep)[0] {
            Primitive::Arc {
                center,
                size,
                start_deg,
                end_deg,
                ..
            } => {
                assert_eq!(*center, Vec2::ZERO);
                assert_eq!(*size, Vec2::splat(150.0));
                assert_eq!((*start_deg, *end_deg), (-30.0, 30.0));
            }
            other => panic!("expected arc, got {:?}", other),
        }
    }

    #[test]
    fn test_bezier_is_mirrored() {
        let calls = draw(ShapeKind::MirroredBezier);
        assert_eq!(calls.len(), 2);

        let (Primitive::Bezier { points: a, .. }, Primitive::Bezier { points: b, .. }) =
            (&calls[0], &calls[1])
        else {
            panic!("expected two béziers");
        };

        for (p, q) in a.iter().zip(b.iter()) {
            assert_eq!(p.x, q.x);
            assert_eq!(p.y, -q.y);
        }
        assert_eq!(a[0], Vec2::ZERO);
        assert_eq!(a[3], Vec2::new(100.0, 0.0));
        assert_eq!(a[1].y.abs(), 40.0);
    }

    #[test]
    fn test_petal_control_points() {
        let calls = draw(ShapeKind::Petal);
        let Primitive::Curve { points, .. } = &calls[0] else {
            panic!("expected curve");
        };
        assert_relative_eq!(points[1].x, 90.0);
        assert_relative_eq!(points[2].x, 80.0);
        assert_relative_eq!(points[2].y, 20.0);
        assert_relative_eq!(points[3].y, 30.0);
    }

    #[test]
    fn test_triangle_fan_is_filled_only() {
        let calls = draw(ShapeKind::TriangleFan);
        assert_eq!(calls.len(), 1);
        let fill = calls[0].fill().expect("triangle is filled");
        assert_eq!(fill.color.alpha, 0.5);
        assert_eq!(fill.color.saturation, 80.0);
        assert!(calls[0].stroke().is_none());
    }

    #[test]
    fn test_dot_ring_on_circle() {
        let calls = draw(ShapeKind::DotRing);
        assert_eq!(calls.len(), 12);
        for call in &calls {
            let Primitive::Circle { center, diameter, .. } = call else {
                panic!("expected circle");
            };
            assert_relative_eq!(center.length(), 100.0, epsilon = 1e-3);
            assert_relative_eq!(*diameter, 3.0);
        }
    }

    #[test]
    fn test_legacy_single_dot() {
        let calls = draw(ShapeKind::Dot);
        assert_eq!(
            calls,
            vec![Primitive::Circle {
                center: Vec2::new(100.0, 0.0),
                diameter: 4.0,
                fill: STYLE.fill(90.0, 90.0, 0.7),
            }]
        );
    }
}
