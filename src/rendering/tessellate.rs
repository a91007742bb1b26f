//! CPU tessellation of canvas primitives into colored triangles.
//!
//! Positions stay in canvas pixel space (y down); the mesh shader maps them
//! to clip space with the screen size uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};

use crate::canvas::{Canvas, Fill, Stroke};

/// Mesh vertex: canvas-space position and straight RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// [`Canvas`] that accumulates a triangle list for one frame
#[derive(Debug)]
pub struct MeshCanvas {
    vertices: Vec<Vertex>,
    transform: Affine2,
    /// Samples per full ellipse/circle and per curve span
    curve_segments: usize,
}

impl MeshCanvas {
    pub fn new(curve_segments: usize) -> Self {
        Self {
            vertices: Vec::new(),
            transform: Affine2::IDENTITY,
            curve_segments: curve_segments.max(3),
        }
    }

    /// Start a new frame with a translucent black quad over the whole canvas
    ///
    /// Drawn into a persistent target, the quad fades earlier frames out
    /// gradually and leaves motion trails.
    pub fn begin_frame(&mut self, width: f32, height: f32, fade_alpha: f32) {
        self.vertices.clear();
        self.transform = Affine2::IDENTITY;

        let color = [0.0, 0.0, 0.0, fade_alpha];
        let (a, b, c, d) = (
            Vec2::ZERO,
            Vec2::new(width, 0.0),
            Vec2::new(width, height),
            Vec2::new(0.0, height),
        );
        self.push_triangle(a, b, c, color);
        self.push_triangle(a, c, d, color);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangle in local coordinates
    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            let p = self.transform.transform_point2(p);
            self.vertices.push(Vertex {
                position: p.to_array(),
                color,
            });
        }
    }

    /// Stroke a polyline as one quad per segment
    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        let color = stroke.color.to_rgba();
        let half_width = stroke.width * 0.5;

        for pair in points.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            let Some(direction) = (q - p).try_normalize() else {
                continue;
            };
            let normal = direction.perp() * half_width;

            self.push_triangle(p + normal, q + normal, q - normal, color);
            self.push_triangle(p + normal, q - normal, p - normal, color);
        }
    }

    /// Points on an elliptical arc (angles in degrees, y down)
    ///
    /// `full_turn_segments` is the sample density of a complete ellipse.
    fn arc_points(
        center: Vec2,
        size: Vec2,
        start_deg: f32,
        end_deg: f32,
        full_turn_segments: usize,
    ) -> Vec<Vec2> {
        let radii = size * 0.5;
        let sweep = end_deg - start_deg;
        let steps = ((full_turn_segments as f32 * sweep.abs() / 360.0).ceil() as usize).max(2);

        (0..=steps)
            .map(|k| {
                let angle = (start_deg + sweep * k as f32 / steps as f32).to_radians();
                center + Vec2::new(angle.cos(), angle.sin()) * radii
            })
            .collect()
    }
}

/// Rim segments for a filled circle: about one per pixel of radius
pub fn circle_segments(diameter: f32, max_segments: usize) -> usize {
    const MIN_CIRCLE_SEGMENTS: usize = 6;
    ((diameter * 0.5).ceil() as usize)
        .max(MIN_CIRCLE_SEGMENTS)
        .min(max_segments.max(MIN_CIRCLE_SEGMENTS))
}

/// Point on a cubic Bézier at `t` in [0, 1]
pub fn cubic_bezier(points: &[Vec2; 4], t: f32) -> Vec2 {
    let u = 1.0 - t;
    points[0] * (u * u * u)
        + points[1] * (3.0 * u * u * t)
        + points[2] * (3.0 * u * t * t)
        + points[3] * (t * t * t)
}

/// Point on the Catmull-Rom span from `points[1]` to `points[2]`
pub fn catmull_rom(points: &[Vec2; 4], t: f32) -> Vec2 {
    let [p0, p1, p2, p3] = *points;
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

impl Canvas for MeshCanvas {
    fn transform(&self) -> Affine2 {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.stroke_polyline(&[from, to], stroke);
    }

    fn ellipse(&mut self, center: Vec2, size: Vec2, stroke: &Stroke) {
        let points = Self::arc_points(center, size, 0.0, 360.0, self.curve_segments);
        self.stroke_polyline(&points, stroke);
    }

    fn arc(&mut self, center: Vec2, size: Vec2, start_deg: f32, end_deg: f32, stroke: &Stroke) {
        let points = Self::arc_points(center, size, start_deg, end_deg, self.curve_segments);
        self.stroke_polyline(&points, stroke);
    }

    fn bezier(&mut self, points: [Vec2; 4], stroke: &Stroke) {
        let n = self.curve_segments;
        let samples: Vec<Vec2> = (0..=n)
            .map(|k| cubic_bezier(&points, k as f32 / n as f32))
            .collect();
        self.stroke_polyline(&samples, stroke);
    }

    fn curve(&mut self, points: [Vec2; 4], stroke: &Stroke) {
        let n = self.curve_segments;
        let samples: Vec<Vec2> = (0..=n)
            .map(|k| catmull_rom(&points, k as f32 / n as f32))
            .collect();
        self.stroke_polyline(&samples, stroke);
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, fill: &Fill) {
        self.push_triangle(a, b, c, fill.color.to_rgba());
    }

    fn circle(&mut self, center: Vec2, diameter: f32, fill: &Fill) {
        if !(diameter > 0.0) {
            return;
        }

        let color = fill.color.to_rgba();
        let rim = Self::arc_points(
            center,
            Vec2::splat(diameter),
            0.0,
            360.0,
            circle_segments(diameter, self.curve_segments),
        );
        for pair in rim.windows(2) {
            self.push_triangle(center, pair[0], pair[1], color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{with_transform, Hsba};
    use approx::assert_relative_eq;

    fn stroke(width: f32) -> Stroke {
        Stroke {
            color: Hsba::new(0.0, 100.0, 100.0, 0.8),
            width,
        }
    }

    #[test]
    fn test_begin_frame_emits_fade_quad() {
        let mut canvas = MeshCanvas::new(48);
        canvas.line(Vec2::ZERO, Vec2::X, &stroke(1.0));
        canvas.begin_frame(800.0, 600.0, 0.1);

        assert_eq!(canvas.vertex_count(), 6);
        for v in canvas.vertices() {
            assert_eq!(v.color, [0.0, 0.0, 0.0, 0.1]);
            assert!(v.position[0] == 0.0 || v.position[0] == 800.0);
            assert!(v.position[1] == 0.0 || v.position[1] == 600.0);
        }
    }

    #[test]
    fn test_line_quad_under_transform() {
        let mut canvas = MeshCanvas::new(48);
        with_transform(&mut canvas, Affine2::from_translation(Vec2::new(10.0, 20.0)), |c| {
            c.line(Vec2::ZERO, Vec2::new(5.0, 0.0), &stroke(2.0));
        });

        assert_eq!(canvas.vertex_count(), 6);
        for v in canvas.vertices() {
            assert!((10.0..=15.0).contains(&v.position[0]));
            assert!((19.0..=21.0).contains(&v.position[1]));
            assert_eq!(v.color, [1.0, 0.0, 0.0, 0.8]);
        }
        assert_eq!(canvas.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_degenerate_line_skipped() {
        let mut canvas = MeshCanvas::new(48);
        canvas.line(Vec2::ONE, Vec2::ONE, &stroke(2.0));
        assert_eq!(canvas.vertex_count(), 0);
    }

    #[test]
    fn test_ellipse_is_closed_ring() {
        let mut canvas = MeshCanvas::new(32);
        canvas.ellipse(Vec2::ZERO, Vec2::new(20.0, 10.0), &stroke(1.0));
        assert_eq!(canvas.vertex_count(), 32 * 6);

        // Every vertex lies within half a stroke of the ellipse outline
        for v in canvas.vertices() {
            let p = Vec2::from(v.position);
            let r = (p.x / 10.0).powi(2) + (p.y / 5.0).powi(2);
            assert!(r > 0.6 && r < 1.5, "vertex {:?} off the outline", p);
        }
    }

    #[test]
    fn test_arc_sweep_sample_count() {
        let mut canvas = MeshCanvas::new(48);
        canvas.arc(Vec2::ZERO, Vec2::splat(100.0), -30.0, 30.0, &stroke(1.0));
        // 60° of a 48-step circle is 8 segments
        assert_eq!(canvas.vertex_count(), 8 * 6);
    }

    #[test]
    fn test_circle_fan() {
        let mut canvas = MeshCanvas::new(16);
        let fill = Fill {
            color: Hsba::new(120.0, 100.0, 100.0, 0.7),
        };
        canvas.circle(Vec2::new(50.0, 50.0), 10.0, &fill);

        // Radius 5 gets the six-segment minimum
        assert_eq!(canvas.vertex_count(), 6 * 3);
        for v in canvas.vertices() {
            assert!(Vec2::from(v.position).distance(Vec2::new(50.0, 50.0)) <= 5.0 + 1e-4);
            assert_eq!(v.color, [0.0, 1.0, 0.0, 0.7]);
        }

        canvas.circle(Vec2::ZERO, 0.0, &fill);
        assert_eq!(canvas.vertex_count(), 6 * 3);
    }

    #[test]
    fn test_circle_detail_follows_size() {
        assert_eq!(circle_segments(1.5, 48), 6);
        assert_eq!(circle_segments(22.0, 48), 11);
        assert_eq!(circle_segments(500.0, 48), 48);

        // A ring of twelve small dots stays far below full curve detail
        let mut canvas = MeshCanvas::new(48);
        let fill = Fill {
            color: Hsba::new(0.0, 90.0, 90.0, 0.7),
        };
        for _ in 0..12 {
            canvas.circle(Vec2::new(100.0, 0.0), 3.0, &fill);
        }
        assert_eq!(canvas.vertex_count(), 12 * 6 * 3);
    }

    #[test]
    fn test_bezier_endpoints() {
        let points = [
            Vec2::ZERO,
            Vec2::new(10.0, -10.0),
            Vec2::new(90.0, -10.0),
            Vec2::new(100.0, 0.0),
        ];
        assert_eq!(cubic_bezier(&points, 0.0), points[0]);
        assert_eq!(cubic_bezier(&points, 1.0), points[3]);
        assert_relative_eq!(cubic_bezier(&points, 0.5).x, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_catmull_rom_passes_through_inner_points() {
        let points = [
            Vec2::new(100.0, 0.0),
            Vec2::new(90.0, 0.0),
            Vec2::new(80.0, 20.0),
            Vec2::new(70.0, 30.0),
        ];
        let start = catmull_rom(&points, 0.0);
        let end = catmull_rom(&points, 1.0);
        assert_relative_eq!(start.x, 90.0, epsilon = 1e-4);
        assert_relative_eq!(start.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(end.x, 80.0, epsilon = 1e-4);
        assert_relative_eq!(end.y, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
