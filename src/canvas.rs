//! Drawing-primitive interface the shape renderer draws through.
//!
//! Style is never canvas state: every primitive call carries its own
//! [`Stroke`] or [`Fill`], so nothing set for one shape can reach the next.
//! The only state is the current transform, which [`with_transform`] scopes
//! and always restores.

use glam::{Affine2, Vec2};

/// Color in HSB space with alpha
///
/// Hue in degrees (wrapped), saturation and brightness 0 - 100, alpha 0 - 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsba {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub alpha: f32,
}

impl Hsba {
    pub fn new(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
            alpha,
        }
    }

    /// Convert to linear-blend RGBA components in [0, 1]
    pub fn to_rgba(&self) -> [f32; 4] {
        let hue = self.hue.rem_euclid(360.0);
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match (hue / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [r + m, g + m, b + m, self.alpha.clamp(0.0, 1.0)]
    }
}

/// Outline style for one primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Hsba,
    /// Line width (pixels)
    pub width: f32,
}

/// Fill style for one primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Hsba,
}

/// 2D drawing primitives in the current local coordinate frame
///
/// Angles are in degrees, sizes are full diameters (not radii).
pub trait Canvas {
    fn transform(&self) -> Affine2;
    fn set_transform(&mut self, transform: Affine2);

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
    /// Stroked ellipse outline
    fn ellipse(&mut self, center: Vec2, size: Vec2, stroke: &Stroke);
    /// Open stroked elliptical arc from `start_deg` to `end_deg`
    fn arc(&mut self, center: Vec2, size: Vec2, start_deg: f32, end_deg: f32, stroke: &Stroke);
    /// Cubic bézier through anchors `p[0]`, `p[3]` with controls `p[1]`, `p[2]`
    fn bezier(&mut self, points: [Vec2; 4], stroke: &Stroke);
    /// Catmull-Rom segment from `p[1]` to `p[2]`, shaped by `p[0]` and `p[3]`
    fn curve(&mut self, points: [Vec2; 4], stroke: &Stroke);
    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, fill: &Fill);
    /// Filled circle of the given diameter
    fn circle(&mut self, center: Vec2, diameter: f32, fill: &Fill);
}

/// Run `draw` in a local frame composed onto the current transform
///
/// The previous transform is restored afterwards, so sibling scopes never see
/// each other's rotations.
pub fn with_transform<C, R>(canvas: &mut C, local: Affine2, draw: impl FnOnce(&mut C) -> R) -> R
where
    C: Canvas + ?Sized,
{
    let saved = canvas.transform();
    canvas.set_transform(saved * local);
    let result = draw(canvas);
    canvas.set_transform(saved);
    result
}

/// Rotation about the local origin (degrees, clockwise on a y-down canvas)
pub fn rotation(degrees: f32) -> Affine2 {
    Affine2::from_angle(degrees.to_radians())
}
