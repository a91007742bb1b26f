//! Procedurally generated mandala patterns.
//!
//! A [`Pattern`] is created once per regenerate and then rendered every frame
//! unchanged; it is replaced as a whole, never edited in place.

mod generator;
mod palette;

pub use generator::ParameterGenerator;
pub use palette::{Palette, PaletteLibrary};

/// Shape variants a layer can draw in every segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Stroked ellipse at the layer radius with a filled center dot
    EllipseWithDot,
    /// Spoke from the center out to the layer radius
    Spoke,
    /// Arc around the center spanning ±30°
    ArcSweep,
    /// Two mirrored cubic béziers from the center to the layer radius
    MirroredBezier,
    /// Petal made of two mirrored Catmull-Rom curves
    Petal,
    /// Filled thin triangle from the center
    TriangleFan,
    /// Twelve dots evenly spaced on a ring
    DotRing,
    /// Single dot at the layer radius (older alternative to `DotRing`)
    Dot,
}

impl ShapeKind {
    /// The canonical seven-variant set, in index order
    pub const CANONICAL: [ShapeKind; 7] = [
        ShapeKind::EllipseWithDot,
        ShapeKind::Spoke,
        ShapeKind::ArcSweep,
        ShapeKind::MirroredBezier,
        ShapeKind::Petal,
        ShapeKind::TriangleFan,
        ShapeKind::DotRing,
    ];

    /// Parse a shape name (used by the CLI shape-set option)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ellipse" | "ellipse_with_dot" => Some(ShapeKind::EllipseWithDot),
            "spoke" | "line" => Some(ShapeKind::Spoke),
            "arc" => Some(ShapeKind::ArcSweep),
            "bezier" => Some(ShapeKind::MirroredBezier),
            "petal" | "curve" => Some(ShapeKind::Petal),
            "triangle" | "fan" => Some(ShapeKind::TriangleFan),
            "dots" | "dot_ring" => Some(ShapeKind::DotRing),
            "dot" => Some(ShapeKind::Dot),
            _ => None,
        }
    }
}

/// One concentric ring of the mandala
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Base radius in pixels (> 0), before noise animation and scaling
    pub radius: f32,
    pub shape: ShapeKind,
    /// Phase offset into the coherent noise field
    pub noise_seed: f32,
}

/// A complete generated mandala
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Rotational symmetry order (always > 0)
    pub segment_count: u32,
    /// Stroke width before audio modulation (pixels)
    pub base_stroke_width: f32,
    /// Layers in draw order; later layers are drawn on top and thinner
    pub layers: Vec<Layer>,
}

impl Pattern {
    /// Rotation between neighbouring segments (degrees)
    pub fn angle_step_degrees(&self) -> f32 {
        debug_assert!(self.segment_count > 0, "pattern without segments");
        360.0 / self.segment_count as f32
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_step() {
        let pattern = Pattern {
            segment_count: 24,
            base_stroke_width: 1.0,
            layers: Vec::new(),
        };
        assert_eq!(pattern.angle_step_degrees(), 15.0);
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(ShapeKind::from_name("Petal"), Some(ShapeKind::Petal));
        assert_eq!(ShapeKind::from_name("dots"), Some(ShapeKind::DotRing));
        assert_eq!(ShapeKind::from_name("hexagon"), None);
    }
}
