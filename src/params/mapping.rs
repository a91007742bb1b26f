//! Audio → visual mapping, motion and compositing parameters.

/// Which tracker signal drives the visual mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergySource {
    /// Smoothed level above the ambient baseline (reacts to relative events)
    #[default]
    Excess,
    /// Smoothed level, no baseline subtraction
    Smoothed,
    /// Latest raw sample
    Raw,
}

/// Mapping from audio energy to visual parameters
///
/// Every output is a clamped linear map of the energy over
/// `[0, input_max]`; inputs outside that range saturate at the output bounds.
#[derive(Debug, Clone)]
pub struct AudioReactiveMapping {
    pub source: EnergySource,

    /// Energy that saturates every mapping (observed values: 0.05 - 0.1)
    pub input_max: f32,

    /// Hue at zero and at saturating energy (degrees)
    pub hue_range: (f32, f32),

    /// Stroke width at saturating energy, as a multiple of the base width
    /// Observed values: 5 - 7
    pub stroke_multiplier: f32,

    /// Brightness range (0 - 100); fixed at `default_brightness` when `None`
    pub brightness_range: Option<(f32, f32)>,

    /// Saturation range (0 - 100); fixed at `default_saturation` when `None`
    pub saturation_range: Option<(f32, f32)>,

    /// Audio-driven scale range (dimensionless)
    pub scale_range: (f32, f32),

    pub default_brightness: f32,
    pub default_saturation: f32,
}

impl Default for AudioReactiveMapping {
    fn default() -> Self {
        Self {
            source: EnergySource::Excess,
            input_max: 0.05,
            hue_range: (180.0, 360.0),
            stroke_multiplier: 5.0,
            brightness_range: None,
            saturation_range: None,
            scale_range: (0.3, 1.2),
            default_brightness: 90.0,
            default_saturation: 90.0,
        }
    }
}

impl AudioReactiveMapping {
    /// Mapping with brightness and saturation also following the energy
    pub fn full() -> Self {
        Self {
            input_max: 0.1,
            stroke_multiplier: 7.0,
            brightness_range: Some((60.0, 100.0)),
            saturation_range: Some((70.0, 100.0)),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.input_max > 0.0) {
            return Err(format!("Input max must be > 0, got {}", self.input_max));
        }
        if !(self.stroke_multiplier > 0.0) {
            return Err("Stroke multiplier must be > 0".to_string());
        }
        Ok(())
    }
}

/// How the whole mandala is scaled each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// No scaling (factor 1)
    Fixed,
    /// Pointer distance from center
    #[default]
    Pointer,
    /// Audio-mapped scale
    Audio,
    /// Product of pointer and audio factors
    PointerAndAudio,
}

/// How the whole mandala rotates over time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationMode {
    None,
    /// Speed follows pointer distance (fast near center)
    #[default]
    Pointer,
    /// Constant speed (degrees per frame)
    Constant(f32),
}

/// Pointer- and audio-driven global motion
#[derive(Debug, Clone)]
pub struct MotionMapping {
    pub scale_mode: ScaleMode,
    pub rotation_mode: RotationMode,

    /// Scale at pointer distance 0 and 1
    pub pointer_scale_range: (f32, f32),

    /// Rotation speed at pointer distance 0 and 1 (degrees per frame)
    pub pointer_rotation_range: (f32, f32),
}

impl Default for MotionMapping {
    fn default() -> Self {
        Self {
            scale_mode: ScaleMode::Pointer,
            rotation_mode: RotationMode::Pointer,
            pointer_scale_range: (0.2, 1.0),
            pointer_rotation_range: (0.5, 0.01),
        }
    }
}

/// Where per-layer hues come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Audio hue shifted by `layer_hue_step` per layer
    #[default]
    HueShift,
    /// Selected palette, cycled by layer index
    Palette,
}

/// Nesting of the segment and layer loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// Every segment of layer j before layer j + 1 (keeps layer z-order)
    #[default]
    LayerMajor,
    /// Every layer of segment i before segment i + 1
    SegmentMajor,
}

/// Radial compositor parameters
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    pub color_mode: ColorMode,
    pub draw_order: DrawOrder,

    /// Noise phase advance per frame
    pub noise_phase_per_frame: f64,

    /// Noise-driven radius excursion (pixels, ±)
    pub radius_jitter_px: f32,

    /// Hue offset between neighbouring layers in `HueShift` mode (degrees)
    pub layer_hue_step: f32,

    /// Outermost layer stroke width as a fraction of the innermost
    pub outer_stroke_fraction: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::HueShift,
            draw_order: DrawOrder::LayerMajor,
            noise_phase_per_frame: 0.005,
            radius_jitter_px: 20.0,
            layer_hue_step: 20.0,
            outer_stroke_fraction: 0.5,
        }
    }
}
