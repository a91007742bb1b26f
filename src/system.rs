//! High-level mandala system: owns every piece of per-session state.
//!
//! The host drives it with explicit events (`initialize`, `on_frame`,
//! `on_regenerate_request`, `on_resize`, `on_pointer_moved`). Each event runs
//! to completion before the next, so a regenerate always replaces the
//! pattern and palette as a whole between two frames.

use glam::Vec2;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{AmbientBaselineTracker, AudioState};
use crate::canvas::Canvas;
use crate::compositor::{FrameInputs, RadialCompositor};
use crate::error::{MandalaError, Result};
use crate::mapping::{map_clamped, AudioFeatureMapper, VisualParams};
use crate::noise::NoiseField;
use crate::params::{
    AudioReactiveMapping, BaselineConfig, CompositorConfig, GeneratorConfig, MotionMapping,
    PaletteConfig, RotationMode, ScaleMode,
};
use crate::pattern::{Palette, PaletteLibrary, ParameterGenerator, Pattern};

/// Every tunable of a mandala session
#[derive(Debug, Clone, Default)]
pub struct MandalaConfig {
    pub generator: GeneratorConfig,
    pub palette: PaletteConfig,
    pub baseline: BaselineConfig,
    pub mapping: AudioReactiveMapping,
    pub motion: MotionMapping,
    pub compositor: CompositorConfig,
}

impl MandalaConfig {
    pub fn validate(&self) -> Result<()> {
        self.generator.validate().map_err(MandalaError::config)?;
        self.palette.validate().map_err(MandalaError::config)?;
        self.baseline.validate().map_err(MandalaError::config)?;
        self.mapping.validate().map_err(MandalaError::config)?;
        Ok(())
    }
}

/// Normalized pointer distance from the canvas center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// 0 at the center, 1 at a corner
    pub distance: f32,
}

impl Default for PointerState {
    /// A pointer that never moved counts as sitting in a corner
    fn default() -> Self {
        Self { distance: 1.0 }
    }
}

impl PointerState {
    /// Normalize a pointer position against the canvas half-diagonal
    pub fn from_position(position: Vec2, canvas_size: Vec2) -> Self {
        let half_diagonal = (canvas_size * 0.5).length();
        if !(half_diagonal > 0.0) {
            return Self::default();
        }

        let distance = (position - canvas_size * 0.5).length() / half_diagonal;
        Self {
            distance: distance.clamp(0.0, 1.0),
        }
    }
}

/// What one frame resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub audio: AudioState,
    pub visual: VisualParams,
    pub scale: f32,
    pub rotation_degrees: f32,
}

pub struct MandalaSystem {
    config: MandalaConfig,
    seed: u64,
    rng: StdRng,
    generator: ParameterGenerator,
    library: PaletteLibrary,
    tracker: AmbientBaselineTracker,
    mapper: AudioFeatureMapper,
    compositor: RadialCompositor,

    pattern: Option<Pattern>,
    palette: Option<Palette>,
    canvas_size: Vec2,
    pointer: PointerState,
    last_level: f32,
    rotation_degrees: f32,
}

impl MandalaSystem {
    /// Create a system and build its palette library
    ///
    /// No pattern exists until [`MandalaSystem::initialize`].
    ///
    /// # Arguments
    /// * `config` - Session configuration (validated here)
    /// * `seed` - Seed for the palette library and the first pattern
    pub fn new(config: MandalaConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let library = PaletteLibrary::build(&mut rng, &config.palette);
        info!("Built palette library with {} palettes", library.len());

        Ok(Self {
            generator: ParameterGenerator::new(config.generator.clone()),
            tracker: AmbientBaselineTracker::new(config.baseline.clone()),
            mapper: AudioFeatureMapper::new(config.mapping.clone()),
            compositor: RadialCompositor::new(config.compositor.clone(), NoiseField::new(seed as u32)),
            config,
            seed,
            rng,
            library,
            pattern: None,
            palette: None,
            canvas_size: Vec2::ZERO,
            pointer: PointerState::default(),
            last_level: 0.0,
            rotation_degrees: 0.0,
        })
    }

    /// Generate the first pattern for the canvas
    pub fn initialize(&mut self, width: u32, height: u32) {
        self.canvas_size = Vec2::new(width as f32, height as f32);
        self.on_regenerate_request(self.seed);
    }

    /// Reseed and replace pattern and palette
    pub fn on_regenerate_request(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.compositor.reseed_noise(NoiseField::new(seed as u32));
        self.regenerate();
    }

    /// Track the new canvas size and regenerate for it
    ///
    /// Before the first pattern exists this only records the size.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.canvas_size = Vec2::new(width as f32, height as f32);

        if self.pattern.is_none() {
            debug!("Resize to {}x{} before first pattern, ignoring", width, height);
            return;
        }

        debug!("Resize to {}x{}, regenerating", width, height);
        self.regenerate();
    }

    pub fn on_pointer_moved(&mut self, position: Vec2) {
        self.pointer = PointerState::from_position(position, self.canvas_size);
    }

    /// Advance audio and motion state and draw one frame
    ///
    /// # Arguments
    /// * `frame_index` - Explicit frame counter (drives the noise phase)
    /// * `level` - New audio level, or `None` to reuse the last known one
    /// * `canvas` - Drawing target
    ///
    /// # Returns
    /// * The resolved frame, or `None` if no pattern exists yet
    pub fn on_frame<C: Canvas + ?Sized>(
        &mut self,
        frame_index: u64,
        level: Option<f32>,
        canvas: &mut C,
    ) -> Option<FrameSummary> {
        if let Some(level) = level {
            self.last_level = if level.is_finite() { level } else { 0.0 };
        }
        let audio = self.tracker.update(self.last_level);

        let pattern = self.pattern.as_ref()?;
        let visual = self.mapper.map(&audio, pattern.base_stroke_width);

        let motion = &self.config.motion;
        let distance = self.pointer.distance;
        let pointer_scale = map_clamped(
            distance,
            0.0,
            1.0,
            motion.pointer_scale_range.0,
            motion.pointer_scale_range.1,
        );
        let scale = match motion.scale_mode {
            ScaleMode::Fixed => 1.0,
            ScaleMode::Pointer => pointer_scale,
            ScaleMode::Audio => visual.audio_scale,
            ScaleMode::PointerAndAudio => pointer_scale * visual.audio_scale,
        };

        let speed = match motion.rotation_mode {
            RotationMode::None => 0.0,
            RotationMode::Pointer => map_clamped(
                distance,
                0.0,
                1.0,
                motion.pointer_rotation_range.0,
                motion.pointer_rotation_range.1,
            ),
            RotationMode::Constant(degrees_per_frame) => degrees_per_frame,
        };
        self.rotation_degrees = (self.rotation_degrees + speed).rem_euclid(360.0);

        let inputs = FrameInputs {
            visual,
            scale,
            rotation_degrees: self.rotation_degrees,
            center: self.canvas_size * 0.5,
        };
        self.compositor
            .render(canvas, pattern, self.palette.as_ref(), &inputs, frame_index);

        Some(FrameSummary {
            audio,
            visual,
            scale,
            rotation_degrees: self.rotation_degrees,
        })
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn palette_library(&self) -> &PaletteLibrary {
        &self.library
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    fn regenerate(&mut self) {
        let pattern = self
            .generator
            .generate(&mut self.rng, self.canvas_size.x, self.canvas_size.y);
        let palette = self.library.select_random(&mut self.rng).clone();

        info!(
            "New pattern (seed {}): {} segments, {} layers, stroke {:.2}",
            self.seed,
            pattern.segment_count,
            pattern.layer_count(),
            pattern.base_stroke_width
        );

        self.pattern = Some(pattern);
        self.palette = Some(palette);
    }
}
