//! Command-line argument parsing.

use clap::Parser;
use log::info;

use crate::error::{MandalaError, Result};
use crate::params::{
    AudioInputConfig, AudioReactiveMapping, ColorMode, DrawOrder, RecordingConfig, RenderConfig,
    RotationMode, ScaleMode,
};
use crate::pattern::ShapeKind;
use crate::system::MandalaConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sonomandala")]
#[command(about = "Audio-reactive radial mandala renderer", long_about = None)]
pub struct Args {
    /// Seed for the first pattern (default: derived from the clock)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Color layers from a random analogous palette instead of the audio hue
    #[arg(long)]
    pub palette: bool,

    /// Global scale: fixed, pointer (default), audio, both
    #[arg(long, value_name = "MODE", default_value = "pointer")]
    pub scale_mode: String,

    /// Global rotation: none, pointer (default), constant
    #[arg(long, value_name = "MODE", default_value = "pointer")]
    pub rotation_mode: String,

    /// Rotation speed for the constant mode (degrees per frame)
    #[arg(long, value_name = "DEGREES", default_value = "0.2")]
    pub rotation_speed: f32,

    /// Loop nesting: layer (default, keeps layer z-order) or segment
    #[arg(long, value_name = "ORDER", default_value = "layer")]
    pub draw_order: String,

    /// Use a single dot instead of the twelve-dot ring
    #[arg(long)]
    pub legacy_dots: bool,

    /// Comma-separated shape subset (ellipse,spoke,arc,bezier,petal,triangle,dots,dot)
    #[arg(long, value_name = "LIST")]
    pub shapes: Option<String>,

    /// Let brightness and saturation follow the audio energy too
    #[arg(long)]
    pub full_mapping: bool,

    /// Audio input device (case-insensitive substring of its name)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// List audio input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Drive the visuals from a WAV file instead of the microphone
    #[arg(long, value_name = "PATH")]
    pub wav: Option<String>,

    /// Record frames to disk (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Directory for recorded frames
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: String,

    /// Frame rate for WAV analysis and recording
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,
}

impl Args {
    /// Build the session configuration from the flags
    pub fn mandala_config(&self) -> Result<MandalaConfig> {
        let mut config = MandalaConfig::default();

        if let Some(list) = &self.shapes {
            config.generator.shapes = parse_shapes(list)?;
        }
        if self.legacy_dots {
            config.generator = config.generator.with_legacy_dots();
        }
        if self.full_mapping {
            config.mapping = AudioReactiveMapping::full();
        }

        config.motion.scale_mode = parse_scale_mode(&self.scale_mode)?;
        config.motion.rotation_mode = parse_rotation_mode(&self.rotation_mode, self.rotation_speed)?;
        config.compositor.draw_order = parse_draw_order(&self.draw_order)?;
        if self.palette {
            config.compositor.color_mode = ColorMode::Palette;
        }

        info!(
            "Scale: {:?}, rotation: {:?}, draw order: {:?}, color: {:?}",
            config.motion.scale_mode,
            config.motion.rotation_mode,
            config.compositor.draw_order,
            config.compositor.color_mode
        );

        config.validate()?;
        Ok(config)
    }

    pub fn render_config(&self) -> Result<RenderConfig> {
        if self.width == 0 || self.height == 0 {
            return Err(MandalaError::config(format!(
                "Window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        })
    }

    pub fn audio_input_config(&self) -> AudioInputConfig {
        AudioInputConfig {
            device_name: self.device.clone(),
            wav_path: self.wav.clone(),
        }
    }

    /// Create recording configuration if recording mode is enabled
    ///
    /// Creates the output directories as a side effect.
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        if !(duration > 0.0) || self.fps == 0 {
            return Err(MandalaError::config(format!(
                "Recording needs a positive duration and frame rate, got {}s at {} fps",
                duration, self.fps
            )));
        }

        let config = RecordingConfig {
            fps: self.fps,
            output_dir: self.output_dir.clone(),
            ..RecordingConfig::new(duration)
        };
        std::fs::create_dir_all(config.frames_dir())?;

        Ok(Some(config))
    }
}

pub fn parse_scale_mode(name: &str) -> Result<ScaleMode> {
    match name.to_lowercase().as_str() {
        "fixed" => Ok(ScaleMode::Fixed),
        "pointer" => Ok(ScaleMode::Pointer),
        "audio" => Ok(ScaleMode::Audio),
        "both" | "pointer+audio" => Ok(ScaleMode::PointerAndAudio),
        other => Err(MandalaError::config(format!("Unknown scale mode '{}'", other))),
    }
}

pub fn parse_rotation_mode(name: &str, speed: f32) -> Result<RotationMode> {
    match name.to_lowercase().as_str() {
        "none" => Ok(RotationMode::None),
        "pointer" => Ok(RotationMode::Pointer),
        "constant" if speed.is_finite() => Ok(RotationMode::Constant(speed)),
        "constant" => Err(MandalaError::config("Rotation speed must be finite")),
        other => Err(MandalaError::config(format!("Unknown rotation mode '{}'", other))),
    }
}

pub fn parse_draw_order(name: &str) -> Result<DrawOrder> {
    match name.to_lowercase().as_str() {
        "layer" => Ok(DrawOrder::LayerMajor),
        "segment" => Ok(DrawOrder::SegmentMajor),
        other => Err(MandalaError::config(format!("Unknown draw order '{}'", other))),
    }
}

pub fn parse_shapes(list: &str) -> Result<Vec<ShapeKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            ShapeKind::from_name(name)
                .ok_or_else(|| MandalaError::config(format!("Unknown shape '{}'", name)))
        })
        .collect()
}
