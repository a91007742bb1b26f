//! Sonomandala - an audio-reactive mandala
//!
//! Every click draws a new symmetric pattern; its colors, stroke weights and
//! size breathe with the sound in the room.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use glam::Vec2;
use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use sonomandala::audio::{list_input_devices, ConstantLevel, LevelSource, MicrophoneInput, WavLevelSource};
use sonomandala::cli::Args;
use sonomandala::params::{AudioInputConfig, RecordingConfig, RenderConfig};
use sonomandala::rendering::{MeshCanvas, RenderSystem};
use sonomandala::{MandalaError, MandalaSystem};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    canvas: MeshCanvas,

    // Mandala and its audio input
    mandala: MandalaSystem,
    level_source: Box<dyn LevelSource>,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    /// Explicit frame counter handed to every tick
    frame_index: u64,
    /// Seed of a click-requested regenerate, applied before the next tick
    pending_seed: Option<u64>,
    /// Fatal error surfaced from inside the event loop
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(
        mandala: MandalaSystem,
        level_source: Box<dyn LevelSource>,
        render_config: RenderConfig,
        recording_config: Option<RecordingConfig>,
    ) -> Self {
        Self {
            window: None,
            render_system: None,
            canvas: MeshCanvas::new(render_config.curve_segments),
            mandala,
            level_source,
            render_config,
            recording_config,
            frame_index: 0,
            pending_seed: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Sonomandala")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("Failed to create window")),
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.recording_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let (width, height) = render_system.size();
        self.mandala.initialize(width, height);

        info!("Sonomandala is running: click for a new pattern, ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.pending_seed = Some(time_seed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mandala
                    .on_pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Resized(size) => {
                // The initial Resized repeats the creation size; keep the seeded pattern
                let unchanged = self
                    .render_system
                    .as_ref()
                    .is_some_and(|r| r.size() == (size.width, size.height));
                if unchanged || size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                self.mandala.on_resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Run one tick and present it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        // Regenerate between ticks, never inside one
        if let Some(seed) = self.pending_seed.take() {
            self.mandala.on_regenerate_request(seed);
        }

        let level = self.level_source.level(self.frame_index);
        let (width, height) = render_system.size();
        self.canvas
            .begin_frame(width as f32, height as f32, self.render_config.trail_fade_alpha);

        if let Some(summary) = self.mandala.on_frame(self.frame_index, level, &mut self.canvas) {
            if self.frame_index % 60 == 0 {
                debug!(
                    "Frame {}: level {:.4}, baseline {:.4}, excess {:.4}, hue {:.1}, scale {:.2}",
                    self.frame_index,
                    summary.audio.raw_level,
                    summary.audio.ambient_baseline,
                    summary.audio.excess_energy,
                    summary.visual.hue,
                    summary.scale
                );
            }
        }

        match render_system.render(self.canvas.vertices(), self.frame_index as usize) {
            Ok(()) => {}
            Err(MandalaError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(MandalaError::Surface(wgpu::SurfaceError::Timeout)) => {
                warn!("Surface timeout, skipping frame");
            }
            Err(e) => return self.fail(event_loop, e.into()),
        }

        self.frame_index += 1;

        if let Some(config) = &self.recording_config {
            let total = config.total_frames() as u64;
            if self.frame_index % config.fps as u64 == 0 {
                info!("Recorded {}/{} frames", self.frame_index, total);
            }
            if self.frame_index >= total {
                info!("Recording complete: {} frames in {}", total, config.frames_dir());
                event_loop.exit();
            }
        }
    }
}

/// Seed derived from the wall clock
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Pick the level source: WAV file, microphone, or silence when no device opens
fn open_level_source(config: &AudioInputConfig, fps: u32) -> anyhow::Result<Box<dyn LevelSource>> {
    if let Some(path) = &config.wav_path {
        let source = WavLevelSource::open(path, fps)?;
        info!("Audio from {} ({} frames)", path, source.frame_count());
        return Ok(Box::new(source));
    }

    match MicrophoneInput::open(config.device_name.as_deref()) {
        Ok(input) => {
            info!("Listening on {}", input.device_name());
            Ok(Box::new(input))
        }
        Err(e @ MandalaError::DeviceNotFound { .. }) => Err(e.into()),
        Err(e) => {
            warn!("{}; continuing without audio", e);
            Ok(Box::new(ConstantLevel(0.0)))
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_devices {
        for name in list_input_devices()? {
            println!("{}", name);
        }
        return Ok(());
    }

    info!("Sonomandala v{}", env!("CARGO_PKG_VERSION"));

    let mandala_config = args.mandala_config()?;
    let render_config = args.render_config()?;
    let recording_config = args.create_recording_config()?;
    let level_source = open_level_source(&args.audio_input_config(), args.fps)?;

    let seed = args.seed.unwrap_or_else(time_seed);
    info!("Seed: {}", seed);
    let mandala = MandalaSystem::new(mandala_config, seed)?;

    let mut app = App::new(mandala, level_source, render_config, recording_config);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
