//! Error handling for the mandala renderer.
//!
//! Only the outer shell can fail (devices, files, GPU); pattern generation,
//! audio tracking and compositing are infallible.

use thiserror::Error;

/// Result type alias for fallible operations
pub type Result<T> = std::result::Result<T, MandalaError>;

/// Main error type
#[derive(Error, Debug)]
pub enum MandalaError {
    // Configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Audio input
    #[error("No audio input device found")]
    NoInputDevice,

    #[error("Audio device '{name}' not found")]
    DeviceNotFound { name: String },

    #[error("Unsupported sample format: {format}")]
    UnsupportedSampleFormat { format: String },

    #[error("Audio stream error: {reason}")]
    AudioStream { reason: String },

    #[error("Failed to read WAV file {path}")]
    Wav {
        path: String,
        #[source]
        source: hound::Error,
    },

    // Rendering
    #[error("GPU initialization failed: {reason}")]
    GpuInit { reason: String },

    #[error("Surface error")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Failed to save frame {path}")]
    FrameCapture {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MandalaError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
