//! Live microphone level metering via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SizedSample};
use log::{error, info};
use std::sync::{Arc, Mutex};

use super::{rms, LevelSource};
use crate::error::{MandalaError, Result};

/// Most recent block level written by the audio callback
#[derive(Debug, Default)]
struct LevelSlot {
    level: f32,
    fresh: bool,
}

impl LevelSlot {
    fn publish(&mut self, level: f32) {
        self.level = level;
        self.fresh = true;
    }

    /// Latest level if it has not been read yet
    fn take(&mut self) -> Option<f32> {
        if !self.fresh {
            return None;
        }
        self.fresh = false;
        Some(self.level)
    }
}

/// Input stream publishing one RMS level per audio callback block
pub struct MicrophoneInput {
    /// Shared with the audio callback thread
    slot: Arc<Mutex<LevelSlot>>,

    /// Input stream (kept alive)
    _stream: cpal::Stream,

    device_name: String,
}

impl MicrophoneInput {
    /// Open and start an input stream
    ///
    /// # Arguments
    /// * `device_name` - Case-insensitive substring of the device name; default input when `None`
    pub fn open(device_name: Option<&str>) -> Result<Self> {
        let device = match device_name {
            Some(name) => find_input_device(name)?,
            None => cpal::default_host()
                .default_input_device()
                .ok_or(MandalaError::NoInputDevice)?,
        };
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported = device
            .default_input_config()
            .map_err(|e| MandalaError::AudioStream {
                reason: format!("Failed to get input config: {}", e),
            })?;

        info!(
            "Audio input: {} @ {}Hz, {} channel(s), {}",
            name,
            supported.sample_rate().0,
            supported.channels(),
            supported.sample_format()
        );

        let slot = Arc::new(Mutex::new(LevelSlot::default()));
        let config: cpal::StreamConfig = supported.config();

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&slot)),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&slot)),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&slot)),
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, Arc::clone(&slot)),
            other => {
                return Err(MandalaError::UnsupportedSampleFormat {
                    format: other.to_string(),
                })
            }
        }
        .map_err(|e| MandalaError::AudioStream {
            reason: format!("Failed to build input stream: {}", e),
        })?;

        stream.play().map_err(|e| MandalaError::AudioStream {
            reason: format!("Failed to start input stream: {}", e),
        })?;

        Ok(Self {
            slot,
            _stream: stream,
            device_name: name,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl LevelSource for MicrophoneInput {
    /// Never waits on the audio thread: contention reads as "no new sample"
    fn level(&mut self, _frame_index: u64) -> Option<f32> {
        self.slot.try_lock().ok()?.take()
    }
}

fn build_stream<T>(
    device: &Device,
    config: &cpal::StreamConfig,
    slot: Arc<Mutex<LevelSlot>>,
) -> std::result::Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let mut block = Vec::new();

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            block.clear();
            block.extend(data.iter().map(|&s| f32::from_sample(s)));
            let level = rms(&block).min(1.0);

            if let Ok(mut slot) = slot.lock() {
                slot.publish(level);
            }
        },
        |err| error!("Audio input stream error: {}", err),
        None,
    )
}

/// List the names of all available input devices (default first)
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let mut names = Vec::new();

    if let Some(device) = host.default_input_device() {
        if let Ok(name) = device.name() {
            names.push(format!("{} (default)", name));
        }
    }

    if let Ok(devices) = host.input_devices() {
        for device in devices {
            if let Ok(name) = device.name() {
                if !names.iter().any(|n| n.trim_end_matches(" (default)") == name) {
                    names.push(name);
                }
            }
        }
    }

    if names.is_empty() {
        return Err(MandalaError::NoInputDevice);
    }

    Ok(names)
}

/// Find an input device by case-insensitive substring match
pub fn find_input_device(device_name: &str) -> Result<Device> {
    let host = cpal::default_host();
    let wanted = device_name.trim_end_matches(" (default)").to_lowercase();

    // Check the default device first; enumerating can be slow on some hosts
    if let Some(device) = host.default_input_device() {
        if let Ok(name) = device.name() {
            if name.to_lowercase().contains(&wanted) {
                return Ok(device);
            }
        }
    }

    if let Ok(devices) = host.input_devices() {
        for device in devices {
            if let Ok(name) = device.name() {
                if name.to_lowercase().contains(&wanted) {
                    return Ok(device);
                }
            }
        }
    }

    Err(MandalaError::DeviceNotFound {
        name: device_name.to_string(),
    })
}
