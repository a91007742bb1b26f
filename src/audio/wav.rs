//! Frame-synchronous levels read from a WAV file.
//!
//! Offline renders need a level per frame that does not depend on wall-clock
//! timing, so the file is decoded up front and sliced by frame index.

use log::info;
use std::path::Path;

use super::{rms, LevelSource};
use crate::error::{MandalaError, Result};

/// Decoded mono samples played back one frame-sized slice at a time
#[derive(Debug, Clone)]
pub struct WavLevelSource {
    samples: Vec<f32>,
    samples_per_frame: usize,
}

impl WavLevelSource {
    /// Decode a WAV file for playback at `fps` frames per second
    pub fn open(path: impl AsRef<Path>, fps: u32) -> Result<Self> {
        let path = path.as_ref();
        let wav_error = |source| MandalaError::Wav {
            path: path.display().to_string(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(wav_error)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(wav_error)?,
            hound::SampleFormat::Int => {
                let full_scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(wav_error)?
            }
        };

        let samples = downmix(&interleaved, spec.channels as usize);

        info!(
            "WAV input: {} ({} Hz, {} channel(s), {:.1}s)",
            path.display(),
            spec.sample_rate,
            spec.channels,
            samples.len() as f32 / spec.sample_rate as f32
        );

        Ok(Self::from_samples(samples, spec.sample_rate, fps))
    }

    /// Build from mono samples already in memory
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, fps: u32) -> Self {
        let samples_per_frame = (sample_rate as usize / fps.max(1) as usize).max(1);
        Self {
            samples,
            samples_per_frame,
        }
    }

    /// Number of frames covered by the file
    pub fn frame_count(&self) -> u64 {
        self.samples.len().div_ceil(self.samples_per_frame) as u64
    }

    fn frame_slice(&self, frame_index: u64) -> &[f32] {
        let start = (frame_index as usize).saturating_mul(self.samples_per_frame);
        if start >= self.samples.len() {
            return &[];
        }
        let end = (start + self.samples_per_frame).min(self.samples.len());
        &self.samples[start..end]
    }
}

impl LevelSource for WavLevelSource {
    /// Past the end of the file the level is silence
    fn level(&mut self, frame_index: u64) -> Option<f32> {
        Some(rms(self.frame_slice(frame_index)).min(1.0))
    }
}

/// Average interleaved channels into one
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_slicing() {
        // 1 kHz "file" at 10 fps: 100 samples per frame
        let mut samples = vec![0.0; 100];
        samples.extend(vec![0.5; 100]);
        samples.extend(vec![0.25; 50]);
        let mut source = WavLevelSource::from_samples(samples, 1000, 10);

        assert_eq!(source.frame_count(), 3);
        assert_eq!(source.level(0), Some(0.0));
        assert_relative_eq!(source.level(1).unwrap(), 0.5);
        assert_relative_eq!(source.level(2).unwrap(), 0.25);
        assert_eq!(source.level(3), Some(0.0));
        assert_eq!(source.level(u64::MAX), Some(0.0));
    }

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5], 2);
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn test_open_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 600,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..1200 {
            // Silence for one second, then a square wave at half scale
            let v: i16 = if i < 600 { 0 } else if i % 2 == 0 { 16384 } else { -16384 };
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let mut source = WavLevelSource::open(&path, 60).unwrap();
        assert_eq!(source.frame_count(), 120);
        assert_eq!(source.level(10), Some(0.0));
        assert_relative_eq!(source.level(90).unwrap(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = WavLevelSource::open("/nonexistent/missing.wav", 60).unwrap_err();
        assert!(matches!(err, MandalaError::Wav { .. }));
    }
}
