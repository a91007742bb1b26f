//! Audio level tracking and input configuration.

/// Rolling ambient baseline parameters
#[derive(Debug, Clone)]
pub struct BaselineConfig {
    /// Rolling window length (samples, one per frame)
    /// 120 samples ≈ 2 s at 60 Hz
    pub window_capacity: usize,

    /// Baseline = rolling mean * margin (dimensionless, > 1 suppresses the noise floor)
    pub baseline_margin: f32,

    /// Single-pole smoothing factor applied to the raw level each frame (0 - 1]
    pub smoothing_factor: f32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            window_capacity: 120,
            baseline_margin: 1.2,
            smoothing_factor: 0.2,
        }
    }
}

impl BaselineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_capacity == 0 {
            return Err("Baseline window must hold at least one sample".to_string());
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(format!(
                "Smoothing factor must be in (0, 1], got {}",
                self.smoothing_factor
            ));
        }
        if !(self.baseline_margin >= 0.0) {
            return Err("Baseline margin must be >= 0".to_string());
        }
        Ok(())
    }
}

/// Where raw audio levels come from
#[derive(Debug, Clone, Default)]
pub struct AudioInputConfig {
    /// Input device name (case-insensitive substring); default input device when `None`
    pub device_name: Option<String>,

    /// Read levels from a WAV file instead of a live device
    pub wav_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_config_validation() {
        assert!(BaselineConfig::default().validate().is_ok());

        let config = BaselineConfig {
            window_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BaselineConfig {
            smoothing_factor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
