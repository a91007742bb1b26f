//! Rolling ambient baseline: turns raw input levels into "energy above the room".
//!
//! Microphone gain and room noise vary wildly, so absolute volume is a poor
//! driver. The tracker keeps a fixed window of recent levels and reports how
//! far the smoothed level rises above a margin over their mean.

use std::collections::VecDeque;

use crate::params::BaselineConfig;

/// Evictions between exact recomputations of the running sum
const RESYNC_INTERVAL: usize = 4096;

/// Snapshot of the tracker after an update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioState {
    /// Latest raw sample (0 - 1)
    pub raw_level: f32,
    /// Exponentially smoothed level
    pub smoothed_level: f32,
    /// Rolling mean * margin
    pub ambient_baseline: f32,
    /// max(0, smoothed - baseline)
    pub excess_energy: f32,
}

/// Fixed-capacity rolling window with an incrementally maintained mean
#[derive(Debug, Clone)]
pub struct AmbientBaselineTracker {
    config: BaselineConfig,
    window: VecDeque<f32>,
    running_sum: f64,
    evictions: usize,
    state: AudioState,
}

impl AmbientBaselineTracker {
    pub fn new(config: BaselineConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid baseline config");
        let window = VecDeque::with_capacity(config.window_capacity);
        Self {
            config,
            window,
            running_sum: 0.0,
            evictions: 0,
            state: AudioState::default(),
        }
    }

    /// Feed one raw level sample
    ///
    /// Non-finite samples count as silence; levels are clamped to [0, 1].
    pub fn update(&mut self, raw_level: f32) -> AudioState {
        let level = if raw_level.is_finite() {
            raw_level.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.push(level);

        let average = self.average();
        let baseline = average * self.config.baseline_margin;

        let previous = self.state.smoothed_level;
        let smoothed = previous + (level - previous) * self.config.smoothing_factor;

        self.state = AudioState {
            raw_level: level,
            smoothed_level: smoothed,
            ambient_baseline: baseline,
            excess_energy: (smoothed - baseline).max(0.0),
        };
        self.state
    }

    fn push(&mut self, level: f32) {
        if self.window.len() == self.config.window_capacity {
            if let Some(oldest) = self.window.pop_front() {
                self.running_sum -= oldest as f64;
                self.evictions += 1;
            }
        }
        self.window.push_back(level);
        self.running_sum += level as f64;

        // Keep floating-point drift of the incremental sum bounded
        if self.evictions >= RESYNC_INTERVAL {
            self.running_sum = self.window.iter().map(|&v| v as f64).sum();
            self.evictions = 0;
        }
    }

    /// Mean over the samples currently held (0 before the first sample)
    fn average(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        (self.running_sum.max(0.0) / self.window.len() as f64) as f32
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn excess_energy(&self) -> f32 {
        self.state.excess_energy
    }

    pub fn ambient_baseline(&self) -> f32 {
        self.state.ambient_baseline
    }

    pub fn smoothed_level(&self) -> f32 {
        self.state.smoothed_level
    }

    /// Samples currently in the window (never above capacity)
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }

    pub fn capacity(&self) -> usize {
        self.config.window_capacity
    }
}

impl Default for AmbientBaselineTracker {
    fn default() -> Self {
        Self::new(BaselineConfig::default())
    }
}
