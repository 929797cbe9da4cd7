//! Frame time for the camera rig
//!
//! The host hands over one raw delta per rendered frame. Photo mode freezes the
//! host's time scale, so the rig needs the unscaled delta alongside the scaled one.

use serde::{Deserialize, Serialize};

/// Configuration for frame time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many game seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep reported by the host (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to keep a long hitch from flinging the camera
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

/// Frame time tracking
#[derive(Debug, Clone)]
pub struct FrameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since startup in seconds (scaled)
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
        }
    }
}

impl FrameTime {
    /// Create a new frame time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Build a single-frame time value, mostly useful for driving the rig directly
    pub fn from_delta(delta: f32) -> Self {
        let mut time = Self::default();
        time.update(delta);
        time
    }

    /// Update with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;
        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Fixed timestep as reported by the host
    pub fn fixed_delta_time(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time() {
        let mut time = FrameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.set_time_scale(0.0);
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
        assert!((time.unscaled_delta_time - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_negative_scale_is_clamped() {
        let mut time = FrameTime::default();
        time.set_time_scale(-2.0);
        time.update(0.1);
        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.total_time, 0.0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let time = FrameTime::from_delta(3.0);
        assert_eq!(time.unscaled_delta_time, time.config.max_delta_time);
    }
}
