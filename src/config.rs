//! Construction-time configuration for a [`crate::Pipeline`].
//!
//! This struct only carries values; persisting it to disk or a preset
//! format is a host-application concern (see spec §1's "configuration
//! persistence" external collaborator), not something this crate does.

use serde::{Deserialize, Serialize};

/// Sample rate the core is hard-wired to. Not configurable (spec Non-goals).
pub const SAMPLE_RATE: f32 = 48_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Initial pre-gain, in decibels.
    pub pre_gain_db: f32,
    /// Initial post-gain, in decibels.
    pub post_gain_db: f32,
    /// Filesystem path to the ONNX denoiser graph. Empty string activates
    /// passthrough (EQ and gain stages remain active).
    pub model_path: String,
    /// FFT length `N`. Must equal `2 * hop_length`.
    pub frame_size: usize,
    /// Samples produced per call to [`crate::Pipeline::process`].
    pub hop_length: usize,
}

impl Default for PipelineConfig {
    /// 10 ms hops at 48 kHz (`H = 480`, `N = 960`), unity gain, no model.
    fn default() -> Self {
        Self {
            pre_gain_db: 0.0,
            post_gain_db: 0.0,
            model_path: String::new(),
            frame_size: 960,
            hop_length: 480,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_passthrough_shaped() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.frame_size, 2 * cfg.hop_length);
        assert!(cfg.model_path.is_empty());
        assert_eq!(cfg.pre_gain_db, 0.0);
        assert_eq!(cfg.post_gain_db, 0.0);
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = PipelineConfig {
            pre_gain_db: 3.0,
            post_gain_db: -1.5,
            model_path: "model.onnx".into(),
            frame_size: 1024,
            hop_length: 512,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
