//! Error kinds surfaced across the construction and setup boundary.
//!
//! Per-call shape violations inside [`crate::Pipeline::process`] are *not*
//! represented here: they are absorbed silently (input returned unchanged),
//! matching the real-time policy that an audio callback must never panic or
//! propagate an error mid-stream.

use std::fmt;

/// Failure surfaced from [`crate::Pipeline::new`] or a denoiser inference step.
#[derive(Debug)]
pub enum PipelineError {
    /// `frame_size`/`hop_length` in [`crate::PipelineConfig`] violate the
    /// `frame_size == 2 * hop_length` invariant, or either is zero.
    InvalidConfig(String),
    /// The inference session could not open or parse the model file.
    ModelLoadFailure(String),
    /// The FFT work buffers could not be sized for the requested frame.
    FftSetupFailure(String),
    /// A loaded model raised an error during `step`; recurrent state is
    /// left in whatever partial state the failed call produced.
    InferenceFailure(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidConfig(msg) => write!(f, "invalid pipeline config: {msg}"),
            PipelineError::ModelLoadFailure(msg) => write!(f, "denoiser model load failed: {msg}"),
            PipelineError::FftSetupFailure(msg) => write!(f, "FFT setup failed: {msg}"),
            PipelineError::InferenceFailure(msg) => write!(f, "denoiser inference failed: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}
