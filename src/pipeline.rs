//! Orchestrates EQ, gain staging, and the streaming neural denoiser into
//! the single per-hop `process` call.
//!
//! The stage order and buffer reuse follow `audio_processor.cpp`'s
//! `AudioProcessor::process` (EQ → pre-gain → `noise_reduction` →
//! post-gain), generalised from that file's fixed frame/hop sizes to the
//! `frame_size`/`hop_length` pair carried in [`PipelineConfig`].

use crate::config::{PipelineConfig, SAMPLE_RATE};
use crate::dsp::biquad::{BiquadChain, EQ_BANDS};
use crate::dsp::denoiser::DenoiserSession;
use crate::dsp::spectral_repack;
use crate::dsp::stft::StftFramer;
use crate::error::PipelineError;

fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Real-time single-channel enhancement core: 10-band EQ, pre-gain,
/// streaming neural denoiser, post-gain.
#[derive(Debug)]
pub struct Pipeline {
    eq: BiquadChain,
    pre_gain: f32,
    post_gain: f32,
    framer: StftFramer,
    denoiser: DenoiserSession,
    hop_length: usize,
    eq_scratch: Vec<f32>,
    model_io: Vec<f32>,
    packed_back: Vec<f32>,
}

impl Pipeline {
    /// Builds a pipeline from `config`. Fails only on a malformed
    /// frame/hop pair or an FFT setup failure; a denoiser model that
    /// fails to load falls back to passthrough for the denoise stage
    /// while the rest of the pipeline remains active, per the
    /// `ModelLoadFailure` policy (EQ and gains stay live).
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        if config.frame_size == 0
            || config.hop_length == 0
            || config.frame_size != 2 * config.hop_length
        {
            return Err(PipelineError::InvalidConfig(format!(
                "frame_size ({}) must equal 2 * hop_length ({})",
                config.frame_size, config.hop_length
            )));
        }

        let mut eq = BiquadChain::new(SAMPLE_RATE);
        eq.set_gains(&[0.0; EQ_BANDS]);

        let framer = StftFramer::new(config.frame_size, config.hop_length);
        let freq_bins = config.frame_size / 2 + 1;

        let denoiser = match DenoiserSession::new(&config.model_path, freq_bins) {
            Ok(session) => session,
            Err(PipelineError::ModelLoadFailure(msg)) => {
                log::warn!(
                    "denoiser model at '{}' failed to load ({msg}); falling back to passthrough",
                    config.model_path
                );
                DenoiserSession::new("", freq_bins)?
            }
            Err(other) => return Err(other),
        };

        Ok(Self {
            eq,
            pre_gain: db_to_linear(config.pre_gain_db),
            post_gain: db_to_linear(config.post_gain_db),
            framer,
            denoiser,
            hop_length: config.hop_length,
            eq_scratch: vec![0.0; config.hop_length],
            model_io: vec![0.0; 2 * freq_bins],
            packed_back: vec![0.0; config.frame_size],
        })
    }

    /// Sets pre-gain in decibels, effective from the next hop.
    pub fn set_pre_gain(&mut self, db: f32) {
        self.pre_gain = db_to_linear(db);
    }

    /// Sets post-gain in decibels, effective from the next hop.
    pub fn set_post_gain(&mut self, db: f32) {
        self.post_gain = db_to_linear(db);
    }

    /// Recomputes EQ coefficients; rejects a malformed gain vector
    /// without mutating state. Filter history (x1/x2/y1/y2) is preserved.
    pub fn set_eq_gains(&mut self, gains: &[f32]) -> bool {
        self.eq.set_gains(gains)
    }

    /// Runs one hop through EQ, pre-gain, STFT-domain denoising, and
    /// post-gain. Returns `hop` unchanged if its length does not match
    /// the configured hop length (`MalformedInput`, spec §7 — absorbed
    /// silently, no error, no state mutation). Propagates
    /// `InferenceFailure` from a failed denoiser step.
    pub fn process(&mut self, hop: &[f32]) -> Result<Vec<f32>, PipelineError> {
        if hop.len() != self.hop_length {
            return Ok(hop.to_vec());
        }

        self.eq_scratch.copy_from_slice(hop);
        self.eq.process_in_place(&mut self.eq_scratch);
        for s in self.eq_scratch.iter_mut() {
            *s *= self.pre_gain;
        }

        let packed = self.framer.forward(&self.eq_scratch);
        spectral_repack::pack(packed, &mut self.model_io);
        self.denoiser.step(&mut self.model_io)?;

        spectral_repack::unpack(&self.model_io, &mut self.packed_back);
        let synthesized = self.framer.inverse(&self.packed_back);

        let mut out = synthesized.to_vec();
        for s in out.iter_mut() {
            *s *= self.post_gain;
        }
        Ok(out)
    }
}
