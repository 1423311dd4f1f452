//! Owns the inference graph, the 18 recurrent state tensors, and the
//! per-invocation tensor binding for the neural noise-reduction stage.
//!
//! Grounded on the `vxcleaner`/`rf-ml` family's tract usage: the
//! zero-initialised state, `plan.run(tvec!(...))` call shape, and
//! truncating state copy pattern in `dsp::ml_denoise::DtlnBackendCpu`
//! and `dsp::dtln_denoiser_tflite::DtlnBackendDtflite`'s
//! `write_state_inputs`/`read_state_outputs`; the load chain
//! (`tract_onnx::onnx().model_for_path(..).into_optimized().into_runnable()`)
//! matches `rf-ml::inference::InferenceEngine::load_tract_model`
//! verbatim. The source graph here is ONNX rather than TFLite (see
//! `examples/original_source`'s `onnxruntime`-based reference), so
//! `tract-onnx` stands in for `tract_tflite`.

use crate::error::PipelineError;
use anyhow::Context;
use tract_onnx::prelude::*;

pub const NUM_STATES: usize = 18;

/// Fixed shapes of the 18 recurrent state tensors, spec §3, in canonical
/// input/output order.
pub const STATE_SHAPES: [&[usize]; NUM_STATES] = [
    &[1, 1, 2, 121],
    &[1, 24, 1, 61],
    &[1, 24, 1, 31],
    &[1, 1, 24],
    &[1, 1, 48],
    &[1, 1, 48],
    &[1, 1, 64],
    &[1, 1, 32],
    &[1, 31, 16],
    &[1, 31, 16],
    &[1, 24, 1, 31],
    &[1, 12, 1, 31],
    &[1, 12, 2, 61],
    &[1, 1, 64],
    &[1, 1, 48],
    &[1, 1, 48],
    &[1, 1, 24],
    &[1, 1, 2],
];

const EXPECTED_TENSOR_COUNT: usize = NUM_STATES + 1;

type RunnablePlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Loads and validates the ONNX graph at `model_path`, matching
/// `dtln_core::DtlnCore::new`'s `anyhow::Context`-chained construction
/// pattern. Converted to a `PipelineError` once at the `DenoiserSession::new`
/// boundary.
fn load_plan(model_path: &str) -> anyhow::Result<RunnablePlan> {
    let model = tract_onnx::onnx()
        .model_for_path(model_path)
        .with_context(|| format!("failed to parse ONNX graph at '{model_path}'"))?
        .into_optimized()
        .context("failed to optimize denoiser graph")?;

    let n_inputs = model.input_outlets().context("failed to read graph input outlets")?.len();
    let n_outputs = model.output_outlets().context("failed to read graph output outlets")?.len();
    if n_inputs != EXPECTED_TENSOR_COUNT || n_outputs != EXPECTED_TENSOR_COUNT {
        anyhow::bail!(
            "expected {EXPECTED_TENSOR_COUNT} input/output tensors, graph declares {n_inputs} in / {n_outputs} out"
        );
    }

    model.into_runnable().context("failed to plan denoiser graph for inference")
}

#[derive(Debug)]
enum Backend {
    /// No model was loaded; `step` is the identity and the pipeline skips
    /// the STFT path entirely for that hop.
    Passthrough,
    Loaded(RunnablePlan),
}

/// Inference session for the streaming denoiser.
#[derive(Debug)]
pub struct DenoiserSession {
    backend: Backend,
    freq_bins: usize,
    states: [Vec<f32>; NUM_STATES],
}

impl DenoiserSession {
    /// Opens `model_path` read-only and binds it for `freq_bins`-wide
    /// spectra. An empty path activates passthrough without touching the
    /// filesystem.
    pub fn new(model_path: &str, freq_bins: usize) -> Result<Self, PipelineError> {
        let states = std::array::from_fn(|i| vec![0.0_f32; STATE_SHAPES[i].iter().product()]);

        if model_path.is_empty() {
            log::info!("denoiser: no model path given, running in passthrough mode");
            return Ok(Self {
                backend: Backend::Passthrough,
                freq_bins,
                states,
            });
        }

        let plan = load_plan(model_path).map_err(|e| PipelineError::ModelLoadFailure(e.to_string()))?;

        log::info!("denoiser: loaded model from {model_path}");
        Ok(Self {
            backend: Backend::Loaded(plan),
            freq_bins,
            states,
        })
    }

    /// Whether this session runs a real model (false => passthrough).
    pub fn is_active(&self) -> bool {
        matches!(self.backend, Backend::Loaded(_))
    }

    /// Runs one inference step in place on `spec_io`, a flattened
    /// `(freq_bins, 1, 2)` buffer of length `2 * freq_bins`. No-op when
    /// the session is a passthrough. Surfaces runtime inference errors;
    /// on error the recurrent state is left as whatever the failed call
    /// produced (spec §7).
    pub fn step(&mut self, spec_io: &mut [f32]) -> Result<(), PipelineError> {
        debug_assert_eq!(spec_io.len(), 2 * self.freq_bins);
        let plan = match &self.backend {
            Backend::Passthrough => return Ok(()),
            Backend::Loaded(plan) => plan,
        };

        let spec_tensor = Tensor::from_shape(&[1, self.freq_bins, 1, 2], spec_io)
            .map_err(|e| PipelineError::InferenceFailure(e.to_string()))?;

        let mut inputs: TVec<TValue> = tvec!(spec_tensor.into());
        for (state, shape) in self.states.iter().zip(STATE_SHAPES.iter()) {
            let t = Tensor::from_shape(shape, state)
                .map_err(|e| PipelineError::InferenceFailure(e.to_string()))?;
            inputs.push(t.into());
        }

        let outputs = plan
            .run(inputs)
            .map_err(|e| PipelineError::InferenceFailure(e.to_string()))?;

        let out_spec = outputs[0]
            .as_slice::<f32>()
            .map_err(|e| PipelineError::InferenceFailure(e.to_string()))?;
        spec_io.copy_from_slice(out_spec);

        for i in 0..NUM_STATES {
            let out_state = outputs[i + 1]
                .as_slice::<f32>()
                .map_err(|e| PipelineError::InferenceFailure(e.to_string()))?;
            let expected = self.states[i].len();
            let actual = out_state.len();
            debug_assert_eq!(
                expected, actual,
                "state {i} shape mismatch: expected {expected}, model produced {actual}"
            );
            let n = expected.min(actual);
            self.states[i][..n].copy_from_slice(&out_state[..n]);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_session_is_identity() {
        let freq_bins = 481;
        let mut session = DenoiserSession::new("", freq_bins).unwrap();
        assert!(!session.is_active());
        let mut spec = vec![0.0; 2 * freq_bins];
        for (i, v) in spec.iter_mut().enumerate() {
            *v = i as f32 * 0.001;
        }
        let before = spec.clone();
        session.step(&mut spec).unwrap();
        assert_eq!(spec, before);
    }

    #[test]
    fn states_are_zero_initialized() {
        let freq_bins = 481;
        let session = DenoiserSession::new("", freq_bins).unwrap();
        for state in session.states.iter() {
            assert!(state.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn state_shapes_are_all_nonempty() {
        assert!(STATE_SHAPES.iter().all(|s| s.iter().product::<usize>() > 0));
    }

    #[test]
    fn missing_model_file_is_a_load_failure() {
        let err = DenoiserSession::new("/nonexistent/path/model.onnx", 481).unwrap_err();
        assert!(matches!(err, PipelineError::ModelLoadFailure(_)));
    }
}
