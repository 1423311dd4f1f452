//! Streaming STFT/iSTFT with a square-root Hann window and 50% overlap-add.
//!
//! The forward/inverse complex-FFT pattern (zero-imaginary analysis frame,
//! conjugate-symmetry restoration before the inverse transform, `1/N`
//! synthesis scaling matching `rustfft`'s unnormalized
//! `IFFT(FFT(x)) = N·x` convention) is carried over from
//! `vxcleaner::dsp::dtln_denoiser_tflite::DtlnDenoiserTflite::process_hop`
//! (`norm = 1.0 / FRAME_SIZE as f32`), which runs the same `rustfft`
//! cascade; this module generalises it to an arbitrary
//! `frame_size`/`hop_length` pair and exposes the FFT's native packed
//! real-spectrum layout (spec §4.3) as its forward/inverse boundary
//! instead of hiding it inside a single monolithic hop function.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Periodic (DFT-even) square-root Hann window: `i` ranges over `0..n`
/// with the implicit sample at `n` (equal to the one at `0`) omitted, so
/// `w[i]^2 + w[i+H]^2 = 1` exactly at 50% overlap instead of only
/// approximately, as the symmetric form (denominator `n - 1`) would give.
fn sqrt_hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()).sqrt())
        .collect()
}

/// Owns the analysis window, delay line, FFT plans, and overlap-add
/// accumulator for one channel of streaming STFT/iSTFT.
pub struct StftFramer {
    frame_size: usize,
    hop_length: usize,
    window: Vec<f32>,
    previous_hop: Vec<f32>,
    ola: Vec<f32>,
    fft_forward: Arc<dyn Fft<f32>>,
    fft_inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    packed_out: Vec<f32>,
    hop_out: Vec<f32>,
}

impl std::fmt::Debug for StftFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StftFramer")
            .field("frame_size", &self.frame_size)
            .field("hop_length", &self.hop_length)
            .field("window", &self.window)
            .field("previous_hop", &self.previous_hop)
            .field("ola", &self.ola)
            .field("scratch", &self.scratch)
            .field("packed_out", &self.packed_out)
            .field("hop_out", &self.hop_out)
            .finish_non_exhaustive()
    }
}

impl StftFramer {
    /// # Panics
    /// If `frame_size != 2 * hop_length`. `StftFramer` is reachable from
    /// outside this crate, so this invariant is checked in release builds
    /// too rather than left to a later out-of-bounds slice panic.
    pub fn new(frame_size: usize, hop_length: usize) -> Self {
        assert_eq!(frame_size, 2 * hop_length, "N must equal 2H");
        let mut planner = FftPlanner::<f32>::new();
        Self {
            frame_size,
            hop_length,
            window: sqrt_hann_window(frame_size),
            previous_hop: vec![0.0; hop_length],
            ola: vec![0.0; frame_size],
            fft_forward: planner.plan_fft_forward(frame_size),
            fft_inverse: planner.plan_fft_inverse(frame_size),
            scratch: vec![Complex::new(0.0, 0.0); frame_size],
            packed_out: vec![0.0; frame_size],
            hop_out: vec![0.0; hop_length],
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Windows `[previous_hop | new_hop]`, runs the forward FFT, and
    /// returns the packed real-spectrum layout (spec §4.3), length
    /// `frame_size`. `new_hop` must have length `hop_length`.
    pub fn forward(&mut self, new_hop: &[f32]) -> &[f32] {
        debug_assert_eq!(new_hop.len(), self.hop_length);
        let h = self.hop_length;
        for i in 0..h {
            self.scratch[i] = Complex::new(self.previous_hop[i] * self.window[i], 0.0);
        }
        for i in 0..h {
            self.scratch[h + i] = Complex::new(new_hop[i] * self.window[h + i], 0.0);
        }
        self.previous_hop.copy_from_slice(new_hop);

        self.fft_forward.process(&mut self.scratch);

        let nyq = self.frame_size / 2;
        self.packed_out[0] = self.scratch[0].re;
        self.packed_out[1] = self.scratch[nyq].re;
        for k in 1..nyq {
            self.packed_out[2 * k] = self.scratch[k].re;
            self.packed_out[2 * k + 1] = self.scratch[k].im;
        }
        &self.packed_out
    }

    /// Inverse-transforms a packed real spectrum (length `frame_size`),
    /// applies the synthesis window and `1/N` scale, overlap-adds into
    /// the accumulator, and returns the next hop (length `hop_length`).
    pub fn inverse(&mut self, packed: &[f32]) -> &[f32] {
        debug_assert_eq!(packed.len(), self.frame_size);
        let n = self.frame_size;
        let nyq = n / 2;

        self.scratch[0] = Complex::new(packed[0], 0.0);
        self.scratch[nyq] = Complex::new(packed[1], 0.0);
        for k in 1..nyq {
            let c = Complex::new(packed[2 * k], packed[2 * k + 1]);
            self.scratch[k] = c;
            self.scratch[n - k] = c.conj();
        }

        self.fft_inverse.process(&mut self.scratch);

        let scale = 1.0 / n as f32;
        for i in 0..n {
            let y = self.scratch[i].re * scale * self.window[i];
            self.ola[i] += y;
        }

        let h = self.hop_length;
        self.hop_out.copy_from_slice(&self.ola[..h]);
        self.ola.copy_within(h..n, 0);
        self.ola[n - h..].fill(0.0);
        &self.hop_out
    }
}
