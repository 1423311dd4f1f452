//! Signal-processing building blocks for the enhancement core.
//!
//! - [`ring_buffer`] - fixed-capacity non-destructive sliding-window buffer
//! - [`biquad`] - 10-band peaking EQ, direct-form-I cascade
//! - [`stft`] - streaming STFT/iSTFT with 50% overlap-add
//! - [`spectral_repack`] - packed-real-FFT <-> model spectral layout conversion
//! - [`denoiser`] - recurrent-state neural denoiser inference session

pub mod biquad;
pub mod denoiser;
pub mod ring_buffer;
pub mod spectral_repack;
pub mod stft;

pub use biquad::BiquadChain;
pub use denoiser::DenoiserSession;
pub use ring_buffer::RingBuffer;
pub use stft::StftFramer;
