//! Bidirectional conversion between the packed real-FFT layout and the
//! model's `(freq_bins, 1, 2)` layout (spec §4.3).
//!
//! Pure functions, no hidden state, so the round-trip properties (spec §8,
//! properties 7 and 8) can be tested directly against arbitrary inputs.

/// Converts a packed real-spectrum (length `frame_size`) into the model's
/// flattened `(freq_bins, 1, 2)` layout (length `frame_size + 2`), placing
/// the Nyquist bin at its natural position `model[frame_size]` with an
/// explicit zero imaginary part.
pub fn pack(packed: &[f32], model: &mut [f32]) {
    let n = packed.len();
    debug_assert_eq!(model.len(), n + 2);
    let nyq = n / 2;

    model[0] = packed[0];
    model[1] = 0.0;
    model[n] = packed[1];
    model[n + 1] = 0.0;

    for k in 1..nyq {
        model[2 * k] = packed[2 * k];
        model[2 * k + 1] = packed[2 * k + 1];
    }
}

/// Inverse of [`pack`]: converts the model's `(freq_bins, 1, 2)` layout
/// (length `frame_size + 2`) back into the packed real-spectrum layout
/// (length `frame_size`), stashing the Nyquist bin back into `packed[1]`.
pub fn unpack(model: &[f32], packed: &mut [f32]) {
    let n = packed.len();
    debug_assert_eq!(model.len(), n + 2);
    let nyq = n / 2;

    packed[0] = model[0];
    packed[1] = model[n];

    for k in 1..nyq {
        packed[2 * k] = model[2 * k];
        packed[2 * k + 1] = model[2 * k + 1];
    }
}
