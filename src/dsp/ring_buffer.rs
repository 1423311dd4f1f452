//! Fixed-capacity circular sample buffer.
//!
//! A small utility with a minimal role in the steady-state `process` path
//! (the pipeline's own delay line and overlap-add accumulator are plain
//! reused `Vec<f32>`s managed directly by [`crate::dsp::StftFramer`]).
//! `RingBuffer` is the non-destructive sliding-window buffer a host would
//! reach for when batching arbitrary-length audio callbacks into the
//! fixed-size hops the pipeline expects, grounded on the `RingBuffer`
//! class of the original JNI implementation this crate's contract was
//! distilled from: `write` appends, `read` peeks the most recently
//! written `n` samples without consuming them, `clear` resets to silence.

/// Circular buffer of `f32` samples with a fixed capacity set at
/// construction. Never reallocates after `new`.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    buf: Vec<f32>,
    write_pos: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Appends `data` to the buffer, overwriting the oldest samples once
    /// full. No-ops if `data` is longer than the buffer's capacity.
    pub fn write(&mut self, data: &[f32]) {
        let cap = self.buf.len();
        if data.len() > cap {
            return;
        }
        let end = self.write_pos + data.len();
        if end <= cap {
            self.buf[self.write_pos..end].copy_from_slice(data);
        } else {
            let first = cap - self.write_pos;
            self.buf[self.write_pos..].copy_from_slice(&data[..first]);
            self.buf[..data.len() - first].copy_from_slice(&data[first..]);
        }
        self.write_pos = end % cap;
    }

    /// Fills `dest` with the most recently written `dest.len()` samples,
    /// oldest first, without consuming them. No-ops (leaving `dest`
    /// untouched) if `dest` is longer than the buffer's capacity.
    pub fn read(&self, dest: &mut [f32]) {
        let cap = self.buf.len();
        if dest.len() > cap {
            return;
        }
        let start = (self.write_pos + cap - dest.len()) % cap;
        let end = start + dest.len();
        if end <= cap {
            dest.copy_from_slice(&self.buf[start..end]);
        } else {
            let first = cap - start;
            let (dest_first, dest_rest) = dest.split_at_mut(first);
            dest_first.copy_from_slice(&self.buf[start..]);
            dest_rest.copy_from_slice(&self.buf[..dest_rest.len()]);
        }
    }

    /// Zeroes the buffer contents and resets the write cursor.
    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.write_pos = 0;
    }
}
