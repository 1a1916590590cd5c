//! Count-sketch final projection.
//!
//! Each input coordinate `i` is assigned a slot `h(i)` in `[0, d_out)` and a sign
//! `s(i)`; the sketch of `x` is `y[h(i)] += s(i) * x[i]`. For two sketches,
//! `E[<y, y'>] = <x, x'>`, which is all the encoder needs.
//!
//! Nothing is tabulated. Coordinate `i` owns words `2i` and `2i + 1` of the
//! repetition's `FinalProjection` ChaCha stream, and [`accumulate`](CountSketch::accumulate)
//! seeks straight to them. Memory stays constant however wide the natural
//! encoding is (`2^30` buckets included).

use rand::RngCore;
use rand_chacha::ChaCha8Rng;

use crate::rng::{RandomSource, Role};

/// Stream words consumed per input coordinate (slot, sign).
const WORDS_PER_COORD: u128 = 2;

#[derive(Debug, Clone)]
pub struct CountSketch {
    rng: ChaCha8Rng,
    d_out: u32,
}

impl CountSketch {
    /// Sketch for `repetition` onto `d_out` slots.
    ///
    /// `d_out` must be in `1..=u32::MAX`; the caller validates it.
    pub fn new(source: &RandomSource, repetition: usize, d_out: usize) -> Self {
        debug_assert!(d_out > 0 && u32::try_from(d_out).is_ok());
        Self {
            rng: source.rng(repetition, Role::FinalProjection),
            d_out: d_out as u32,
        }
    }

    /// Add the sketch of `values`, which sit at input coordinates
    /// `start..start + values.len()`, into `out`.
    #[inline]
    pub fn accumulate(&self, start: usize, values: &[f32], out: &mut [f32]) {
        let mut rng = self.rng.clone();
        rng.set_word_pos(start as u128 * WORDS_PER_COORD);
        for &v in values {
            let slot = self.slot(rng.next_u32());
            let sign = if rng.next_u32() & 1 == 1 { 1.0 } else { -1.0 };
            out[slot] += sign * v;
        }
    }

    pub fn output_dim(&self) -> usize {
        self.d_out as usize
    }

    /// Multiply-shift reduction of a uniform word onto `[0, d_out)`.
    #[inline]
    fn slot(&self, word: u32) -> usize {
        ((u64::from(word) * u64::from(self.d_out)) >> 32) as usize
    }
}
