use std::f32::consts::{FRAC_PI_2, TAU};

use once_cell::sync::Lazy;

/// Entries in the unit-circle sine table. Power of two so the lookup index
/// can be masked instead of range-checked.
pub const SINE_TABLE_SIZE: usize = 1 << 16;

const PHASE_TO_INDEX: f32 = SINE_TABLE_SIZE as f32 / TAU;
const INDEX_TO_PHASE: f32 = TAU / SINE_TABLE_SIZE as f32;

/// Harmonic weights kept as precomputed reciprocals; beyond the table the
/// generators fall back to computing the reciprocal directly.
const RECIPROCAL_TABLE_LEN: usize = 30;

static SINE: Lazy<Vec<f32>> = Lazy::new(|| {
    (0..SINE_TABLE_SIZE)
        .map(|i| (i as f32 * INDEX_TO_PHASE).sin())
        .collect()
});

static RECIP: Lazy<[f32; RECIPROCAL_TABLE_LEN]> = Lazy::new(|| {
    let mut t = [0.0; RECIPROCAL_TABLE_LEN];
    for (i, w) in t.iter_mut().enumerate() {
        *w = 1.0 / (i + 2) as f32;
    }
    t
});

static RECIP_SQ: Lazy<[f32; RECIPROCAL_TABLE_LEN]> = Lazy::new(|| {
    let mut t = [0.0; RECIPROCAL_TABLE_LEN];
    for (i, w) in t.iter_mut().enumerate() {
        *w = 1.0 / ((i + 3) * (i + 3)) as f32;
    }
    t
});

/// Table sine. Tolerates unbounded and negative phase: the fixed-point index
/// wraps modulo the table size, so phase accumulators never need folding.
#[inline]
pub fn sin(theta: f32) -> f32 {
    let index = (theta * PHASE_TO_INDEX) as i64 as usize & (SINE_TABLE_SIZE - 1);
    SINE[index]
}

/// Table cosine via the quarter-turn identity.
#[inline]
pub fn cos(theta: f32) -> f32 {
    sin(FRAC_PI_2 - theta)
}

/// Reciprocal of `n + 2`, i.e. the weight of the `n`th harmonic term in the
/// 1/h series (sawtooth starts at h = 2).
#[inline]
pub fn recip(n: usize) -> f32 {
    if n < RECIPROCAL_TABLE_LEN {
        RECIP[n]
    } else {
        1.0 / (n + 2) as f32
    }
}

/// Reciprocal of `(n + 3)²`, the weight of the `n`th term in the 1/h² series
/// (slant-sine and triangle start at h = 3).
#[inline]
pub fn recip_sq(n: usize) -> f32 {
    if n < RECIPROCAL_TABLE_LEN {
        RECIP_SQ[n]
    } else {
        let h = (n + 3) as f32;
        1.0 / (h * h)
    }
}
