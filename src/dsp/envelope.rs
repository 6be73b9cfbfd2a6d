use crate::patch::ENVELOPE_POINTS;

/*
Breakpoint Envelope
===================

The envelope is a 466-point amplitude curve stretched over the whole clip.
The renderer maps clip time onto curve position with an integer step size:

    samples_per_segment = total_samples / 466

and walks one segment at a time, linearly interpolating between the current
breakpoint and the next. The cursor can start mid-curve (the envelope-offset
dial skips the first `offset × 466` segments) and once it reaches the final
breakpoint it saturates there for the rest of the render.

Only the cursor lives here. The breakpoint data itself belongs to the patch,
which hands it in by reference at every sample; the cursor is pure position
bookkeeping and is rebuilt from the dial state at the start of every render.
*/

/// Playback position inside the 466-point curve.
pub struct EnvelopeCursor {
    segment: usize,
    step: u32,
    samples_per_segment: u32,
    inv_samples_per_segment: f32,
}

impl EnvelopeCursor {
    /// Build a cursor for a clip of `total_samples`, starting at the segment
    /// selected by the normalized `offset`.
    pub fn new(total_samples: usize, offset: f32) -> Self {
        let samples_per_segment = (total_samples / ENVELOPE_POINTS).max(1) as u32;
        let segment = ((offset * ENVELOPE_POINTS as f32) as usize).min(ENVELOPE_POINTS - 1);
        Self {
            segment,
            step: 0,
            samples_per_segment,
            inv_samples_per_segment: 1.0 / samples_per_segment as f32,
        }
    }

    /// Interpolated envelope level at the current position.
    #[inline]
    pub fn level(&self, envelope: &[f32]) -> f32 {
        let a = envelope[self.segment];
        let b = envelope[(self.segment + 1).min(ENVELOPE_POINTS - 1)];
        let t = self.step as f32 * self.inv_samples_per_segment;
        (b - a) * t + a
    }

    /// Move one sample forward, advancing to the next segment when this one
    /// is exhausted. The final segment never advances.
    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
        if self.step > self.samples_per_segment {
            self.step = 0;
            if self.segment < ENVELOPE_POINTS - 1 {
                self.segment += 1;
            }
        }
    }

    pub fn segment(&self) -> usize {
        self.segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_envelope() -> Vec<f32> {
        let mut env = vec![0.0; ENVELOPE_POINTS];
        env[1] = 1.0;
        env
    }

    #[test]
    fn first_segment_midpoint_interpolates_to_half() {
        // 466 segments of 94 samples each (1 s at 44.1 kHz).
        let mut cursor = EnvelopeCursor::new(44_100, 0.0);
        let env = ramp_envelope();
        for _ in 0..47 {
            cursor.advance();
        }
        assert!((cursor.level(&env) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn segment_boundaries_hit_breakpoints_exactly() {
        let mut cursor = EnvelopeCursor::new(4_660, 0.0);
        let env = ramp_envelope();
        assert_eq!(cursor.level(&env), 0.0);
        // A segment spans samples_per_segment + 1 steps before rolling over.
        for _ in 0..10 {
            cursor.advance();
        }
        assert_eq!(cursor.level(&env), 1.0);
        cursor.advance();
        assert_eq!(cursor.segment(), 1);
        assert_eq!(cursor.level(&env), 1.0);
    }

    #[test]
    fn offset_dial_skips_into_the_curve() {
        let cursor = EnvelopeCursor::new(44_100, 0.5);
        assert_eq!(cursor.segment(), 233);
        // Full offset clamps onto the final breakpoint instead of past it.
        let cursor = EnvelopeCursor::new(44_100, 1.0);
        assert_eq!(cursor.segment(), ENVELOPE_POINTS - 1);
    }

    #[test]
    fn cursor_saturates_on_the_final_segment() {
        let mut cursor = EnvelopeCursor::new(4_660, 0.999);
        let mut env = vec![0.0; ENVELOPE_POINTS];
        env[ENVELOPE_POINTS - 1] = 0.75;
        for _ in 0..100_000 {
            cursor.advance();
        }
        assert_eq!(cursor.segment(), ENVELOPE_POINTS - 1);
        // Both lerp endpoints clamp to the last breakpoint.
        assert_eq!(cursor.level(&env), 0.75);
    }
}
