//! The parameter surface: one `Patch` per bank, 256 banks resident.

pub mod params;

use serde::{Deserialize, Serialize};

pub use params::{BiquadCoeff, DialId, FilterStage, OscId, OscParam, Polarity, DIAL_COUNT};

/// Breakpoints in the amplitude envelope.
pub const ENVELOPE_POINTS: usize = 466;
/// Modulation connection points in the oscillator tree.
pub const SLOT_COUNT: usize = 10;
/// Patches resident in memory.
pub const BANK_COUNT: usize = 256;

const MIN_SECTION_SECS: u8 = 1;
const MAX_SECTION_SECS: u8 = 33;

/// FM-side behavior of a modulation slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FmMode {
    #[default]
    Off,
    /// Multiply the target's frequency by the upstream sample.
    Frequency,
    /// Scale the target's shape selector by `squish(input)`.
    Shape,
    /// Scale the target's resolution by `squish(input)`.
    Resolution,
}

/// AM-side behavior of a modulation slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmMode {
    #[default]
    Off,
    /// Multiply the target's amplitude by the upstream sample.
    Amplitude,
    /// Scale the target's resolution by `squish(input)`.
    Resolution,
    /// Scale the target's shape selector by `squish(input)`.
    Shape,
}

/// Combine operator applied to the target's output after synthesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineMode {
    #[default]
    Off,
    Add,
    Subtract,
    Multiply,
}

/// One complete instrument configuration. Field invariants (dials clamped to
/// their polarity range, envelope in [0, 1], section length in [1, 33]) are
/// maintained by the setters; anything arriving from outside, deserialized
/// bank images included, goes through `sanitize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    dials: Vec<f32>,
    am_slots: [AmMode; SLOT_COUNT],
    mul_slots: [CombineMode; SLOT_COUNT],
    fm_slots: [FmMode; SLOT_COUNT],
    envelope: Vec<f32>,
    section_len: u8,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            dials: vec![0.0; DIAL_COUNT],
            am_slots: [AmMode::Off; SLOT_COUNT],
            mul_slots: [CombineMode::Off; SLOT_COUNT],
            fm_slots: [FmMode::Off; SLOT_COUNT],
            envelope: vec![0.0; ENVELOPE_POINTS],
            section_len: 3,
        }
    }
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized value of a dial.
    pub fn dial(&self, id: DialId) -> f32 {
        self.dials[id.index()]
    }

    /// Dial value taken to physical units via its declared scale.
    pub fn scaled(&self, id: DialId) -> f32 {
        self.dials[id.index()] * id.spec().scale
    }

    /// Set a dial, clamping to its declared polarity range.
    pub fn set_dial(&mut self, id: DialId, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.dials[id.index()] = id.spec().polarity.clamp(value);
    }

    /// Nudge a dial by a delta, clamping like `set_dial`. This is the editing
    /// primitive a dial-drag maps to.
    pub fn adjust_dial(&mut self, id: DialId, delta: f32) {
        self.set_dial(id, self.dials[id.index()] + delta);
    }

    /// Scaled biquad coefficients for one filter stage, in (b1, b2, b3, a1, a2)
    /// order.
    pub fn biquad_coefficients(&self, stage: FilterStage) -> [f32; 5] {
        BiquadCoeff::ALL.map(|c| self.scaled(DialId::Biquad(stage, c)))
    }

    pub fn fm_slot(&self, slot: usize) -> FmMode {
        self.fm_slots[slot]
    }

    pub fn am_slot(&self, slot: usize) -> AmMode {
        self.am_slots[slot]
    }

    pub fn mul_slot(&self, slot: usize) -> CombineMode {
        self.mul_slots[slot]
    }

    pub fn set_fm_slot(&mut self, slot: usize, mode: FmMode) {
        self.fm_slots[slot] = mode;
    }

    pub fn set_am_slot(&mut self, slot: usize, mode: AmMode) {
        self.am_slots[slot] = mode;
    }

    pub fn set_mul_slot(&mut self, slot: usize, mode: CombineMode) {
        self.mul_slots[slot] = mode;
    }

    pub fn envelope(&self) -> &[f32] {
        &self.envelope
    }

    /// Set one breakpoint, clamped to [0, 1].
    pub fn set_envelope_point(&mut self, index: usize, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.envelope[index] = value.clamp(0.0, 1.0);
    }

    /// Set every breakpoint to the same level.
    pub fn fill_envelope(&mut self, value: f32) {
        for i in 0..ENVELOPE_POINTS {
            self.set_envelope_point(i, value);
        }
    }

    pub fn section_len(&self) -> u8 {
        self.section_len
    }

    pub fn set_section_len(&mut self, seconds: u8) {
        self.section_len = seconds.clamp(MIN_SECTION_SECS, MAX_SECTION_SECS);
    }

    /// Step the section length up, wrapping from 33 back to 1.
    pub fn increment_section_len(&mut self) {
        self.section_len = if self.section_len >= MAX_SECTION_SECS {
            MIN_SECTION_SECS
        } else {
            self.section_len + 1
        };
    }

    /// Step the section length down, wrapping from 1 up to 33.
    pub fn decrement_section_len(&mut self) {
        self.section_len = if self.section_len <= MIN_SECTION_SECS {
            MAX_SECTION_SECS
        } else {
            self.section_len - 1
        };
    }

    /// Re-establish every field invariant. Deserialized images bypass the
    /// setters, so the store runs this on load.
    pub fn sanitize(&mut self) {
        self.dials.resize(DIAL_COUNT, 0.0);
        for index in 0..DIAL_COUNT {
            if let Some(id) = DialId::from_index(index) {
                let value = self.dials[index];
                self.dials[index] = if value.is_finite() {
                    id.spec().polarity.clamp(value)
                } else {
                    0.0
                };
            }
        }
        self.envelope.resize(ENVELOPE_POINTS, 0.0);
        for value in &mut self.envelope {
            *value = if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        self.section_len = self.section_len.clamp(MIN_SECTION_SECS, MAX_SECTION_SECS);
    }
}

/// All 256 resident patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchBank {
    patches: Vec<Patch>,
}

impl Default for PatchBank {
    fn default() -> Self {
        Self {
            patches: vec![Patch::default(); BANK_COUNT],
        }
    }
}

impl PatchBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patch(&self, bank: u8) -> &Patch {
        &self.patches[bank as usize]
    }

    pub fn patch_mut(&mut self, bank: u8) -> &mut Patch {
        &mut self.patches[bank as usize]
    }

    pub fn sanitize(&mut self) {
        self.patches.resize_with(BANK_COUNT, Patch::default);
        for patch in &mut self.patches {
            patch.sanitize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_patch_is_silent_with_a_three_second_section() {
        let patch = Patch::new();
        for index in 0..DIAL_COUNT {
            let id = DialId::from_index(index).unwrap();
            assert_eq!(patch.dial(id), 0.0);
        }
        assert_eq!(patch.section_len(), 3);
        assert!(patch.envelope().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn dial_mutation_clamps_to_polarity() {
        let mut patch = Patch::new();
        let freq = DialId::Osc(OscId::Osc1, OscParam::Frequency);
        let res = DialId::Osc(OscId::Osc1, OscParam::Resolution);

        patch.set_dial(freq, -2.0);
        assert_eq!(patch.dial(freq), -1.0);
        patch.set_dial(res, -2.0);
        assert_eq!(patch.dial(res), 0.0);

        patch.set_dial(freq, 0.5);
        patch.adjust_dial(freq, 0.8);
        assert_eq!(patch.dial(freq), 1.0);
    }

    #[test]
    fn scaled_values_use_the_descriptor() {
        let mut patch = Patch::new();
        patch.set_dial(DialId::Osc(OscId::Osc3, OscParam::Frequency), 0.5);
        assert_eq!(patch.scaled(DialId::Osc(OscId::Osc3, OscParam::Frequency)), 900.0);

        patch.set_dial(DialId::Biquad(FilterStage::Two, BiquadCoeff::A1), -1.0);
        assert_eq!(
            patch.biquad_coefficients(FilterStage::Two),
            [0.0, 0.0, 0.0, -6.3, 0.0]
        );
    }

    #[test]
    fn section_length_wraps_at_both_ends() {
        let mut patch = Patch::new();
        patch.set_section_len(1);
        patch.decrement_section_len();
        assert_eq!(patch.section_len(), 33);
        patch.increment_section_len();
        assert_eq!(patch.section_len(), 1);
        patch.set_section_len(0);
        assert_eq!(patch.section_len(), 1);
    }

    #[test]
    fn envelope_points_clamp_to_unit_range() {
        let mut patch = Patch::new();
        patch.set_envelope_point(10, 1.7);
        patch.set_envelope_point(11, -0.4);
        assert_eq!(patch.envelope()[10], 1.0);
        assert_eq!(patch.envelope()[11], 0.0);
    }

    #[test]
    fn sanitize_repairs_a_mangled_patch() {
        let mut patch = Patch::new();
        patch.dials[3] = 7.0;
        patch.dials[0] = f32::NAN;
        patch.envelope.truncate(10);
        patch.section_len = 0;

        patch.sanitize();

        assert_eq!(patch.dials[3], 1.0);
        assert_eq!(patch.dials[0], 0.0);
        assert_eq!(patch.envelope.len(), ENVELOPE_POINTS);
        assert_eq!(patch.section_len(), 1);
    }

    #[test]
    fn bank_holds_256_independent_patches() {
        let mut bank = PatchBank::new();
        bank.patch_mut(7).set_section_len(12);
        assert_eq!(bank.patch(7).section_len(), 12);
        assert_eq!(bank.patch(8).section_len(), 3);
        // u8 indexing makes every bank reachable and none out of range.
        let _ = bank.patch(255);
    }
}
