use serde::{Deserialize, Serialize};

/*
Every dial on the parameter surface stores a normalized value; what that value
means (its physical scale, whether it can swing negative, what unit the
editor should label it with) is metadata. Earlier revisions of this design
kept the metadata in parallel positional arrays, which silently misaligns the
moment an index shifts. Here each dial has an identity (`DialId`) and the
metadata hangs off that identity, so the flat dial block and its meaning can
never drift apart.
*/

/// Number of dials in a patch.
pub const DIAL_COUNT: usize = 50;

/// The eight oscillators. The numbering follows the tree position: `Osc1` is
/// the pipeline output, `Osc8` the root source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscId {
    Osc1,
    Osc2,
    Osc3,
    Osc4,
    Osc5,
    Osc6,
    Osc7,
    Osc8,
}

impl OscId {
    pub const ALL: [OscId; 8] = [
        OscId::Osc1,
        OscId::Osc2,
        OscId::Osc3,
        OscId::Osc4,
        OscId::Osc5,
        OscId::Osc6,
        OscId::Osc7,
        OscId::Osc8,
    ];

    /// Tree position, 0-based (`Osc1` → 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Where this oscillator's (frequency, amplitude, resolution, shape) quad
    /// starts inside the dial block. The surface lays the quads out in panel
    /// order, which is not tree order.
    fn dial_base(self) -> usize {
        match self {
            OscId::Osc1 => 16,
            OscId::Osc2 => 20,
            OscId::Osc3 => 24,
            OscId::Osc4 => 28,
            OscId::Osc5 => 0,
            OscId::Osc6 => 4,
            OscId::Osc7 => 8,
            OscId::Osc8 => 12,
        }
    }

    fn from_dial_base(base: usize) -> Option<OscId> {
        Some(match base {
            0 => OscId::Osc5,
            4 => OscId::Osc6,
            8 => OscId::Osc7,
            12 => OscId::Osc8,
            16 => OscId::Osc1,
            20 => OscId::Osc2,
            24 => OscId::Osc3,
            28 => OscId::Osc4,
            _ => return None,
        })
    }
}

/// One of the four dials in an oscillator's quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscParam {
    Frequency,
    Amplitude,
    Resolution,
    Shape,
}

impl OscParam {
    const ALL: [OscParam; 4] = [
        OscParam::Frequency,
        OscParam::Amplitude,
        OscParam::Resolution,
        OscParam::Shape,
    ];
}

/// The three cascaded filter sections, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStage {
    One,
    Two,
    Three,
}

impl FilterStage {
    pub const ALL: [FilterStage; 3] = [FilterStage::One, FilterStage::Two, FilterStage::Three];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One of the five coefficients of a biquad section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiquadCoeff {
    B1,
    B2,
    B3,
    A1,
    A2,
}

impl BiquadCoeff {
    pub const ALL: [BiquadCoeff; 5] = [
        BiquadCoeff::B1,
        BiquadCoeff::B2,
        BiquadCoeff::B3,
        BiquadCoeff::A1,
        BiquadCoeff::A2,
    ];
}

/// Identity of a dial on the parameter surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialId {
    Osc(OscId, OscParam),
    Biquad(FilterStage, BiquadCoeff),
    EnvelopeOffset,
    DcOffset,
    CrushAmount,
}

/// Whether a dial's normalized value spans [0, 1] or [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Unipolar,
    Bipolar,
}

impl Polarity {
    pub fn clamp(self, value: f32) -> f32 {
        match self {
            Polarity::Unipolar => value.clamp(0.0, 1.0),
            Polarity::Bipolar => value.clamp(-1.0, 1.0),
        }
    }
}

/// Physical interpretation of a dial's normalized value.
#[derive(Debug, Clone, Copy)]
pub struct DialSpec {
    /// Multiplier taking the normalized value to physical units.
    pub scale: f32,
    pub polarity: Polarity,
    pub unit: &'static str,
}

const FREQUENCY_SCALE: f32 = 1_800.0;
const AMPLITUDE_SCALE: f32 = 128.0;
const RESOLUTION_SCALE: f32 = 30.0;
const BIQUAD_SCALE: f32 = 6.3;

impl DialId {
    /// Position of this dial inside the flat block.
    pub fn index(self) -> usize {
        match self {
            DialId::Osc(osc, param) => osc.dial_base() + param as usize,
            DialId::Biquad(stage, coeff) => 32 + stage.index() * 5 + coeff as usize,
            DialId::EnvelopeOffset => 47,
            DialId::DcOffset => 48,
            DialId::CrushAmount => 49,
        }
    }

    pub fn from_index(index: usize) -> Option<DialId> {
        match index {
            0..=31 => {
                let osc = OscId::from_dial_base(index & !3)?;
                Some(DialId::Osc(osc, OscParam::ALL[index & 3]))
            }
            32..=46 => {
                let offset = index - 32;
                Some(DialId::Biquad(
                    FilterStage::ALL[offset / 5],
                    BiquadCoeff::ALL[offset % 5],
                ))
            }
            47 => Some(DialId::EnvelopeOffset),
            48 => Some(DialId::DcOffset),
            49 => Some(DialId::CrushAmount),
            _ => None,
        }
    }

    pub fn spec(self) -> DialSpec {
        match self {
            DialId::Osc(_, OscParam::Frequency) => DialSpec {
                scale: FREQUENCY_SCALE,
                polarity: Polarity::Bipolar,
                unit: "Hz",
            },
            DialId::Osc(_, OscParam::Amplitude) => DialSpec {
                scale: AMPLITUDE_SCALE,
                polarity: Polarity::Bipolar,
                unit: "level",
            },
            DialId::Osc(_, OscParam::Resolution) => DialSpec {
                scale: RESOLUTION_SCALE,
                polarity: Polarity::Unipolar,
                unit: "harmonics",
            },
            DialId::Osc(_, OscParam::Shape) => DialSpec {
                scale: 1.0,
                polarity: Polarity::Unipolar,
                unit: "selector",
            },
            DialId::Biquad(..) => DialSpec {
                scale: BIQUAD_SCALE,
                polarity: Polarity::Bipolar,
                unit: "coefficient",
            },
            DialId::EnvelopeOffset => DialSpec {
                scale: 1.0,
                polarity: Polarity::Unipolar,
                unit: "position",
            },
            DialId::DcOffset => DialSpec {
                scale: AMPLITUDE_SCALE,
                polarity: Polarity::Bipolar,
                unit: "level",
            },
            DialId::CrushAmount => DialSpec {
                scale: 1.0,
                polarity: Polarity::Unipolar,
                unit: "amount",
            },
        }
    }
}
