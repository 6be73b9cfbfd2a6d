use crate::dsp::table;

/*
Waveform Generators
===================

Six shape families, all additive: a fundamental sine plus a resolution-bounded
stack of harmonic partials. `resolution` is the brightness control: it bounds
how many partials the series keeps, so a low resolution rounds every shape off
toward a plain sine.

  sine        The fundamental alone. The only shape computed with the libm
              sine rather than the lookup table, so the purest band stays
              exact.

  slant-sine  Sine plus every harmonic from 3 upward, weighted by the 1/h²
              series. Softly saw-like.

  square      Sine plus odd harmonics, 1/h-series weights. Hollow and woody.

  sawtooth    Sine plus every harmonic from 2 upward, weighted exactly 1/h.
              The brightest of the series shapes.

  triangle    Sine plus odd harmonics, 1/h²-series weights with alternating
              sign. Mellow.

  impulse     Not a smooth series: ten fixed partials with stepped weights
              (0.50 down to 0.05), each gated on by a resolution threshold.

The selector in [0, 1] splits into six equal bands with hard thresholds.
There is no crossfade between adjacent bands; the switch is abrupt and
patches rely on it, so it stays (boundary behavior is pinned by tests below).
*/

const BAND: f32 = 1.0 / 6.0;

/// One of the six waveform families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sine,
    SlantSine,
    Square,
    Sawtooth,
    Triangle,
    Impulse,
}

impl Shape {
    /// Hard-threshold band selection over the normalized selector.
    #[inline]
    pub fn from_selector(t: f32) -> Shape {
        if t <= BAND {
            Shape::Sine
        } else if t <= 2.0 * BAND {
            Shape::SlantSine
        } else if t <= 0.5 {
            Shape::Square
        } else if t <= 4.0 * BAND {
            Shape::Sawtooth
        } else if t <= 5.0 * BAND {
            Shape::Triangle
        } else {
            Shape::Impulse
        }
    }
}

/// Evaluate one sample: select the band from `selector`, then synthesize.
#[inline]
pub fn generate(selector: f32, phase: f32, resolution: f32) -> f32 {
    sample(Shape::from_selector(selector), phase, resolution)
}

/// Evaluate one sample of `shape` at `phase` with the given resolution.
#[inline]
pub fn sample(shape: Shape, phase: f32, resolution: f32) -> f32 {
    match shape {
        Shape::Sine => (phase as f64).sin() as f32,
        Shape::SlantSine => slant_sine(phase, resolution),
        Shape::Square => square(phase, resolution),
        Shape::Sawtooth => sawtooth(phase, resolution),
        Shape::Triangle => triangle(phase, resolution),
        Shape::Impulse => impulse(phase, resolution),
    }
}

pub fn slant_sine(phase: f32, resolution: f32) -> f32 {
    let mut y = table::sin(phase);
    let mut h = 3.0f32;
    let mut n = 0;
    while h < resolution {
        y += table::sin(phase * h) * table::recip_sq(n);
        h += 1.0;
        n += 1;
    }
    y
}

pub fn square(phase: f32, resolution: f32) -> f32 {
    let resolution = resolution * 2.0;
    let mut y = table::sin(phase);
    let mut h = 3.0f32;
    let mut n = 0;
    while h < resolution {
        y += table::sin(phase * h) * table::recip(n);
        h += 2.0;
        n += 1;
    }
    y
}

pub fn sawtooth(phase: f32, resolution: f32) -> f32 {
    let mut y = table::sin(phase);
    let mut h = 2.0f32;
    let mut n = 0;
    while h <= resolution {
        y += table::sin(phase * h) * table::recip(n);
        h += 1.0;
        n += 1;
    }
    y
}

pub fn triangle(phase: f32, resolution: f32) -> f32 {
    let resolution = resolution * 2.0;
    let mut y = table::sin(phase);
    let mut sign = -1.0f32;
    let mut h = 3.0f32;
    let mut n = 0;
    while h <= resolution {
        y += table::sin(phase * h) * table::recip_sq(n) * sign;
        sign = -sign;
        h += 2.0;
        n += 1;
    }
    y
}

/// Fixed ten-partial additive stack; `resolution` gates partials in rather
/// than bounding a series.
pub fn impulse(phase: f32, resolution: f32) -> f32 {
    let mut y = table::sin(phase) * 0.5;
    if resolution >= 3.0 {
        y -= table::cos(phase * 2.0) * 0.45;
    }
    if resolution >= 6.0 {
        y -= table::sin(phase * 3.0) * 0.4;
    }
    if resolution >= 9.0 {
        y += table::cos(phase * 4.0) * 0.35;
    }
    if resolution >= 12.0 {
        y += table::sin(phase * 5.0) * 0.3;
    }
    if resolution >= 16.0 {
        y -= table::cos(phase * 6.0) * 0.25;
    }
    if resolution >= 19.0 {
        y -= table::sin(phase * 7.0) * 0.2;
    }
    if resolution >= 22.0 {
        y += table::cos(phase * 8.0) * 0.15;
    }
    if resolution >= 25.0 {
        y += table::sin(phase * 9.0) * 0.1;
    }
    if resolution >= 28.0 {
        y -= table::cos(phase * 10.0) * 0.05;
    }
    y
}
