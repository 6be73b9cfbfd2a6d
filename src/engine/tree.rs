use std::f32::consts::TAU;

use crate::dsp::generator;
use crate::patch::{AmMode, CombineMode, DialId, FmMode, OscId, OscParam, Patch};

/*
Modulation Tree
===============

The eight oscillators form a fixed binary-combination tree, evaluated
bottom-up once per output sample:

    O8 (root source)
    O7 = f(O8)      O4 = f(O8)
    O3 = f(O7, O4)  O6 = f(O7)
    O2 = f(O6, O3)  O5 = f(O6)
    O1 = f(O5, O2)  → pipeline output

Each edge is a numbered modulation slot carrying three independent selectors:

    fm       applied to the target's parameters BEFORE synthesis
             (frequency multiply, or shape/resolution squish-scaling)
    am       also pre-synthesis (amplitude multiply, or shape/resolution)
    combine  applied to the target's output AFTER synthesis (add/sub/mul)

All three can be active on the same edge at once. `squish(x) = |tanh x|`
bounds the pre-synthesis scale factors so a hot upstream signal folds into
[0, 1] instead of blowing up the parameter.

The topology is compile-time data: slot ids and edges live in a const table,
and oscillator state is a struct-of-arrays indexed by tree position. Nothing
here dispatches dynamically.
*/

/// Saturating nonlinearity bounding modulation scale factors.
#[inline]
fn squish(x: f32) -> f32 {
    x.tanh().abs()
}

/// Scaled base parameters of one oscillator, loaded from its dial quad.
#[derive(Debug, Clone, Copy, Default)]
struct OscParams {
    freq: f32,
    amp: f32,
    res: f32,
    shape: f32,
}

/// A resolved modulation edge: which oscillator feeds it and the three
/// selector modes of its slot.
#[derive(Debug, Clone, Copy)]
struct InputRoute {
    source: usize,
    fm: FmMode,
    am: AmMode,
    combine: CombineMode,
}

/// Fixed wiring: for every oscillator (index 0 = O1 … 7 = O8), up to two
/// upstream inputs as (source index, slot id).
const WIRING: [[Option<(usize, usize)>; 2]; 8] = [
    [Some((4, 9)), Some((1, 8))], // O1 ← O5 (slot 9), O2 (slot 8)
    [Some((5, 6)), Some((2, 5))], // O2 ← O6 (slot 6), O3 (slot 5)
    [Some((6, 3)), Some((3, 2))], // O3 ← O7 (slot 3), O4 (slot 2)
    [Some((7, 0)), None],         // O4 ← O8 (slot 0)
    [Some((5, 7)), None],         // O5 ← O6 (slot 7)
    [Some((6, 4)), None],         // O6 ← O7 (slot 4)
    [Some((7, 1)), None],         // O7 ← O8 (slot 1)
    [None, None],                 // O8
];

/// Bottom-up evaluation order; every oscillator's inputs are computed before
/// it is. The last entry is the pipeline output.
const EVAL_ORDER: [usize; 8] = [7, 6, 3, 2, 5, 1, 4, 0];

/// Per-render tree state: base parameters and routing resolved from the
/// patch once, plus the eight phase accumulators.
pub struct OscillatorTree {
    params: [OscParams; 8],
    routes: [[Option<InputRoute>; 2]; 8],
    phases: [f32; 8],
    inv_sample_rate: f32,
}

impl OscillatorTree {
    pub fn new(patch: &Patch, sample_rate: f32) -> Self {
        let mut params = [OscParams::default(); 8];
        for osc in OscId::ALL {
            params[osc.index()] = OscParams {
                freq: patch.scaled(DialId::Osc(osc, OscParam::Frequency)),
                amp: patch.scaled(DialId::Osc(osc, OscParam::Amplitude)),
                res: patch.scaled(DialId::Osc(osc, OscParam::Resolution)),
                shape: patch.scaled(DialId::Osc(osc, OscParam::Shape)),
            };
        }

        let mut routes = [[None; 2]; 8];
        for (target, inputs) in WIRING.iter().enumerate() {
            for (lane, wired) in inputs.iter().enumerate() {
                if let Some((source, slot)) = *wired {
                    routes[target][lane] = Some(InputRoute {
                        source,
                        fm: patch.fm_slot(slot),
                        am: patch.am_slot(slot),
                        combine: patch.mul_slot(slot),
                    });
                }
            }
        }

        Self {
            params,
            routes,
            phases: [0.0; 8],
            inv_sample_rate: 1.0 / sample_rate,
        }
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; 8];
    }

    /// Evaluate the whole tree for one output sample and return O1.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut outputs = [0.0f32; 8];
        for &osc in &EVAL_ORDER {
            let sample = self.step_oscillator(osc, &outputs);
            outputs[osc] = sample;
        }
        outputs[0]
    }

    fn step_oscillator(&mut self, osc: usize, outputs: &[f32; 8]) -> f32 {
        let OscParams {
            mut freq,
            mut amp,
            mut res,
            mut shape,
        } = self.params[osc];

        // Pre-synthesis passes: FM over both inputs, then AM over both.
        for route in self.routes[osc].iter().flatten() {
            let input = outputs[route.source];
            match route.fm {
                FmMode::Off => {}
                FmMode::Frequency => freq *= input,
                FmMode::Shape => shape *= squish(input),
                FmMode::Resolution => res *= squish(input),
            }
        }
        for route in self.routes[osc].iter().flatten() {
            let input = outputs[route.source];
            match route.am {
                AmMode::Off => {}
                AmMode::Amplitude => amp *= input,
                AmMode::Resolution => res *= squish(input),
                AmMode::Shape => shape *= squish(input),
            }
        }

        let mut out = generator::generate(shape, self.phases[osc], res) * amp;

        // Post-synthesis combine pass.
        for route in self.routes[osc].iter().flatten() {
            let input = outputs[route.source];
            match route.combine {
                CombineMode::Off => {}
                CombineMode::Add => out += input,
                CombineMode::Subtract => out -= input,
                CombineMode::Multiply => out *= input,
            }
        }

        // The phase step uses the post-FM frequency.
        self.phases[osc] += (freq * TAU) * self.inv_sample_rate;

        out
    }
}
