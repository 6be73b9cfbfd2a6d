//! The render pipeline: per-render state, the sample loop, and the clip it
//! produces.
//!
//! Rendering is offline and synchronous. One call renders the whole clip
//! before anything plays: the pipeline resets every accumulator it owns,
//! sweeps the sample loop to completion, and hands back an immutable `Clip`.
//! The patch is never mutated, so a given (patch, duration) pair always
//! renders byte-identical output.

/// Fixed-topology modulation tree.
pub mod tree;

use tracing::debug;

use crate::dsp::crush::SampleHold;
use crate::dsp::envelope::EnvelopeCursor;
use crate::dsp::filter::FilterChain;
use crate::patch::{DialId, FilterStage, Patch, ENVELOPE_POINTS};
use crate::{MAX_CLIP_SAMPLES, MAX_CLIP_SECONDS, SAMPLE_RATE};

use self::tree::OscillatorTree;

/// Longest sample-and-hold period, in samples.
const CRUSH_MAX_SAMPLES: u32 = 33;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub sample_rate: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// Renders patches into clips. Stateless between calls: all mutable render
/// state lives in a `RenderState` value built fresh for each render, so
/// renders are isolated from one another by construction.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `seconds` of the patch. The duration is clamped to the clip
    /// capacity; out-of-range requests shorten rather than fail.
    pub fn render(&self, patch: &Patch, seconds: u32) -> Clip {
        let seconds = seconds.clamp(1, MAX_CLIP_SECONDS);
        let total = (self.config.sample_rate as usize * seconds as usize).min(MAX_CLIP_SAMPLES);
        debug!(seconds, total, "rendering clip");

        let mut state = RenderState::new(patch, self.config.sample_rate, total);
        let mut samples = Vec::with_capacity(total);
        for _ in 0..total {
            samples.push(state.next_sample(patch));
        }

        Clip {
            samples,
            sample_rate: self.config.sample_rate,
        }
    }

    /// Render the patch at its own section length.
    pub fn render_patch(&self, patch: &Patch) -> Clip {
        self.render(patch, patch.section_len() as u32)
    }
}

/// Everything mutable during one render: oscillator phases, filter history,
/// envelope cursor, crush hold. Built from the patch at the start of every
/// render and discarded at the end, so nothing leaks across calls.
struct RenderState {
    tree: OscillatorTree,
    filters: FilterChain,
    cursor: EnvelopeCursor,
    crush: SampleHold,
    dc_offset: f32,
}

impl RenderState {
    fn new(patch: &Patch, sample_rate: u32, total_samples: usize) -> Self {
        let crush_len =
            (patch.scaled(DialId::CrushAmount) * CRUSH_MAX_SAMPLES as f32) as u32;
        Self {
            tree: OscillatorTree::new(patch, sample_rate as f32),
            filters: FilterChain::new(FilterStage::ALL.map(|s| patch.biquad_coefficients(s))),
            cursor: EnvelopeCursor::new(total_samples, patch.dial(DialId::EnvelopeOffset)),
            crush: SampleHold::new(crush_len),
            dc_offset: patch.scaled(DialId::DcOffset),
        }
    }

    #[inline]
    fn next_sample(&mut self, patch: &Patch) -> i8 {
        quantize(self.next_value(patch))
    }

    /// One trip through the pipeline. While the crush effect is holding, the
    /// tree still runs (phases keep moving) but the filter, envelope, and
    /// cursor are left untouched and the held value is returned as-is.
    #[inline]
    fn next_value(&mut self, patch: &Patch) -> f32 {
        let raw = self.tree.next_sample();
        if let Some(held) = self.crush.gate() {
            return held;
        }
        let mut value = self.filters.process(raw);
        value *= self.cursor.level(patch.envelope());
        value -= self.dc_offset;
        self.crush.store(value);
        self.cursor.advance();
        value
    }
}

/// Narrow the final float to signed 8-bit PCM: truncate toward zero, keep the
/// low byte on overflow. Wrapping instead of clamping reproduces the
/// established output bit-for-bit; see DESIGN.md.
#[inline]
pub fn quantize(value: f32) -> i8 {
    (value as i32) as i8
}

/// A finished render: mono signed 8-bit PCM plus the overlay data the editor
/// draws on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    samples: Vec<i8>,
    sample_rate: u32,
}

impl Clip {
    pub fn samples(&self) -> &[i8] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Scope overlay: one halved sample per envelope segment, picked by an
    /// aliased stride across the clip.
    pub fn scope_points(&self) -> Vec<i8> {
        let stride = self.samples.len() as f32 / ENVELOPE_POINTS as f32;
        let last = self.samples.len().saturating_sub(1);
        (0..ENVELOPE_POINTS)
            .map(|i| {
                let index = ((i as f32 * stride) as usize).min(last);
                self.samples[index] / 2
            })
            .collect()
    }
}
