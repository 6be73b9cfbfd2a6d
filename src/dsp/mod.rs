//! Low-level DSP primitives driven by the render pipeline.
//!
//! These components are allocation-free once constructed and carry no global
//! state: every accumulator lives in a value owned by the render call. They
//! intentionally stay focused on the signal-processing math so the engine can
//! layer routing and per-render state management on top.

/// Sample-and-hold bit-crush.
pub mod crush;
/// 466-point breakpoint envelope cursor.
pub mod envelope;
/// Cascadable biquad sections with near-zero bypass.
pub mod filter;
/// Waveform shape families and hard-threshold selection.
pub mod generator;
/// Sine and reciprocal-harmonic lookup tables.
pub mod table;

pub use generator::Shape;
