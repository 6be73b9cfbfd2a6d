//! Benchmarks for the synthesis hot path.
//!
//! Run with: cargo bench
//!
//! The render loop is where the time goes: a full-length clip is ~1.45M
//! samples swept in one synchronous pass, with the whole oscillator tree,
//! filter cascade, and envelope evaluated per sample. These groups watch the
//! per-shape generator cost, the filter cascade, and the end-to-end loop.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use octofm::dsp::filter::FilterChain;
use octofm::dsp::generator::{self, Shape};
use octofm::engine::Renderer;
use octofm::patch::{
    AmMode, CombineMode, DialId, FilterStage, FmMode, OscId, OscParam, Patch,
};

const BLOCK: usize = 1_024;

fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/generator");

    for shape in [
        Shape::Sine,
        Shape::SlantSine,
        Shape::Square,
        Shape::Sawtooth,
        Shape::Triangle,
        Shape::Impulse,
    ] {
        group.bench_with_input(
            BenchmarkId::new("shape", format!("{shape:?}")),
            &shape,
            |b, &shape| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    let mut phase = 0.0f32;
                    for _ in 0..BLOCK {
                        acc += generator::sample(black_box(shape), black_box(phase), 24.0);
                        phase += 0.0627;
                    }
                    acc
                })
            },
        );
    }

    group.finish();
}

fn bench_filter_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    // All three sections engaged.
    group.bench_function("active_cascade", |b| {
        let mut chain = FilterChain::new([
            [0.2, 0.1, 0.05, -0.1, 0.02],
            [0.3, 0.0, 0.0, 0.05, 0.0],
            [0.15, 0.1, 0.0, 0.0, -0.02],
        ]);
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..BLOCK {
                acc += chain.process(black_box((i as f32 * 0.05).sin()));
            }
            acc
        })
    });

    // Near-zero coefficients short-circuit the cascade.
    group.bench_function("bypassed_cascade", |b| {
        let mut chain = FilterChain::new([[0.0; 5]; 3]);
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..BLOCK {
                acc += chain.process(black_box((i as f32 * 0.05).sin()));
            }
            acc
        })
    });

    group.finish();
}

fn busy_patch() -> Patch {
    let mut patch = Patch::new();
    patch.fill_envelope(1.0);
    for osc in OscId::ALL {
        patch.set_dial(DialId::Osc(osc, OscParam::Frequency), 0.12);
        patch.set_dial(DialId::Osc(osc, OscParam::Amplitude), 0.4);
        patch.set_dial(DialId::Osc(osc, OscParam::Resolution), 0.9);
        patch.set_dial(DialId::Osc(osc, OscParam::Shape), 0.55);
    }
    patch.set_fm_slot(1, FmMode::Frequency);
    patch.set_am_slot(4, AmMode::Amplitude);
    for slot in [2, 5, 8, 9] {
        patch.set_mul_slot(slot, CombineMode::Add);
    }
    for coeff in octofm::patch::BiquadCoeff::ALL {
        patch.set_dial(DialId::Biquad(FilterStage::One, coeff), 0.05);
    }
    patch.set_dial(DialId::CrushAmount, 0.1);
    patch
}

fn bench_full_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render");
    group.sample_size(20);

    let renderer = Renderer::default();

    let silent = Patch::new();
    group.bench_function("one_second_silent", |b| {
        b.iter(|| renderer.render(black_box(&silent), 1))
    });

    let busy = busy_patch();
    group.bench_function("one_second_busy", |b| {
        b.iter(|| renderer.render(black_box(&busy), 1))
    });

    group.finish();
}

criterion_group!(benches, bench_generators, bench_filter_chain, bench_full_render);
criterion_main!(benches);
