//! Benchmarks for the CPU frame pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use ember::integrate::advance_all;
use ember::render::apply_grain;
use ember::spawn::make_rng;
use ember::{FieldConfig, FrameLoop, ParticleField, PixelCanvas, Renderer};

fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");

    for count in [80u32, 400, 2000] {
        group.bench_with_input(BenchmarkId::new("advance_all", count), &count, |b, &count| {
            let config = FieldConfig::default().with_particle_count(count);
            let mut field = ParticleField::new(1280, 720, config, Some(1));
            let bounds = field.bounds();
            let pointer = Some(Vec2::new(640.0, 360.0));
            let mut t = 0.0f32;
            b.iter(|| {
                let (particles, rng, config) = field.split_mut();
                advance_all(particles, t, pointer, bounds, config, rng);
                t += 1.0 / 60.0;
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(30);

    for count in [80u32, 200] {
        group.bench_with_input(BenchmarkId::new("particles_and_links", count), &count, |b, &count| {
            let config = FieldConfig::default().with_particle_count(count).with_grain(false);
            let field = ParticleField::new(1280, 720, config, Some(2));
            let mut renderer = Renderer::new();
            let mut canvas = PixelCanvas::new(1280, 720).unwrap();
            let mut rng = make_rng(Some(3));
            b.iter(|| {
                renderer.render(
                    &mut canvas,
                    black_box(field.particles()),
                    field.config(),
                    16.0,
                    &mut rng,
                )
            })
        });
    }

    group.bench_function("grain_1280x720", |b| {
        let mut pixels = vec![10u8; 1280 * 720 * 4];
        let mut rng = make_rng(Some(4));
        b.iter(|| apply_grain(black_box(&mut pixels), 8.0, &mut rng))
    });

    group.finish();
}

fn bench_full_frame(c: &mut Criterion) {
    c.bench_function("frame_loop_tick", |b| {
        let mut frame_loop = FrameLoop::new(1280, 720, FieldConfig::default(), Some(5));
        let mut canvas = PixelCanvas::new(1280, 720).unwrap();
        let mut timestamp = 0.0;
        b.iter(|| {
            frame_loop.tick(&mut canvas, timestamp);
            timestamp += 1000.0 / 60.0;
        })
    });
}

criterion_group!(benches, bench_integrate, bench_render, bench_full_frame);
criterion_main!(benches);
