use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use circlefarm::{Canvas, PixelSet, Rgba};

fn disc_set(radius: i32) -> PixelSet {
    let mut set = PixelSet::new();
    for y in -radius..=radius {
        for x in -radius..=radius {
            if x * x + y * y <= radius * radius {
                set.add(x, y);
            }
        }
    }
    set
}

fn bench_codec(c: &mut Criterion) {
    let set = disc_set(40);
    c.bench_function("run_length_encode", |b| {
        b.iter(|| black_box(&set).to_run_length())
    });

    let mask = set.to_run_length();
    c.bench_function("run_length_expand", |b| b.iter(|| black_box(&mask).expand()));
}

fn bench_blend(c: &mut Criterion) {
    let mut glyph = Canvas::allocate(80, 80).unwrap();
    for y in 0..80 {
        for x in 0..80 {
            glyph.set(x, y, Rgba::new(223, 32, 32, 180));
        }
    }

    c.bench_function("stamp_alpha", |b| {
        b.iter_batched(
            || Canvas::allocate(256, 256).unwrap(),
            |mut canvas| {
                canvas.stamp_alpha(black_box(&glyph), 88, 88);
                canvas
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_codec, bench_blend);
criterion_main!(benches);
