#[path = "../util/util.rs"]
mod util;

use util::{bench_images, to_training_sets};

use std::time::Duration;

use blockvq::{kmeans, CodebookSize, ColorMode, TrainingSet};
use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

const MAX_ITERATIONS: u32 = 20;

fn bench(
    c: &mut Criterion,
    group: &str,
    sets: &[(String, [TrainingSet; 3])],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(CodebookSize, &[TrainingSet; 3])),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(10)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (k, secs) in [(CodebookSize::MAX, 8), (64.into(), 4), (16.into(), 2)] {
        group.measurement_time(Duration::from_secs(secs));
        for (path, sets) in sets {
            group.bench_with_input(BenchmarkId::new(k.to_string(), path), &(k, sets), &mut f);
        }
    }
}

fn train_channel(c: &mut Criterion, group: &str, mode: ColorMode, channel: usize) {
    let sets = to_training_sets(bench_images(), mode);
    bench(c, group, &sets, |b, &(k, sets)| {
        b.iter(|| {
            let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
            kmeans::train(&sets[channel], k, MAX_ITERATIONS, rng)
        })
    })
}

fn kmeans_rgb_channel(c: &mut Criterion) {
    train_channel(c, "kmeans_rgb_channel", ColorMode::Rgb, 0)
}

fn kmeans_yuv_chroma(c: &mut Criterion) {
    train_channel(c, "kmeans_yuv_chroma", ColorMode::Yuv, 1)
}

criterion_group!(benches, kmeans_rgb_channel, kmeans_yuv_chroma);
criterion_main!(benches);
