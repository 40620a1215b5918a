#![allow(clippy::unwrap_used, clippy::float_cmp)]

use blockvq::{
    compression_ratio, decode, encode, extract_planes, kmeans, mse, recombine_planes, subsample,
    upsample, Block, Codebook, CodebookSize, ColorMode, KmeansOptions, Plane, RgbRaster,
    TrainingPipeline, TrainingSet, VqError,
};
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

fn noisy_gradient(width: u32, height: u32, seed: u64) -> RgbRaster {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    RgbRaster::from_fn(width, height, |x, y| {
        let base = u8::try_from((x * 7 + y * 5) % 200).unwrap();
        Srgb::new(
            base + rng.gen_range(0..8),
            base / 2 + rng.gen_range(0..8),
            200 - base + rng.gen_range(0..8),
        )
    })
}

#[test]
fn manual_stages_match_pipeline() {
    let train = [noisy_gradient(32, 32, 1), noisy_gradient(16, 24, 2)];
    let test = noisy_gradient(24, 16, 3);
    let options = KmeansOptions::new().codebook_size(32.into()).max_iterations(15).seed(7);

    for mode in ColorMode::ALL {
        let mut pipeline = TrainingPipeline::new(mode);
        pipeline.kmeans_options(options);
        let codebooks = pipeline.train(&train);

        // the same steps, by hand
        let mut sets = [TrainingSet::new(), TrainingSet::new(), TrainingSet::new()];
        for image in &train {
            for (i, plane) in extract_planes(image, mode).iter().enumerate() {
                let plane = if mode.is_subsampled(i) { subsample(plane) } else { plane.clone() };
                sets[i].extend_from_plane(&plane);
            }
        }
        let manual: Vec<Codebook> = sets
            .iter()
            .enumerate()
            .map(|(i, set)| {
                let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(7 ^ i as u64);
                kmeans::train(set, 32.into(), 15, rng)
            })
            .collect();
        assert_eq!(codebooks.channels().as_slice(), manual.as_slice());

        let planes = extract_planes(&test, mode);
        let decoded: Vec<Plane> = planes
            .iter()
            .enumerate()
            .map(|(i, plane)| {
                if mode.is_subsampled(i) {
                    upsample(&decode(&encode(&subsample(plane), &manual[i]).unwrap(), &manual[i]).unwrap())
                } else {
                    decode(&encode(plane, &manual[i]).unwrap(), &manual[i]).unwrap()
                }
            })
            .collect();
        let decoded: [Plane; 3] = decoded.try_into().unwrap();
        let reconstructed = recombine_planes(&decoded, mode).unwrap();

        let evaluation = codebooks.evaluate(&test).unwrap();
        assert_eq!(evaluation.reconstructed, reconstructed);
        assert_eq!(evaluation.mse, mse(&test, &reconstructed));
        assert_eq!(evaluation.compression_ratio, compression_ratio(24, 16, mode));
    }
}

#[test]
fn larger_codebooks_fit_training_images_better() {
    let image = noisy_gradient(32, 32, 4);
    let evaluate = |k: u8| {
        let mut pipeline = TrainingPipeline::new(ColorMode::Rgb);
        pipeline.kmeans_options(KmeansOptions::new().codebook_size(k.into()).seed(11));
        pipeline.train([&image]).evaluate(&image).unwrap().mse
    };

    assert!(evaluate(64) < evaluate(1));
}

#[test]
fn codebook_is_capped_by_block_count() {
    let mut pipeline = TrainingPipeline::new(ColorMode::Rgb);
    pipeline.kmeans_options(KmeansOptions::new().codebook_size(CodebookSize::MAX).max_iterations(0));
    let codebooks = pipeline.train([&noisy_gradient(4, 4, 5)]);
    assert!(codebooks.channels().iter().all(|codebook| codebook.len() == 4));
}

#[test]
fn yuv_compresses_more_than_rgb() {
    for (w, h) in [(8, 8), (64, 32), (1024, 768)] {
        assert_eq!(compression_ratio(w, h, ColorMode::Rgb), 4.0);
        assert_eq!(compression_ratio(w, h, ColorMode::Yuv), 8.0);
    }
}

#[test]
fn empty_channel_fails_explicitly() {
    let codebook = kmeans::train(
        &TrainingSet::new(),
        CodebookSize::MAX,
        20,
        &mut Xoroshiro128PlusPlus::seed_from_u64(0),
    );
    assert!(codebook.is_empty());
    assert_eq!(encode(&Plane::filled(4, 4, 1), &codebook), Err(VqError::EmptyCodebook));

    let codebooks = TrainingPipeline::new(ColorMode::Yuv).train(&[]);
    assert_eq!(codebooks.evaluate(&noisy_gradient(8, 8, 6)), Err(VqError::EmptyCodebook));
}

#[test]
fn uniform_training_image() {
    let image = RgbRaster::from_fn(16, 16, |_, _| Srgb::new(40, 80, 160));
    let set = TrainingSet::from_plane(&extract_planes(&image, ColorMode::Rgb)[2]);
    let codebook = kmeans::train(&set, 8.into(), 1, &mut Xoroshiro128PlusPlus::seed_from_u64(3));
    assert_eq!(codebook.len(), 8);
    assert_eq!(codebook.get(0), Some(Block::splat(160)));

    let codebooks = TrainingPipeline::new(ColorMode::Rgb).train([&image]);
    assert_eq!(codebooks.evaluate(&image).unwrap().mse, 0.0);
}

#[test]
fn zero_codebook_size_trains_empty_codebooks() {
    let image = noisy_gradient(8, 8, 7);
    let mut pipeline = TrainingPipeline::new(ColorMode::Yuv);
    pipeline.kmeans_options(KmeansOptions::new().codebook_size(0.into()));
    let codebooks = pipeline.train([&image]);

    assert!(codebooks.channels().iter().all(Codebook::is_empty));
    assert_eq!(codebooks.evaluate(&image), Err(VqError::EmptyCodebook));
}
