#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use blockvq::{ColorMode, RgbRaster, TrainingPipeline, TrainingSet};
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbRaster)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    RgbRaster::from_rgbimage_cropped(&image.into_rgb8(), 4).unwrap(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbRaster)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

pub const BENCH_DIR: &str = "img/bench";

pub fn root_dir() -> PathBuf {
    // assume current exe path is something like: target/build/deps/current_exe
    let exe = std::env::current_exe().unwrap();
    exe.parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap()
        .to_path_buf()
}

/// Smooth gradients with a little noise, roughly the block statistics of a photo.
pub fn synthetic_image(width: u32, height: u32, seed: u64) -> RgbRaster {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let (dx, dy) = (rng.gen_range(1..4), rng.gen_range(1..4));
    RgbRaster::from_fn(width, height, |x, y| {
        let base = ((x * dx + y * dy) % 224) as u8;
        Srgb::new(
            base + rng.gen_range(0..32),
            (224 - base) / 2 + rng.gen_range(0..32),
            base / 3 + rng.gen_range(0..32),
        )
    })
}

pub fn synthetic_images() -> Vec<(String, RgbRaster)> {
    [(256, 256), (512, 384), (640, 480)]
        .into_iter()
        .enumerate()
        .map(|(i, (w, h))| (format!("synthetic_{w}x{h}"), synthetic_image(w, h, i as u64)))
        .collect()
}

static BENCH_IMAGES: OnceLock<Vec<(String, RgbRaster)>> = OnceLock::new();

/// The images in `img/bench` if that directory exists, otherwise a fixed synthetic corpus.
pub fn bench_images() -> &'static [(String, RgbRaster)] {
    BENCH_IMAGES.get_or_init(|| {
        let dir = root_dir().join(BENCH_DIR);
        if dir.is_dir() {
            load_image_dir(dir)
        } else {
            synthetic_images()
        }
    })
}

pub fn to_training_sets(
    images: &[(String, RgbRaster)],
    mode: ColorMode,
) -> Vec<(String, [TrainingSet; 3])> {
    let pipeline = TrainingPipeline::new(mode);
    images
        .iter()
        .map(|(name, image)| (name.clone(), pipeline.training_sets([image])))
        .collect()
}
