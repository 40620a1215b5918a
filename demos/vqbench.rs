#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use blockvq::{
    CodebookSize, ColorMode, CorpusReport, KmeansOptions, RgbRaster, TrainingPipeline,
};
use clap::{Parser, ValueEnum};
use image::RgbImage;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum CliColorMode {
    Rgb,
    Yuv,
    Both,
}

impl CliColorMode {
    fn modes(self) -> &'static [ColorMode] {
        match self {
            CliColorMode::Rgb => &[ColorMode::Rgb],
            CliColorMode::Yuv => &[ColorMode::Yuv],
            CliColorMode::Both => &ColorMode::ALL,
        }
    }
}

impl Display for CliColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliColorMode::Rgb => "rgb",
                CliColorMode::Yuv => "yuv",
                CliColorMode::Both => "both",
            }
        )
    }
}

#[derive(Parser)]
pub struct Options {
    /// Root directory of the training corpus.
    #[arg(long)]
    train: PathBuf,

    /// Root directory of the test corpus.
    #[arg(long)]
    test: PathBuf,

    /// Subdirectories of the train and test roots to read images from.
    #[arg(long, num_args = 1.., default_values_t = ["animals".to_owned(), "faces".to_owned(), "nature".to_owned()])]
    category: Vec<String>,

    #[arg(short, long = "codebook-size", default_value_t = CodebookSize::default(), value_parser = parse_codebook_size)]
    k: CodebookSize,

    #[arg(long, default_value_t = KmeansOptions::DEFAULT_MAX_ITERATIONS)]
    max_iterations: u32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = CliColorMode::Both)]
    mode: CliColorMode,

    /// Directory to write reconstructed test images to.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,
}

fn parse_codebook_size(s: &str) -> Result<CodebookSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("png"))
}

/// Loads every decodable image under `root/<category>` for each category, cropped to a multiple of 4.
fn load_images(root: &Path, categories: &[String]) -> Vec<(String, RgbRaster)> {
    let mut images = Vec::new();
    for category in categories {
        let dir = root.join(category);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            tracing::debug!(dir = %dir.display(), "skipping unreadable category directory");
            continue;
        };

        let mut paths = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect::<Vec<_>>();

        paths.sort();

        for path in paths {
            let image = match image::open(&path) {
                Ok(image) => image.into_rgb8(),
                Err(error) => {
                    tracing::debug!(path = %path.display(), %error, "skipping undecodable image");
                    continue;
                }
            };

            let Some(raster) = RgbRaster::from_rgbimage_cropped(&image, 4) else {
                tracing::debug!(path = %path.display(), "skipping image smaller than 4x4");
                continue;
            };

            let name = path
                .file_name()
                .map(|name| format!("{category}_{}", name.to_string_lossy()))
                .unwrap_or_else(|| category.clone());

            images.push((name, raster));
        }
    }
    images
}

fn save_reconstructions(dir: &Path, mode: ColorMode, names: &[&str], report: &CorpusReport) {
    let dir = dir.join(mode.to_string().to_lowercase());
    if let Err(error) = std::fs::create_dir_all(&dir) {
        eprintln!("could not create {}: {error}", dir.display());
        return;
    }

    for (name, evaluation) in names.iter().zip(&report.evaluations) {
        let path = dir.join(Path::new(name).with_extension("png"));
        let image = RgbImage::from(evaluation.reconstructed.clone());
        if let Err(error) = image.save(&path) {
            eprintln!("could not write {}: {error}", path.display());
        }
    }
}

fn main() {
    let Options {
        train,
        test,
        category,
        k,
        max_iterations,
        seed,
        mode,
        output,
        verbose,
    } = Options::parse();

    let default_level = if verbose { "blockvq=debug,vqbench=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                eprintln!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let train_images = log!("read training images", load_images(&train, &category));
    let test_images = log!("read test images", load_images(&test, &category));
    let test_names = test_images.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();

    let options = KmeansOptions::new()
        .codebook_size(k)
        .max_iterations(max_iterations)
        .seed(seed);

    let mut summary = Vec::new();
    for (i, &mode) in mode.modes().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("=== {mode} Compression (k={k}) ===");

        let codebooks = log!(
            "training",
            TrainingPipeline::new(mode)
                .kmeans_options(options)
                .train(train_images.iter().map(|(_, image)| image))
        );

        let report = log!(
            "testing",
            match codebooks.evaluate_all(test_images.iter().map(|(_, image)| image)) {
                Ok(report) => report,
                Err(error) => {
                    eprintln!("{mode} evaluation failed: {error}");
                    continue;
                }
            }
        );

        for evaluation in &report.evaluations {
            println!(
                "{mode} MSE: {:.2}, Ratio: {:.2}:1",
                evaluation.mse, evaluation.compression_ratio
            );
        }

        if let Some(dir) = &output {
            log!("write images", save_reconstructions(dir, mode, &test_names, &report));
        }

        summary.push((mode, report));
    }

    println!("\nSummary (codebook size={k}):");
    for (mode, report) in &summary {
        match report.mean_mse().zip(report.mean_compression_ratio()) {
            Some((mse, ratio)) => {
                println!("{mode} => MSE: {mse:.2}, Compression Ratio: {ratio:.2}:1");
            }
            None => println!("{mode} => no test images"),
        }
    }
}
