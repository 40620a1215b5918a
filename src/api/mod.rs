//! Contains the types and functions for the high level training and testing API.

mod codebooks;
mod training_pipeline;

pub use codebooks::{Codebooks, CompressedImage, CorpusReport, Evaluation};
pub use training_pipeline::TrainingPipeline;
