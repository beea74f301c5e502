/// The inference pipeline
pub mod inference;

/// Pipeline inputs and outputs
pub mod item;

pub use inference::InferencePipeline;
pub use item::{PredictionResult, RawText};

/// Pipeline Error
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A text in the batch is not valid UTF-8
    #[error("text {index} is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidText {
        /// Position of the text in the batch
        index: usize,
        /// Length of its valid UTF-8 prefix
        valid_up_to: usize,
    },
}
