/// HTTP client for the prediction server
pub mod client;

/// Scoring against labelled text
pub mod evaluation;

/// Text rendering
pub mod render;

/// Exploratory statistics
pub mod report;

pub use client::{ClientError, PredictClient};
pub use evaluation::Evaluation;
pub use render::{render, render_evaluation, RenderError};
pub use report::{SentimentReport, Summary};
