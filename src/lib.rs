//! # Hashtag Sentiment
#![forbid(unsafe_code)]

/// Text normalization
pub mod text;

/// Feature encoding
pub mod features;

/// Models
pub mod models;

/// Pretrained artifacts
pub mod artifacts;

/// Pipelines
pub mod pipelines;

/// Text sources
pub mod sources;

/// HTTP serving
pub mod serving;

/// Reports over classified text
pub mod dashboard;

/// Application settings
pub mod config;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
