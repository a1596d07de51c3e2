//! Apidup Core Library
//!
//! Similarity scoring, duplicate detection and clustering for normalized
//! API definitions.

pub mod api;
pub mod catalog;
pub mod cluster;
pub mod config;
pub mod duplicates;
pub mod embedding;
pub mod error;
pub mod format;
pub mod logging;
pub mod similarity;
pub mod text;
