//! Content analysis: per-type analyzers and the dispatcher that routes to them

pub mod analyzer;
pub mod image_analyzer;
pub mod pdf_analyzer;
pub mod stats;
pub mod text_analyzer;
