//! filescope library: file type sniffing and per-type analysis of uploads

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AnalysisError, FilescopeError, Result};
pub use input::file_detector::{detect, MediaKind};
pub use processing::analyzer::{analyze, AnalysisLimits, AnalysisResult, FileAnalyzer};
