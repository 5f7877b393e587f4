//! Input processing module
//! Handles file type detection and reading uploads from disk

pub mod file_detector;
pub mod manager;
