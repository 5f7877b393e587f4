//! Input manager: reads files from disk and feeds them to the analyzer

use crate::error::{FilescopeError, Result};
use crate::processing::analyzer::{AnalysisResult, FileAnalyzer};
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome for one path of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub outcome: Result<AnalysisResult>,
}

pub struct InputManager {
    analyzer: FileAnalyzer,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(FileAnalyzer::new())
    }
}

impl InputManager {
    pub fn new(analyzer: FileAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &FileAnalyzer {
        &self.analyzer
    }

    /// Read and analyze one file. The file name (not the full path) is used as
    /// the declared name.
    pub async fn analyze_path(&self, path: &Path) -> Result<AnalysisResult> {
        if !path.is_file() {
            return Err(FilescopeError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        info!("Analyzing {} ({} bytes)", path.display(), bytes.len());
        Ok(self.analyzer.analyze(&bytes, &filename))
    }

    /// Analyze `paths` one after another, in order. Unreadable files are
    /// recorded as failed items and the batch carries on. `on_progress` runs
    /// after each item with the number completed so far.
    pub async fn analyze_batch<F>(&self, paths: &[PathBuf], mut on_progress: F) -> Vec<BatchItem>
    where
        F: FnMut(usize, &BatchItem),
    {
        let mut items = Vec::with_capacity(paths.len());

        for (index, path) in paths.iter().enumerate() {
            let outcome = self.analyze_path(path).await;
            if let Err(e) = &outcome {
                warn!("Skipping {}: {}", path.display(), e);
            }

            let item = BatchItem {
                path: path.clone(),
                outcome,
            };
            on_progress(index + 1, &item);
            items.push(item);
        }

        items
    }
}
