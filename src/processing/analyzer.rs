//! Analysis dispatcher: sniff the type, route to an analyzer, package the result

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::input::file_detector::{detect_kind, MediaKind};
use crate::processing::{image_analyzer, pdf_analyzer, text_analyzer};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, warn};
use std::io::Read;

/// Bounds applied by the analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisLimits {
    /// Only the first N pages of a PDF are text-extracted.
    pub pdf_page_limit: usize,
    pub pdf_preview_chars: usize,
    pub text_preview_chars: usize,
    /// Color enumeration gives up beyond this many distinct colors.
    pub color_cap: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            pdf_page_limit: 5,
            pdf_preview_chars: 600,
            text_preview_chars: 500,
            color_cap: 256 * 256 * 256,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisLimits {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            pdf_page_limit: config.pdf_page_limit,
            pdf_preview_chars: config.pdf_preview_chars,
            text_preview_chars: config.text_preview_chars,
            color_cap: config.color_cap,
        }
    }
}

/// Analysis of one uploaded file. Built once by the dispatcher, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    filename: String,
    media_type: String,
    size_bytes: usize,
    report: String,
    inline_payload: Option<String>,
}

impl AnalysisResult {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    /// Base64 of the original bytes; only set for analyzable image types.
    pub fn inline_payload(&self) -> Option<&str> {
        self.inline_payload.as_deref()
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_media_type(&self.media_type)
    }

    pub fn is_image(&self) -> bool {
        self.inline_payload.is_some()
    }

    /// `data:` URL for the inline payload, as sent to vision models.
    pub fn data_url(&self) -> Option<String> {
        self.inline_payload
            .as_ref()
            .map(|payload| format!("data:{};base64,{}", self.media_type, payload))
    }
}

/// Stateless dispatcher over the image, PDF and text analyzers.
#[derive(Debug, Clone, Default)]
pub struct FileAnalyzer {
    limits: AnalysisLimits,
}

impl FileAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: AnalysisLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &AnalysisLimits {
        &self.limits
    }

    /// Analyze a complete file. Never fails: unsupported types and analyzer
    /// errors are reported in the result's `report`.
    pub fn analyze(&self, bytes: &[u8], filename: &str) -> AnalysisResult {
        let detection = detect_kind(bytes);
        debug!(
            "Routing {} ({}, {} bytes) to {} analyzer",
            filename,
            detection.media_type,
            bytes.len(),
            detection.kind
        );

        let (report, inline_payload) = match detection.kind {
            MediaKind::Image => (
                self.run(filename, || {
                    image_analyzer::analyze_image(bytes, &self.limits).map(|s| s.to_report())
                }),
                Some(BASE64.encode(bytes)),
            ),
            MediaKind::Pdf => (
                self.run(filename, || {
                    pdf_analyzer::analyze_pdf(bytes, &self.limits).map(|s| s.to_report())
                }),
                None,
            ),
            MediaKind::Text => (
                text_analyzer::analyze_text(bytes, &self.limits).to_report(),
                None,
            ),
            MediaKind::Unsupported => (
                format!("Unsupported file type: {}", detection.media_type),
                None,
            ),
        };

        AnalysisResult {
            filename: filename.to_string(),
            media_type: detection.media_type,
            size_bytes: bytes.len(),
            report,
            inline_payload,
        }
    }

    /// Read `reader` to the end, then analyze. Only the read itself can fail.
    pub fn analyze_reader<R: Read>(&self, mut reader: R, filename: &str) -> Result<AnalysisResult> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.analyze(&bytes, filename))
    }

    fn run<F>(&self, filename: &str, analyzer: F) -> String
    where
        F: FnOnce() -> std::result::Result<String, AnalysisError>,
    {
        match analyzer() {
            Ok(report) => report,
            Err(e) => {
                warn!("Analysis of {} failed: {}", filename, e);
                format!("Error processing file: {}", e)
            }
        }
    }
}

/// Analyze with the default limits.
pub fn analyze(bytes: &[u8], filename: &str) -> AnalysisResult {
    FileAnalyzer::new().analyze(bytes, filename)
}
