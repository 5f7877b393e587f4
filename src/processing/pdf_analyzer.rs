//! PDF analysis: page count and text statistics from the leading pages

use crate::error::AnalysisError;
use crate::processing::analyzer::AnalysisLimits;
use crate::processing::stats::{group_thousands, kilobytes, preview, word_count};
use log::{debug, warn};
use lopdf::Document;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfStats {
    pub total_pages: usize,
    pub size_kb: f64,
    /// Pages whose text extraction succeeded, out of the leading pages tried.
    pub pages_processed: usize,
    /// `None` when no readable text was recovered (scanned or image-only PDFs).
    pub text: Option<PdfText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfText {
    pub characters: usize,
    pub words: usize,
    pub preview: String,
}

pub fn analyze_pdf(bytes: &[u8], limits: &AnalysisLimits) -> Result<PdfStats, AnalysisError> {
    // lopdf asserts on some malformed object graphs in debug builds
    let document = panic::catch_unwind(|| Document::load_mem(bytes))
        .map_err(|_| AnalysisError::PdfParse("malformed document structure".to_string()))??;
    let pages = document.get_pages();

    if pages.is_empty() {
        return Err(AnalysisError::PdfParse("document has no pages".to_string()));
    }

    let mut extracted = String::new();
    let mut pages_processed = 0;

    for &page_number in pages.keys().take(limits.pdf_page_limit) {
        match panic::catch_unwind(AssertUnwindSafe(|| document.extract_text(&[page_number]))) {
            Ok(Ok(page_text)) => {
                extracted.push_str(&page_text);
                extracted.push('\n');
                pages_processed += 1;
            }
            Ok(Err(e)) => warn!("Skipping PDF page {}: {}", page_number, e),
            Err(_) => warn!("Skipping PDF page {}: malformed page resources", page_number),
        }
    }

    debug!(
        "Extracted {} bytes of text from {}/{} pages",
        extracted.len(),
        pages_processed,
        pages.len()
    );

    let text = if extracted.trim().is_empty() {
        None
    } else {
        Some(PdfText {
            characters: extracted.chars().count(),
            words: word_count(&extracted),
            preview: preview(&extracted, limits.pdf_preview_chars),
        })
    };

    Ok(PdfStats {
        total_pages: pages.len(),
        size_kb: kilobytes(bytes.len()),
        pages_processed,
        text,
    })
}

impl PdfStats {
    pub fn to_report(&self) -> String {
        let mut report = String::from("📄 PDF Document Analysis\n\n");

        report.push_str("Document Structure:\n");
        report.push_str(&format!("• Total Pages: {}\n", group_thousands(self.total_pages)));
        report.push_str(&format!("• File Size: {:.1} KB\n\n", self.size_kb));

        match &self.text {
            Some(text) => {
                report.push_str("Content Analysis:\n");
                report.push_str(&format!("• Characters: {}\n", group_thousands(text.characters)));
                report.push_str(&format!("• Words: {}\n", group_thousands(text.words)));
                report.push_str(&format!("• Pages Processed: {}\n\n", self.pages_processed));
                report.push_str(&format!("Content Preview:\n```\n{}\n```", text.preview));
            }
            None => {
                report.push_str(
                    "Content Status: No readable text found (may contain images or scanned content)",
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_after_header_is_an_error() {
        let err = analyze_pdf(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog", &AnalysisLimits::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::PdfParse(_)));
    }

    #[test]
    fn test_report_without_text() {
        let stats = PdfStats {
            total_pages: 3,
            size_kb: 12.5,
            pages_processed: 3,
            text: None,
        };
        let report = stats.to_report();

        assert!(report.contains("Total Pages: 3"));
        assert!(report.contains("No readable text found"));
        assert!(!report.contains("Content Preview"));
    }

    #[test]
    fn test_report_with_text() {
        let stats = PdfStats {
            total_pages: 12,
            size_kb: 80.0,
            pages_processed: 5,
            text: Some(PdfText {
                characters: 1500,
                words: 240,
                preview: "Quarterly results...".to_string(),
            }),
        };
        let report = stats.to_report();

        assert!(report.contains("Characters: 1,500"));
        assert!(report.contains("Words: 240"));
        assert!(report.contains("Pages Processed: 5"));
        assert!(report.contains("Quarterly results..."));
    }
}
