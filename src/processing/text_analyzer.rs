//! Plain text analysis: encoding detection, lossy decoding and content statistics

use crate::processing::analyzer::AnalysisLimits;
use crate::processing::stats::{group_thousands, kilobytes, line_count, preview, word_count};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub encoding: String,
    pub size_kb: f64,
    pub characters: usize,
    pub words: usize,
    /// Never below 1, so the per-line average is always defined.
    pub lines: usize,
    pub avg_words_per_line: f64,
    pub preview: String,
}

/// Pick the encoding for `bytes`. Valid UTF-8 stays UTF-8; anything else goes
/// through the detector, and a low-confidence guess falls back to UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let (encoding, confident) = detector.guess_assess(None, true);

    if confident {
        encoding
    } else {
        debug!("Low-confidence encoding guess {}, using UTF-8", encoding.name());
        UTF_8
    }
}

/// Decode `bytes` and compute content statistics. Undecodable sequences are
/// replaced rather than rejected, so this never fails.
pub fn analyze_text(bytes: &[u8], limits: &AnalysisLimits) -> TextStats {
    let encoding = detect_encoding(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Lossy decode as {}: malformed sequences replaced", encoding.name());
    }

    let characters = text.chars().count();
    let words = word_count(&text);
    let lines = line_count(&text).max(1);

    TextStats {
        encoding: encoding.name().to_string(),
        size_kb: kilobytes(bytes.len()),
        characters,
        words,
        lines,
        avg_words_per_line: words as f64 / lines as f64,
        preview: preview(&text, limits.text_preview_chars),
    }
}

impl TextStats {
    pub fn to_report(&self) -> String {
        let mut report = String::from("📝 Text Document Analysis\n\n");

        report.push_str("File Properties:\n");
        report.push_str(&format!("• Encoding: {}\n", self.encoding));
        report.push_str(&format!("• File Size: {:.1} KB\n", self.size_kb));
        report.push_str(&format!(
            "• Text Length: {} characters\n\n",
            group_thousands(self.characters)
        ));

        report.push_str("Content Statistics:\n");
        report.push_str(&format!("• Words: {}\n", group_thousands(self.words)));
        report.push_str(&format!("• Lines: {}\n", group_thousands(self.lines)));
        report.push_str(&format!(
            "• Average words per line: {:.1}\n\n",
            self.avg_words_per_line
        ));

        report.push_str(&format!("Content Preview:\n```\n{}\n```", self.preview));
        report
    }
}
