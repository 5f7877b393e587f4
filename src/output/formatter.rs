//! Output formatters for analysis results

use crate::config::OutputFormat;
use crate::error::{FilescopeError, Result};
use crate::processing::analyzer::AnalysisResult;
use colored::{Color, Colorize};
use serde::Serialize;

/// Trait for rendering a batch of analysis results
pub trait OutputFormatter {
    fn format_results(&self, results: &[AnalysisResult]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored headers
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter; inline payloads are left out unless asked for
pub struct JsonFormatter {
    pretty: bool,
    include_payload: bool,
}

pub struct MarkdownFormatter;

/// Parse an output format name
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Formatter for `format`
pub fn formatter_for(
    format: OutputFormat,
    use_colors: bool,
    include_payload: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true, include_payload)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_results(&self, results: &[AnalysisResult]) -> Result<String> {
        let mut output = String::new();

        for result in results {
            let title = format!("█ {} ", result.filename());
            output.push_str(&self.colorize(&title, Color::Blue));
            output.push('\n');
            output.push_str(&format!(
                "Type: {} | Size: {} bytes{}\n",
                self.colorize(result.media_type(), Color::Cyan),
                result.size_bytes(),
                if result.is_image() { " | image attached inline" } else { "" }
            ));
            output.push_str(&"─".repeat(60));
            output.push('\n');
            output.push_str(result.report());
            output.push_str("\n\n");
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    filename: &'a str,
    media_type: &'a str,
    size_bytes: usize,
    report: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_payload: Option<&'a str>,
}

impl JsonFormatter {
    pub fn new(pretty: bool, include_payload: bool) -> Self {
        Self {
            pretty,
            include_payload,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_results(&self, results: &[AnalysisResult]) -> Result<String> {
        let entries: Vec<JsonEntry> = results
            .iter()
            .map(|r| JsonEntry {
                filename: r.filename(),
                media_type: r.media_type(),
                size_bytes: r.size_bytes(),
                report: r.report(),
                inline_payload: if self.include_payload { r.inline_payload() } else { None },
            })
            .collect();

        if self.pretty {
            Ok(serde_json::to_string_pretty(&entries)?)
        } else {
            Ok(serde_json::to_string(&entries)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_results(&self, results: &[AnalysisResult]) -> Result<String> {
        if results.is_empty() {
            return Err(FilescopeError::OutputFormatting(
                "No analysis results to format".to_string(),
            ));
        }

        let mut output = String::from("# File Analysis\n\n");
        for result in results {
            output.push_str(&format!("## {}\n\n", result.filename()));
            output.push_str(&format!("- **Type:** `{}`\n", result.media_type()));
            output.push_str(&format!("- **Size:** {} bytes\n\n", result.size_bytes()));
            output.push_str(result.report());
            output.push_str("\n\n");
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::analyze;

    fn sample() -> Vec<AnalysisResult> {
        let jpeg: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xDB];
        vec![analyze(b"hello there", "greeting.txt"), analyze(&jpeg, "tiny.jpg")]
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_results(&sample()).unwrap();

        assert!(output.contains("█ greeting.txt"));
        assert!(output.contains("Type: text/plain | Size: 11 bytes"));
        assert!(output.contains("image attached inline"));
    }

    #[test]
    fn test_json_omits_payload_by_default() {
        let output = JsonFormatter::new(false, false).format_results(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["filename"], "greeting.txt");
        assert_eq!(value[1]["media_type"], "image/jpeg");
        assert!(value[1].get("inline_payload").is_none());
    }

    #[test]
    fn test_json_with_payload() {
        let output = JsonFormatter::new(true, true).format_results(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[1]["inline_payload"], "/9j/2w==");
        assert!(value[0].get("inline_payload").is_none());
    }

    #[test]
    fn test_markdown() {
        let output = MarkdownFormatter.format_results(&sample()).unwrap();
        assert!(output.starts_with("# File Analysis"));
        assert!(output.contains("## tiny.jpg"));
        assert!(MarkdownFormatter.format_results(&[]).is_err());
    }

    #[test]
    fn test_formatter_for() {
        assert_eq!(formatter_for(OutputFormat::Json, false, false).supports_format(), OutputFormat::Json);
        assert_eq!(
            formatter_for(OutputFormat::Markdown, false, false).supports_format(),
            OutputFormat::Markdown
        );
    }
}
