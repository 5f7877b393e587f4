//! Prompt text sent to the chat backend

use crate::processing::analyzer::AnalysisResult;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. You can analyze files and have \
conversations with users. When files are provided, incorporate their analysis into your \
responses. Be helpful, accurate, and engaging.";

/// Plain-text block describing attached files, appended to the user's message.
/// Empty when there are no attachments.
pub fn render_file_context(attachments: &[AnalysisResult]) -> String {
    if attachments.is_empty() {
        return String::new();
    }

    let mut context = String::from("\n\nFile Analysis Context:\n");
    for result in attachments {
        context.push_str(&format!("\nFile: {}\n", result.filename()));
        context.push_str(&format!("Type: {}\n", result.media_type()));
        context.push_str(&format!("Analysis: {}\n", result.report()));
    }
    context
}

/// User message with the file context appended.
pub fn render_user_text(user_message: &str, attachments: &[AnalysisResult]) -> String {
    format!("{}{}", user_message, render_file_context(attachments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::analyze;

    #[test]
    fn test_no_attachments() {
        assert_eq!(render_file_context(&[]), "");
        assert_eq!(render_user_text("hello", &[]), "hello");
    }

    #[test]
    fn test_context_lists_each_file() {
        let attachments = vec![
            analyze(b"first file", "a.txt"),
            analyze(b"second file", "b.txt"),
        ];
        let text = render_user_text("Compare these", &attachments);

        assert!(text.starts_with("Compare these\n\nFile Analysis Context:\n"));
        assert!(text.contains("File: a.txt\nType: text/plain\n"));
        assert!(text.contains("File: b.txt"));
        assert_eq!(text.matches("Analysis: ").count(), 2);
    }
}
