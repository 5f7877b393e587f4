//! Small numeric and string helpers shared by the analyzers

/// Size in kilobytes, as shown in reports.
pub fn kilobytes(size_bytes: usize) -> f64 {
    size_bytes as f64 / 1024.0
}

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Whitespace-separated token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines in `text`, where `\n`, `\r\n` and a lone `\r` each end a line.
/// A trailing terminator does not open an extra empty line.
pub fn line_count(text: &str) -> usize {
    let mut lines = 0;
    let mut open = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines += 1;
                open = false;
            }
            '\n' => {
                lines += 1;
                open = false;
            }
            _ => open = true,
        }
    }

    lines + usize::from(open)
}
