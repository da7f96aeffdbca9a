//! Text normalization shared by all decoders.
//!
//! Every decoder funnels its output through [`normalize`] so extracted text
//! is uniform regardless of source format: LF line endings, no BOM, no
//! trailing whitespace except exactly one trailing blank line. Empty output
//! stays empty; images and other non-textual terminals produce `""`, not
//! `"\n\n"`.

/// Convert CRLF and bare CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Apply the full normalization contract to decoded text.
pub fn normalize(text: &str) -> String {
    let stripped = text.trim_start_matches('\u{FEFF}');
    let unified = normalize_newlines(stripped);
    let trimmed = unified.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(trimmed.len() + 2);
    out.push_str(trimmed);
    out.push_str("\n\n");
    out
}
