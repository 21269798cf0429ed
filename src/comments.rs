/*!
 * Whole-line comment detection
 *
 * A textual heuristic applied identically to every file type. It does
 * not know which markers a given language actually uses, so a Python
 * line starting with `%` or a SQL line starting with `#` are treated
 * the same way. Markers appearing after code on the same line never
 * make the line a comment.
 */

/// Line-comment markers, checked in order against the trimmed line
pub const LINE_COMMENT_MARKERS: [&str; 5] = ["//", "#", "--", ";", "%"];

/// Whether `line` consists of nothing but a comment.
pub fn is_line_comment(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Single-line block comment
    if trimmed.starts_with("/*") && trimmed.ends_with("*/") {
        return true;
    }

    LINE_COMMENT_MARKERS
        .iter()
        .any(|marker| trimmed.starts_with(marker))
}
