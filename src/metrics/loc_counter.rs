//! Lines of code counting.
//!
//! Lines are classified one at a time with a single carried flag recording
//! whether the previous line left a `/* ... */` block comment open.
//!
//! - **Blank**: only whitespace
//! - **Comment**: only comment text (line comments, block comments, or lines
//!   inside an open block comment)
//! - **Code**: no comment markers
//! - **Mixed**: code and comment on the same line; counted as code
//!
//! The invariant `total == code + comment + blank` always holds.
//!
//! ## Limitations
//!
//! - Comment markers inside string literals are not detected
//!   (`s := "/* not a comment"` opens a block comment as far as this module
//!   is concerned). Fixing that needs a tokenizer, not a line scanner.
//! - Block comments do not nest; the first `*/` closes the comment.

use crate::core::LineMetrics;

const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Code,
    Comment,
    /// Code and comment on one line.
    Mixed,
}

impl LineKind {
    pub fn counts_as_code(self) -> bool {
        matches!(self, LineKind::Code | LineKind::Mixed)
    }
}

/// Classify one line, updating `in_block_comment` for the next call.
pub fn classify_line(line: &str, in_block_comment: &mut bool) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if *in_block_comment {
        return match line.find(BLOCK_CLOSE) {
            Some(close_idx) => {
                *in_block_comment = false;
                classify_after_comment(&line[close_idx + BLOCK_CLOSE.len()..], in_block_comment)
            }
            None => LineKind::Comment,
        };
    }

    classify_outside_block(line, in_block_comment)
}

fn classify_outside_block(line: &str, in_block_comment: &mut bool) -> LineKind {
    let block_start = line.find(BLOCK_OPEN);
    let line_start = line.find(LINE_COMMENT);

    match (block_start, line_start) {
        // A `//` ahead of the first `/*` turns the rest of the line into comment text.
        (Some(open_idx), Some(slash_idx)) if slash_idx < open_idx => {
            classify_line_comment(line, slash_idx)
        }
        (Some(open_idx), _) => classify_block_comment(line, open_idx, in_block_comment),
        (None, Some(slash_idx)) => classify_line_comment(line, slash_idx),
        (None, None) => LineKind::Code,
    }
}

fn classify_block_comment(line: &str, open_idx: usize, in_block_comment: &mut bool) -> LineKind {
    let has_code_before = !line[..open_idx].trim().is_empty();

    // The closer must start after the opener: `/*/` does not close.
    let search_from = open_idx + BLOCK_OPEN.len();
    match line[search_from..].find(BLOCK_CLOSE) {
        Some(rel_close) => {
            let rest = &line[search_from + rel_close + BLOCK_CLOSE.len()..];
            let after = classify_after_comment(rest, in_block_comment);
            if has_code_before {
                LineKind::Mixed
            } else {
                after
            }
        }
        None => {
            *in_block_comment = true;
            if has_code_before {
                LineKind::Mixed
            } else {
                LineKind::Comment
            }
        }
    }
}

/// Classify the text following a closed block comment.
///
/// Whatever follows is scanned with the normal rules, so a second comment on
/// the same line keeps the line a comment line while real code makes it mixed.
fn classify_after_comment(rest: &str, in_block_comment: &mut bool) -> LineKind {
    if rest.trim().is_empty() {
        return LineKind::Comment;
    }
    match classify_outside_block(rest, in_block_comment) {
        LineKind::Blank | LineKind::Comment => LineKind::Comment,
        LineKind::Code | LineKind::Mixed => LineKind::Mixed,
    }
}

fn classify_line_comment(line: &str, slash_idx: usize) -> LineKind {
    if line[..slash_idx].trim().is_empty() {
        LineKind::Comment
    } else {
        LineKind::Mixed
    }
}

/// Sum line classifications over `lines`, starting outside any comment.
pub fn count_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> LineMetrics {
    let mut in_block_comment = false;
    let mut metrics = LineMetrics::default();

    for line in lines {
        metrics.total += 1;
        match classify_line(line, &mut in_block_comment) {
            LineKind::Blank => metrics.blank += 1,
            LineKind::Comment => metrics.comment += 1,
            LineKind::Code | LineKind::Mixed => metrics.code += 1,
        }
    }

    metrics
}

/// Count the 1-based inclusive line range `start_line..=end_line` of `source`.
///
/// Ranges past the end of the source are clamped; an inverted or zero-based
/// range yields empty metrics.
pub fn count_range(source: &str, start_line: usize, end_line: usize) -> LineMetrics {
    if start_line == 0 || start_line > end_line {
        return LineMetrics::default();
    }
    count_lines(
        source
            .lines()
            .skip(start_line - 1)
            .take(end_line - start_line + 1),
    )
}

/// Counts lines of whole files or function bodies.
///
/// # Examples
///
/// ```rust
/// use gomap::metrics::loc_counter::LocCounter;
///
/// let counter = LocCounter::default();
/// let count = counter.count_content("// Package main\npackage main\n\nfunc main() {}\n");
/// assert_eq!(count.code, 2);
/// assert_eq!(count.comment, 1);
/// assert_eq!(count.blank, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocCounter;

impl LocCounter {
    pub fn new() -> Self {
        Self
    }

    pub fn count_content(&self, content: &str) -> LineMetrics {
        count_lines(content.lines())
    }

    pub fn count_range(&self, content: &str, start_line: usize, end_line: usize) -> LineMetrics {
        count_range(content, start_line, end_line)
    }
}
