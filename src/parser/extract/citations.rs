use std::sync::LazyLock;

use regex::Regex;

use crate::parser::blocks::{classify_line, Block};

/// Plain lines longer than this (in chars) count as a claim worth citing.
const MIN_CLAIM_CHARS: usize = 60;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

pub fn marker(index: usize) -> String {
    format!("[{index}]")
}

/// Append a ` [n]` marker to each citable line, cycling n through
/// `1..=source_count` across the whole document.
///
/// Numbers are handed out round-robin; they do not claim that source n
/// supports the line it is attached to.
pub fn inject(markdown: &str, source_count: usize) -> String {
    if source_count == 0 {
        return markdown.to_string();
    }

    let mut counter = 0usize;
    let annotated: Vec<String> = markdown
        .split('\n')
        .map(|line| {
            if !is_citable(line) {
                return line.to_string();
            }
            counter += 1;
            let index = (counter - 1) % source_count + 1;
            let eol = if line.ends_with('\r') { "\r" } else { "" };
            format!("{} {}{eol}", line.trim_end(), marker(index))
        })
        .collect();

    tracing::trace!(annotated = counter, source_count, "injected citations");
    annotated.join("\n")
}

fn is_citable(line: &str) -> bool {
    if MARKER_RE.is_match(line) {
        return false;
    }
    match classify_line(line) {
        Block::Heading { .. } | Block::Blank => false,
        Block::Text(text) => text.chars().count() > MIN_CLAIM_CHARS,
        block => block.is_list_item(),
    }
}

/// Number of markers present in `markdown`.
pub fn count_markers(markdown: &str) -> usize {
    MARKER_RE.find_iter(markdown).count()
}
