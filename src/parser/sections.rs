use std::fmt;

use serde::Serialize;

use super::blocks::{classify_line, Block};

const DEFAULT_TITLE: &str = "Summary";

/// Topic bucket a heading-delimited block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Summary,
    Eligibility,
    Documents,
    Apply,
    Other,
}

/// Heading keywords, checked top to bottom against the lowercased heading text.
const HEADING_RULES: &[(&[&str], SectionKey)] = &[
    (&["eligib"], SectionKey::Eligibility),
    (&["document"], SectionKey::Documents),
    (&["apply", "process"], SectionKey::Apply),
    (&["summary", "overview"], SectionKey::Summary),
];

impl SectionKey {
    pub fn from_heading(heading: &str) -> Self {
        let lower = heading.to_lowercase();
        HEADING_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, key)| *key)
            .unwrap_or(SectionKey::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Eligibility => "eligibility",
            SectionKey::Documents => "documents",
            SectionKey::Apply => "apply",
            SectionKey::Other => "other",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub key: SectionKey,
    pub title: String,
    pub content: String,
}

/// Split a markdown answer into titled sections at each heading line.
///
/// Text before the first heading lands in an implicit "Summary" section.
/// Blocks that are empty after trimming are dropped. A document without
/// headings (or whose blocks are all empty) comes back as one `summary`
/// section holding the untrimmed input, so the result is never empty.
pub fn segment_sections(markdown: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current_lines: Vec<&str> = Vec::new();
    let mut current_key = SectionKey::Summary;
    let mut current_title = DEFAULT_TITLE.to_string();
    let mut saw_heading = false;

    for line in markdown.lines() {
        if let Block::Heading { level, text } = classify_line(line) {
            tracing::trace!(level, heading = text, "section heading");
            saw_heading = true;
            close_section(
                &mut sections,
                current_key,
                std::mem::take(&mut current_title),
                &current_lines,
            );
            current_lines.clear();
            current_key = SectionKey::from_heading(text);
            current_title = text.to_string();
            continue;
        }
        current_lines.push(line);
    }
    if !saw_heading {
        return vec![whole_document(markdown)];
    }
    close_section(&mut sections, current_key, current_title, &current_lines);

    if sections.is_empty() {
        return vec![whole_document(markdown)];
    }

    tracing::trace!(count = sections.len(), "segmented answer");
    sections
}

fn close_section(sections: &mut Vec<Section>, key: SectionKey, title: String, lines: &[&str]) {
    let content = lines.join("\n");
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    sections.push(Section {
        key,
        title,
        content: content.to_string(),
    });
}

fn whole_document(markdown: &str) -> Section {
    Section {
        key: SectionKey::Summary,
        title: DEFAULT_TITLE.to_string(),
        content: markdown.to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn section_keys(md: &str) -> Vec<SectionKey> {
        segment_sections(md).iter().map(|s| s.key).collect()
    }

    #[test]
    fn scholarship_sections() {
        let md = std::fs::read_to_string("tests/fixtures/scholarship_answer.md").unwrap();
        let sections = segment_sections(&md);
        assert_eq!(
            sections.iter().map(|s| s.key).collect::<Vec<_>>(),
            vec![
                SectionKey::Summary,
                SectionKey::Summary,
                SectionKey::Eligibility,
                SectionKey::Documents,
                SectionKey::Apply,
            ]
        );
        assert_eq!(sections[0].title, "Summary");
        assert_eq!(sections[0].content, "Here is what I found for a student in Bihar.");
        assert_eq!(sections[3].title, "Documents Required");
        assert!(sections[3].content.starts_with("- Aadhaar card"));
    }

    #[test]
    fn no_headings_returns_whole_input() {
        let md = "  Just a plain answer.\nWith two lines.\n";
        let sections = segment_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].key, SectionKey::Summary);
        assert_eq!(sections[0].title, "Summary");
        assert_eq!(sections[0].content, md);
    }

    #[test]
    fn empty_input_still_has_a_section() {
        let sections = segment_sections("");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "");
    }

    #[test]
    fn only_empty_blocks_fall_back_to_whole_document() {
        let md = "## Eligibility\n\n## Documents\n";
        let sections = segment_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].key, SectionKey::Summary);
        assert_eq!(sections[0].content, md);
    }

    #[test]
    fn empty_blocks_are_dropped() {
        let md = "## Overview\n\n## Eligibility\n- resident";
        let sections = segment_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].key, SectionKey::Eligibility);
        assert_eq!(sections[0].content, "- resident");
    }

    #[test]
    fn heading_precedence() {
        assert_eq!(SectionKey::from_heading("Eligibility documents"), SectionKey::Eligibility);
        assert_eq!(SectionKey::from_heading("Documents to apply"), SectionKey::Documents);
        assert_eq!(SectionKey::from_heading("Application process"), SectionKey::Apply);
        assert_eq!(SectionKey::from_heading("How to APPLY"), SectionKey::Apply);
        assert_eq!(SectionKey::from_heading("Quick Overview"), SectionKey::Summary);
        assert_eq!(SectionKey::from_heading("Benefits"), SectionKey::Other);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            section_keys("# Summary\na\n###### Eligibility\nb"),
            vec![SectionKey::Summary, SectionKey::Eligibility]
        );
    }

    #[test]
    fn content_is_verbatim_between_headings() {
        let md = "intro\n## Benefits\n  first\n\n  second  \n## Documents\nx";
        let sections = segment_sections(md);
        assert_eq!(sections[1].title, "Benefits");
        assert_eq!(sections[1].content, "first\n\n  second");
    }

    #[test]
    fn deterministic() {
        let md = std::fs::read_to_string("tests/fixtures/scholarship_answer.md").unwrap();
        assert_eq!(segment_sections(&md), segment_sections(&md));
    }
}
