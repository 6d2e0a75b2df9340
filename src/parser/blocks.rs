use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(#{1,6})\s+(\S.*)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap());
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(\S.*)$").unwrap());

/// One markdown line, classified by its leading marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Text(&'a str),
    Blank,
}

impl Block<'_> {
    /// Bullet and numbered items, the lines that read as list entries.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::Bullet(_) | Block::Numbered(_))
    }
}

pub fn classify_line(line: &str) -> Block<'_> {
    if line.trim().is_empty() {
        return Block::Blank;
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        return Block::Heading {
            level: caps[1].len() as u8,
            text: caps.get(2).map_or("", |m| m.as_str().trim()),
        };
    }

    if let Some(caps) = NUMBERED_RE.captures(line) {
        return Block::Numbered(caps.get(1).map_or("", |m| m.as_str()));
    }

    if let Some(caps) = BULLET_RE.captures(line) {
        return Block::Bullet(caps.get(1).map_or("", |m| m.as_str()));
    }

    Block::Text(line.trim())
}

pub fn classify_lines(markdown: &str) -> Vec<Block<'_>> {
    markdown.lines().map(classify_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading() {
        let block = classify_line("### Eligibility criteria");
        assert_eq!(block, Block::Heading { level: 3, text: "Eligibility criteria" });
    }

    #[test]
    fn heading_needs_space() {
        assert!(matches!(classify_line("#hashtag"), Block::Text("#hashtag")));
        assert!(matches!(classify_line("####### seven"), Block::Text(_)));
    }

    #[test]
    fn bullets() {
        for line in ["- one", "* two", "+ three", "  - nested"] {
            assert!(matches!(classify_line(line), Block::Bullet(_)), "{line}");
        }
    }

    #[test]
    fn bold_is_not_a_bullet() {
        assert!(matches!(classify_line("**Note** read carefully"), Block::Text(_)));
    }

    #[test]
    fn numbered() {
        let block = classify_line("12. **PM Kisan**");
        assert_eq!(block, Block::Numbered("**PM Kisan**"));
    }

    #[test]
    fn numbered_without_space_is_text() {
        assert!(matches!(classify_line("2.5 lakh"), Block::Text(_)));
    }

    #[test]
    fn blank_lines() {
        assert_eq!(classify_line(""), Block::Blank);
        assert_eq!(classify_line("   \t"), Block::Blank);
    }

    #[test]
    fn list_items() {
        assert!(classify_line("- a").is_list_item());
        assert!(classify_line("1. abc").is_list_item());
        assert!(!classify_line("plain").is_list_item());
    }

    #[test]
    fn answer_fixture() {
        let md = std::fs::read_to_string("tests/fixtures/scholarship_answer.md").unwrap();
        let blocks = classify_lines(&md);
        assert!(blocks.iter().any(|b| matches!(b, Block::Heading { .. })));
        assert!(blocks.iter().any(|b| matches!(b, Block::Numbered(_))));
        assert!(blocks.iter().any(|b| matches!(b, Block::Bullet(_))));
        assert_eq!(blocks.len(), md.lines().count());
    }
}
