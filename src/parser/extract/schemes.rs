use serde::Serialize;

use super::sources::SourceCard;
use crate::parser::blocks::{classify_line, Block};

pub const MAX_SCHEMES: usize = 6;
const MIN_NAME_CHARS: usize = 6;

pub const BENEFIT_PLACEHOLDER: &str = "See scheme details";
pub const DEADLINE_PLACEHOLDER: &str = "Check official portal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeCard {
    pub name: String,
    pub benefit: String,
    pub deadline: String,
    pub effort: Effort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Numbered list entries that look like scheme names, paired with sources by position.
pub fn extract(markdown: &str, sources: &[SourceCard]) -> Vec<SchemeCard> {
    let mut schemes = Vec::new();

    for line in markdown.lines() {
        if schemes.len() >= MAX_SCHEMES {
            break;
        }
        let Block::Numbered(text) = classify_line(line) else {
            continue;
        };
        let Some(name) = scheme_name(text) else {
            continue;
        };

        let source_url = sources
            .get(schemes.len())
            .or_else(|| sources.first())
            .map(|s| s.url.clone());

        schemes.push(SchemeCard {
            name,
            benefit: BENEFIT_PLACEHOLDER.to_string(),
            deadline: DEADLINE_PLACEHOLDER.to_string(),
            effort: Effort::default(),
            source_url,
        });
    }

    schemes
}

fn scheme_name(item: &str) -> Option<String> {
    // Bold markers are formatting, never part of the name.
    let name = item.replace("**", "");
    let name = name.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return None;
    }
    Some(name.to_string())
}
