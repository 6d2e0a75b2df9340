use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const MAX_SOURCES: usize = 8;

const URL_KEYS: &[&str] = &["url", "link"];
const TITLE_KEYS: &[&str] = &["title", "name", "source"];
const SNIPPET_KEYS: &[&str] = &["snippet", "description", "summary"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCard {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    #[serde(rename = "Gov portal")]
    GovPortal,
    #[serde(rename = "Guideline PDF")]
    GuidelinePdf,
    #[serde(rename = "State dept")]
    StateDept,
    #[serde(rename = "Reference")]
    Reference,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::GovPortal => "Gov portal",
            SourceKind::GuidelinePdf => "Guideline PDF",
            SourceKind::StateDept => "State dept",
            SourceKind::Reference => "Reference",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ── Normalization ──

/// Turn the loosely-typed source list from the backend into at most
/// [`MAX_SOURCES`] cards, deduplicated on `(title, url)`.
///
/// A repeated key keeps the slot of its first occurrence but takes the
/// fields of the latest one. Anything that is not an array yields nothing.
pub fn normalize(raw: &Value) -> Vec<SourceCard> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    let mut slots: HashMap<(String, String), usize> = HashMap::new();
    let mut cards: Vec<SourceCard> = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let Some(card) = to_card(item, i + 1) else {
            tracing::trace!(index = i, "dropping unusable source entry");
            continue;
        };
        let key = (card.title.clone(), card.url.clone());
        match slots.get(&key) {
            Some(&slot) => cards[slot] = card,
            None => {
                slots.insert(key, cards.len());
                cards.push(card);
            }
        }
    }

    cards.truncate(MAX_SOURCES);
    cards
}

fn to_card(item: &Value, position: usize) -> Option<SourceCard> {
    match item {
        Value::String(s) => {
            let url = s.trim();
            if url.is_empty() {
                return None;
            }
            Some(SourceCard {
                title: default_title(position),
                url: url.to_string(),
                snippet: None,
            })
        }
        Value::Object(_) => {
            let url = first_field(item, URL_KEYS)?;
            Some(SourceCard {
                title: first_field(item, TITLE_KEYS).unwrap_or_else(|| default_title(position)),
                url,
                snippet: first_field(item, SNIPPET_KEYS),
            })
        }
        _ => None,
    }
}

fn default_title(position: usize) -> String {
    format!("Source {position}")
}

fn first_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find_map(coerce_text)
}

fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

// ── Classification ──

/// Lowercased text the classification rules look at.
struct SourceFacts {
    text: String,
    host: String,
}

impl SourceFacts {
    fn of(source: &SourceCard) -> Self {
        let text = format!(
            "{} {} {}",
            source.title,
            source.snippet.as_deref().unwrap_or(""),
            source.url
        )
        .to_lowercase();
        Self {
            text,
            host: hostname(&source.url),
        }
    }

    fn is_official_host(&self) -> bool {
        self.host.contains("gov.in") || self.host.contains("nic.in")
    }
}

fn is_guideline(f: &SourceFacts) -> bool {
    f.text.contains(".pdf") || f.text.contains("guideline")
}

fn is_state_department(f: &SourceFacts) -> bool {
    f.is_official_host() && (f.text.contains("state") || f.text.contains("department"))
}

fn is_gov_portal(f: &SourceFacts) -> bool {
    f.is_official_host()
}

/// Checked in order; the first predicate that holds decides the kind.
const CLASSIFY_RULES: &[(fn(&SourceFacts) -> bool, SourceKind)] = &[
    (is_guideline, SourceKind::GuidelinePdf),
    (is_state_department, SourceKind::StateDept),
    (is_gov_portal, SourceKind::GovPortal),
];

pub fn classify(source: &SourceCard) -> SourceKind {
    let facts = SourceFacts::of(source);
    CLASSIFY_RULES
        .iter()
        .find(|(applies, _)| applies(&facts))
        .map(|(_, kind)| *kind)
        .unwrap_or(SourceKind::Reference)
}

/// Lowercased host without a leading `www.`; the lowercased input when it does not parse.
pub fn hostname(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let host = host.to_lowercase();
                host.strip_prefix("www.").unwrap_or(&host).to_string()
            }
            None => url.to_lowercase(),
        },
        Err(_) => url.to_lowercase(),
    }
}
