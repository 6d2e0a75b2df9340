pub mod citations;
pub mod profile;
pub mod schemes;
pub mod sources;

use std::collections::BTreeMap;

use serde::Serialize;

use super::sections::{Section, SectionKey};
use profile::{FieldStatus, ProfileAttributes, ProfileField};
use schemes::SchemeCard;
use sources::{SourceCard, SourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedSource {
    #[serde(flatten)]
    pub card: SourceCard,
    pub kind: SourceKind,
    pub hostname: String,
}

/// Everything the rendering layer needs for one assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub sections: Vec<Section>,
    pub focus: Option<SectionKey>,
    pub annotated: String,
    pub schemes: Vec<SchemeCard>,
    pub sources: Vec<ClassifiedSource>,
    pub profile: ProfileAttributes,
    pub field_status: BTreeMap<ProfileField, FieldStatus>,
}

pub fn extract_all(
    answer: &str,
    sections: Vec<Section>,
    cards: Vec<SourceCard>,
    profile_text: Option<&str>,
    focus: Option<SectionKey>,
) -> AnswerView {
    let display = display_text(answer, &sections, focus);
    let schemes = schemes::extract(display, &cards);
    let annotated = citations::inject(display, cards.len());
    let profile = profile_text.map(profile::extract).unwrap_or_default();
    let field_status = profile::field_status(&profile);

    tracing::debug!(
        sections = sections.len(),
        schemes = schemes.len(),
        sources = cards.len(),
        focus = ?focus,
        "extracted answer view"
    );

    AnswerView {
        sections,
        focus,
        annotated,
        schemes,
        sources: cards.into_iter().map(classify_card).collect(),
        profile,
        field_status,
    }
}

fn classify_card(card: SourceCard) -> ClassifiedSource {
    ClassifiedSource {
        kind: sources::classify(&card),
        hostname: sources::hostname(&card.url),
        card,
    }
}

/// Content of the first section with the focused key, else the whole answer.
fn display_text<'a>(answer: &'a str, sections: &'a [Section], focus: Option<SectionKey>) -> &'a str {
    focus
        .and_then(|key| sections.iter().find(|s| s.key == key))
        .map_or(answer, |s| s.content.as_str())
}

// ── Tests ──
