pub mod blocks;
pub mod extract;
pub mod sections;

use serde_json::Value;

use extract::AnswerView;
use sections::SectionKey;

/// One assistant answer plus what came with it.
#[derive(Debug, Clone, Default)]
pub struct AnswerInput {
    pub answer: String,
    pub raw_sources: Value,
    /// The user message that preceded the answer, if any.
    pub profile_text: Option<String>,
    pub focus: Option<SectionKey>,
}

/// Pipeline: raw sources → cards, markdown → sections → schemes, citations and profile.
pub fn process_answer(input: &AnswerInput) -> AnswerView {
    let cards = extract::sources::normalize(&input.raw_sources);
    let sections = sections::segment_sections(&input.answer);
    extract::extract_all(
        &input.answer,
        sections,
        cards,
        input.profile_text.as_deref(),
        input.focus,
    )
}
