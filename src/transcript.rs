use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::parser::extract::AnswerView;
use crate::parser::sections::SectionKey;
use crate::parser::{process_answer, AnswerInput};

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    /// Whatever the backend sent alongside the answer; normalized later.
    #[serde(default)]
    pub sources: Value,
}

pub type Transcript = Vec<Message>;

pub fn load_transcript(path: &Path) -> Result<Transcript, TranscriptError> {
    let raw = fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TranscriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Content of the last user message strictly before `index`.
pub fn preceding_user_text(messages: &[Message], index: usize) -> Option<&str> {
    messages[..index.min(messages.len())]
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

/// One view per assistant message, profiled from the user turn before it.
pub fn annotate_transcript(messages: &[Message], focus: Option<SectionKey>) -> Vec<AnswerView> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.role == Role::Assistant)
        .map(|(i, m)| {
            process_answer(&AnswerInput {
                answer: m.content.clone(),
                raw_sources: m.sources.clone(),
                profile_text: preceding_user_text(messages, i).map(str::to_string),
                focus,
            })
        })
        .collect()
}
