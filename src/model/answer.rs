//! Normalized answers collected over a journey.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Choice, StepId};

/// A single normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    Text(String),
    /// A radio or select option value.
    Choice(String),
    Date(Date),
    Flag(bool),
    File(FileMetadata),
}

impl Answer {
    /// Display form used when prefilling or summarizing.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) | Self::Choice(s) => s.clone(),
            Self::Date(d) => d.strftime("%d/%m/%Y").to_string(),
            Self::Flag(b) => if *b { "yes" } else { "no" }.to_string(),
            Self::File(f) => format!("{} ({} bytes)", f.filename, f.size_bytes),
        }
    }
}

/// What the journey remembers about an uploaded file.
///
/// The bytes live with the file store; `reference` is the store's handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub filename: String,
    pub size_bytes: u64,
    pub reference: Option<String>,
}

/// The answers submitted on one step, keyed by field name.
pub type StepAnswers = BTreeMap<String, Answer>;

/// Answers for every step the user has submitted.
///
/// Field names are unique across the journey, so field lookups do not need
/// the owning step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStore {
    steps: BTreeMap<StepId, StepAnswers>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything recorded for `step`.
    ///
    /// A step submitted with only blank optional fields is still recorded,
    /// with no fields.
    pub fn replace_step(&mut self, step: StepId, answers: StepAnswers) {
        self.steps.insert(step, answers);
    }

    /// Forget a step entirely. Returns whether anything was removed.
    pub fn clear_step(&mut self, step: StepId) -> bool {
        self.steps.remove(&step).is_some()
    }

    pub fn step(&self, step: StepId) -> Option<&StepAnswers> {
        self.steps.get(&step)
    }

    pub fn has_answered(&self, step: StepId) -> bool {
        self.steps.contains_key(&step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    // ── Field lookups ──

    pub fn field(&self, name: &str) -> Option<&Answer> {
        self.steps.values().find_map(|answers| answers.get(name))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name)? {
            Answer::Text(s) | Answer::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn choice<C: Choice>(&self, name: &str) -> Option<C> {
        match self.field(name)? {
            Answer::Choice(value) => C::parse(value),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<Date> {
        match self.field(name)? {
            Answer::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Unchecked and absent checkboxes both read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Answer::Flag(true)))
    }

    pub fn file(&self, name: &str) -> Option<&FileMetadata> {
        match self.field(name)? {
            Answer::File(f) => Some(f),
            _ => None,
        }
    }
}
