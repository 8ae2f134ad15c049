//! Per-step validation: raw form input in, normalized answers or ordered
//! field errors out.
//!
//! Validation is pure. The only outside fact it needs is today's date,
//! which the caller passes in.

mod countries;
mod date;
mod forms;
mod rules;

use std::collections::BTreeMap;
use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::{Answer, FileMetadata, StepAnswers};

pub use countries::COUNTRIES;
pub use date::{DateBound, DateRules, RawDate};
pub use forms::form_for;
pub use rules::{Rule, UploadPolicy};

// ── Raw input ──

/// A single raw field value as submitted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Date(RawDate),
    File(UploadedFile),
}

/// A file the host received but has not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub size_bytes: u64,
    /// Set by the host once the file store has accepted the bytes.
    pub reference: Option<String>,
}

/// Raw submission for one step, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    values: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.insert(field, RawValue::Text(value.into()));
        self
    }

    pub fn date(mut self, field: &str, day: &str, month: &str, year: &str) -> Self {
        self.insert(field, RawValue::Date(RawDate::new(day, month, year)));
        self
    }

    pub fn file(mut self, field: &str, file: UploadedFile) -> Self {
        self.insert(field, RawValue::File(file));
        self
    }

    pub fn insert(&mut self, field: &str, value: RawValue) {
        self.values.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.values.get(field)
    }

    /// Trimmed text for `field`; blank counts as absent.
    pub fn text_value(&self, field: &str) -> Option<&str> {
        match self.values.get(field)? {
            RawValue::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Checkbox semantics: any non-blank value other than an explicit "off".
    pub fn is_checked(&self, field: &str) -> bool {
        self.text_value(field).is_some_and(|v| {
            !matches!(
                v.to_ascii_lowercase().as_str(),
                "false" | "off" | "no" | "n" | "0"
            )
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

// ── Results ──

/// A validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field errors in form field order, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn number_of_errors(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    fn push(&mut self, field: &str, message: String) {
        self.0.push(FieldError {
            field: field.to_string(),
            message,
        });
    }
}

/// The outcome of validating one step's submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(StepAnswers),
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn number_of_errors(&self) -> usize {
        match self {
            Self::Valid(_) => 0,
            Self::Invalid(errors) => errors.number_of_errors(),
        }
    }
}

// ── Forms ──

/// How a field's raw value is read and normalized.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Checkbox,
    /// A radio or select whose value must pass `accepts`.
    Choice {
        accepts: fn(&str) -> bool,
        invalid: &'static str,
    },
    Date(DateRules),
    File(UploadPolicy),
}

/// One field of a step's form.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// The ordered fields of one step. Steps without fields always validate.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: Vec<FieldSpec>,
}

impl Form {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Validate `raw` against every field, collecting one error per
    /// failing field in field order.
    ///
    /// Input for fields the form does not declare is ignored.
    pub fn validate(&self, raw: &RawInput, today: Date) -> ValidationResult {
        let mut answers = StepAnswers::new();
        let mut errors = FieldErrors::default();

        for field in &self.fields {
            match validate_field(field, raw, today) {
                Ok(Some(answer)) => {
                    answers.insert(field.name.to_string(), answer);
                }
                Ok(None) => {}
                Err(message) => errors.push(field.name, message),
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid(answers)
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

fn validate_field(
    field: &FieldSpec,
    raw: &RawInput,
    today: Date,
) -> Result<Option<Answer>, String> {
    match &field.kind {
        FieldKind::Text => {
            let value = raw.text_value(field.name);
            rules::check_all(&field.rules, value, raw)?;
            Ok(value.map(|v| Answer::Text(v.to_string())))
        }
        FieldKind::Checkbox => {
            let checked = raw.is_checked(field.name);
            rules::check_all(&field.rules, checked.then_some("true"), raw)?;
            Ok(checked.then_some(Answer::Flag(true)))
        }
        FieldKind::Choice { accepts, invalid } => {
            let value = raw.text_value(field.name);
            rules::check_all(&field.rules, value, raw)?;
            match value {
                Some(v) if !accepts(v) => Err((*invalid).to_string()),
                Some(v) => Ok(Some(Answer::Choice(v.to_string()))),
                None => Ok(None),
            }
        }
        FieldKind::Date(date_rules) => {
            let raw_date = match raw.get(field.name) {
                Some(RawValue::Date(d)) => Some(d),
                _ => None,
            };
            Ok(date_rules.check(raw_date, today)?.map(Answer::Date))
        }
        FieldKind::File(policy) => {
            let file = match raw.get(field.name) {
                Some(RawValue::File(f)) if !f.filename.trim().is_empty() => f,
                _ => return Ok(None),
            };
            policy.check(file)?;
            Ok(Some(Answer::File(FileMetadata {
                filename: file.filename.clone(),
                size_bytes: file.size_bytes,
                reference: file.reference.clone(),
            })))
        }
    }
}
