//! Field rules and upload policy.

use std::sync::LazyLock;

use regex::Regex;

use super::{RawInput, UploadedFile};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid regex"));

/// A single check on a text, choice or checkbox field.
///
/// Rules other than the `Required*` family pass when the field is blank.
#[derive(Debug, Clone)]
pub enum Rule {
    Required {
        message: String,
    },
    MaxLength {
        max: usize,
        message: String,
    },
    Email {
        message: String,
    },
    /// Value must be one of a fixed list, compared exactly.
    OneOf {
        values: &'static [&'static str],
        message: String,
    },
    /// Required unless the named checkbox is ticked.
    RequiredUnlessChecked {
        checkbox: &'static str,
        message: String,
    },
    /// Must be blank when the named checkbox is ticked.
    EmptyIfChecked {
        checkbox: &'static str,
        message: String,
    },
    /// Required when the named radio holds one of `values`.
    RequiredWhenSelected {
        radio: &'static str,
        values: &'static [&'static str],
        message: String,
    },
}

impl Rule {
    pub fn required(message: &str) -> Self {
        Self::Required {
            message: message.to_string(),
        }
    }

    /// Length limit with the standard "{label} must be N characters or less" message.
    pub fn max_length(label: &str, max: usize) -> Self {
        Self::MaxLength {
            max,
            message: format!("{label} must be {max} characters or less"),
        }
    }

    pub fn email(message: &str) -> Self {
        Self::Email {
            message: message.to_string(),
        }
    }

    fn check(&self, value: Option<&str>, raw: &RawInput) -> Result<(), String> {
        match self {
            Self::Required { message } => {
                if value.is_none() {
                    return Err(message.clone());
                }
            }
            Self::MaxLength { max, message } => {
                if value.is_some_and(|v| v.chars().count() > *max) {
                    return Err(message.clone());
                }
            }
            Self::Email { message } => {
                if value.is_some_and(|v| !EMAIL_RE.is_match(v)) {
                    return Err(message.clone());
                }
            }
            Self::OneOf { values, message } => {
                if value.is_some_and(|v| !values.contains(&v)) {
                    return Err(message.clone());
                }
            }
            Self::RequiredUnlessChecked { checkbox, message } => {
                if value.is_none() && !raw.is_checked(checkbox) {
                    return Err(message.clone());
                }
            }
            Self::EmptyIfChecked { checkbox, message } => {
                if value.is_some() && raw.is_checked(checkbox) {
                    return Err(message.clone());
                }
            }
            Self::RequiredWhenSelected {
                radio,
                values,
                message,
            } => {
                let selected = raw.text_value(radio).is_some_and(|v| values.contains(&v));
                if value.is_none() && selected {
                    return Err(message.clone());
                }
            }
        }
        Ok(())
    }
}

/// Run `rules` in order, stopping at the first failure.
pub(super) fn check_all(rules: &[Rule], value: Option<&str>, raw: &RawInput) -> Result<(), String> {
    rules.iter().try_for_each(|rule| rule.check(value, raw))
}

/// Which files a step accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Lowercase extensions without the dot.
    pub extensions: &'static [&'static str],
    /// Inclusive ceiling.
    pub max_bytes: u64,
    pub extension_message: &'static str,
    pub size_message: &'static str,
}

impl UploadPolicy {
    /// Extension is checked before size.
    pub fn check(&self, file: &UploadedFile) -> Result<(), String> {
        let extension = file
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        let allowed = extension
            .as_deref()
            .is_some_and(|ext| self.extensions.contains(&ext));
        if !allowed {
            return Err(self.extension_message.to_string());
        }
        if file.size_bytes > self.max_bytes {
            return Err(self.size_message.to_string());
        }
        Ok(())
    }
}
