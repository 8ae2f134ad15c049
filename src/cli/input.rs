//! Turning `--field` and `--file` arguments into raw step input.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::validate::{FieldKind, FieldSpec, Form, RawDate, RawInput, RawValue, UploadedFile};

/// A `--file` argument, checked against the form but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PendingUpload {
    pub field: &'static str,
    pub path: PathBuf,
    pub file: UploadedFile,
}

/// Parse `NAME=VALUE` pairs for `form`.
///
/// Date fields take either `NAME=DD/MM/YYYY` or the separate parts
/// `NAME.day`, `NAME.month`, and `NAME.year`.
pub(super) fn parse_fields(form: &Form, pairs: &[String]) -> Result<RawInput, String> {
    let mut raw = RawInput::new();
    let mut dates: BTreeMap<&'static str, RawDate> = BTreeMap::new();

    for pair in pairs {
        let (key, value) = split_pair(pair, "NAME=VALUE")?;
        let (name, part) = match key.rsplit_once('.') {
            Some((name, part @ ("day" | "month" | "year"))) => (name, Some(part)),
            _ => (key, None),
        };
        let field = find_field(form, name)?;

        match (&field.kind, part) {
            (FieldKind::Date(_), Some(part)) => {
                let date = dates.entry(field.name).or_default();
                match part {
                    "day" => date.day = value.to_string(),
                    "month" => date.month = value.to_string(),
                    _ => date.year = value.to_string(),
                }
            }
            (FieldKind::Date(_), None) => {
                // Unparseable input lands in the day box so validation
                // reports it as an invalid date.
                let date = RawDate::parse_compact(value).unwrap_or_else(|| RawDate::new(value, "", ""));
                dates.insert(field.name, date);
            }
            (FieldKind::File(_), _) => {
                return Err(format!("'{name}' is a file field; use --file {name}=PATH"));
            }
            (_, Some(_)) => return Err(format!("'{name}' is not a date field")),
            _ => raw.insert(field.name, RawValue::Text(value.to_string())),
        }
    }

    for (name, date) in dates {
        raw.insert(name, RawValue::Date(date));
    }
    Ok(raw)
}

/// Parse `NAME=PATH` pairs for `form`'s file fields.
pub(super) fn parse_uploads(form: &Form, pairs: &[String]) -> Result<Vec<PendingUpload>, String> {
    pairs
        .iter()
        .map(|pair| {
            let (name, path) = split_pair(pair, "NAME=PATH")?;
            let field = find_field(form, name)?;
            if !matches!(field.kind, FieldKind::File(_)) {
                return Err(format!("'{name}' is not a file field; use --field"));
            }

            let path = PathBuf::from(path);
            let metadata = fs::metadata(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| format!("{} is not a file", path.display()))?;

            Ok(PendingUpload {
                field: field.name,
                path,
                file: UploadedFile {
                    filename,
                    size_bytes: metadata.len(),
                    reference: None,
                },
            })
        })
        .collect()
}

fn split_pair<'a>(pair: &'a str, shape: &str) -> Result<(&'a str, &'a str), String> {
    pair.split_once('=')
        .ok_or_else(|| format!("expected {shape}, got '{pair}'"))
}

fn find_field<'f>(form: &'f Form, name: &str) -> Result<&'f FieldSpec, String> {
    form.fields.iter().find(|f| f.name == name).ok_or_else(|| {
        let known: Vec<&str> = form.field_names().collect();
        if known.is_empty() {
            format!("this step has no fields (got '{name}')")
        } else {
            format!("no field '{name}' on this step; expected one of: {}", known.join(", "))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::StepId;
    use crate::revision::Revision;
    use crate::validate::form_for;

    fn args(pairs: &[&str]) -> Vec<String> {
        pairs.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn compact_date_is_split_into_parts() {
        let form = form_for(StepId::WhatWasTheirDateOfBirth, Revision::V2);

        let raw = parse_fields(&form, &args(&["date_of_birth=15/06/1914"])).unwrap();

        assert_eq!(
            raw.get("date_of_birth"),
            Some(&RawValue::Date(RawDate::new("15", "06", "1914")))
        );
    }

    #[test]
    fn date_parts_are_combined() {
        let form = form_for(StepId::WhatWasTheirDateOfBirth, Revision::V2);

        let raw = parse_fields(
            &form,
            &args(&[
                "date_of_birth.year=1914",
                "date_of_birth.day=15",
                "date_of_birth.month=6",
            ]),
        )
        .unwrap();

        assert_eq!(
            raw.get("date_of_birth"),
            Some(&RawValue::Date(RawDate::new("15", "6", "1914")))
        );
    }

    #[test]
    fn unknown_field_lists_the_expected_ones() {
        let form = form_for(StepId::YourContactDetails, Revision::V2);

        let err = parse_fields(&form, &args(&["favourite_colour=blue"])).unwrap_err();

        assert!(err.contains("requester_email"), "{err}");
    }

    #[test]
    fn malformed_pair_is_rejected() {
        let form = form_for(StepId::YourContactDetails, Revision::V2);

        assert!(parse_fields(&form, &args(&["requester_email"])).is_err());
    }

    #[test]
    fn file_fields_need_file_flag() {
        let form = form_for(StepId::UploadAProofOfDeath, Revision::V2);

        let err = parse_fields(&form, &args(&["proof_of_death=cert.jpg"])).unwrap_err();

        assert!(err.contains("--file"));
    }

    #[test]
    fn uploads_carry_name_and_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("certificate.jpg");
        fs::write(&path, vec![0u8; 1024]).unwrap();
        let form = form_for(StepId::UploadAProofOfDeath, Revision::V2);

        let uploads =
            parse_uploads(&form, &[format!("proof_of_death={}", path.display())]).unwrap();

        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].field, "proof_of_death");
        assert_eq!(uploads[0].file.filename, "certificate.jpg");
        assert_eq!(uploads[0].file.size_bytes, 1024);
        assert_eq!(uploads[0].file.reference, None);
    }

    #[test]
    fn missing_upload_file_is_an_error() {
        let form = form_for(StepId::UploadAProofOfDeath, Revision::V2);

        let err = parse_uploads(&form, &args(&["proof_of_death=/no/such/file.jpg"])).unwrap_err();

        assert!(err.contains("failed to read"));
    }
}
