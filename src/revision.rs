//! Journey revisions.
//!
//! The journey has shipped with different upload allow-lists over time.
//! A revision pins those choices so a running deployment serves exactly
//! one of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pricing::PriceTable;
use crate::validate::UploadPolicy;

const FIVE_MB: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Proof of death as JPG, PNG or PDF.
    V1,
    /// Proof of death as an image only.
    #[default]
    V2,
}

impl Revision {
    pub fn upload_policy(self) -> UploadPolicy {
        match self {
            Self::V1 => UploadPolicy {
                extensions: &["jpg", "png", "pdf"],
                max_bytes: FIVE_MB,
                extension_message: "Files must be in JPG, PNG or PDF format",
                size_message: "The maximum file size is 5MB",
            },
            Self::V2 => UploadPolicy {
                extensions: &["jpg", "jpeg", "gif", "png"],
                max_bytes: FIVE_MB,
                extension_message: "The selected file must be a JPG, JPEG, GIF or PNG",
                size_message: "The selected file must be smaller than 5MB",
            },
        }
    }

    /// Prices this revision charges when the config does not override them.
    pub fn default_prices(self) -> PriceTable {
        match self {
            Self::V1 | Self::V2 => PriceTable::default(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        })
    }
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(format!("unknown journey revision '{other}', expected 'v1' or 'v2'")),
        }
    }
}
