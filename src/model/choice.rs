//! Closed option sets behind the journey's radio questions.
//!
//! Stored answers keep the submitted option value as a string; routing
//! parses it back through [`Choice::parse`].

use serde::{Deserialize, Serialize};

/// A radio option set with stable submitted values.
pub trait Choice: Copy + Sized + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    /// The submitted form value.
    fn value(self) -> &'static str;

    /// The label shown to the user.
    fn label(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.value() == value)
    }
}

/// Whether `value` is one of `C`'s options. Usable as a plain `fn` pointer.
pub fn accepts<C: Choice>(value: &str) -> bool {
    C::parse(value).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceBranch {
    RoyalNavy,
    BritishArmy,
    RoyalAirForce,
    HomeGuard,
    Other,
    Unknown,
}

impl Choice for ServiceBranch {
    const ALL: &'static [Self] = &[
        Self::RoyalNavy,
        Self::BritishArmy,
        Self::RoyalAirForce,
        Self::HomeGuard,
        Self::Other,
        Self::Unknown,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::RoyalNavy => "ROYAL_NAVY",
            Self::BritishArmy => "BRITISH_ARMY",
            Self::RoyalAirForce => "ROYAL_AIR_FORCE",
            Self::HomeGuard => "HOME_GUARD",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::RoyalNavy => "Royal Navy (including Royal Marines)",
            Self::BritishArmy => "British Army",
            Self::RoyalAirForce => "Royal Air Force",
            Self::HomeGuard => "Home Guard",
            Self::Other => "Other",
            Self::Unknown => "I do not know",
        }
    }
}

/// Yes / No.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn value(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Yes / No / I do not know, submitted as `dont_know`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNoDontKnow {
    Yes,
    No,
    DontKnow,
}

impl Choice for YesNoDontKnow {
    const ALL: &'static [Self] = &[Self::Yes, Self::No, Self::DontKnow];

    fn value(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::DontKnow => "dont_know",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::DontKnow => "I do not know",
        }
    }
}

/// Commissioned officer answer: Yes / No / I don't know, submitted as `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfficerStatus {
    Yes,
    No,
    Unknown,
}

impl Choice for OfficerStatus {
    const ALL: &'static [Self] = &[Self::Yes, Self::No, Self::Unknown];

    fn value(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Unknown => "I don't know",
        }
    }
}

/// Where an earlier request for the same record was sent, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviousRequest {
    MinistryOfDefence,
    NationalArchives,
    No,
}

impl Choice for PreviousRequest {
    const ALL: &'static [Self] = &[Self::MinistryOfDefence, Self::NationalArchives, Self::No];

    fn value(self) -> &'static str {
        match self {
            Self::MinistryOfDefence => "yes_mod",
            Self::NationalArchives => "yes_tna",
            Self::No => "no",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::MinistryOfDefence => "Yes, to the Ministry of Defence",
            Self::NationalArchives => "Yes, to The National Archives",
            Self::No => "No",
        }
    }
}

/// Standard or full record processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingOption {
    Standard,
    Full,
}

impl Choice for ProcessingOption {
    const ALL: &'static [Self] = &[Self::Standard, Self::Full];

    fn value(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Full => "full",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Full => "Full",
        }
    }
}
