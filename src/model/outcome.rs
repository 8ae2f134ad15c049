//! Terminal outcome pages and the `Page` type the router returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StepId;

/// An informational page that ends a branch of the journey.
///
/// Some outcomes let the user carry on with the request ("continue this
/// request"); the rest only offer to exit the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    MustSubmitSubjectAccessRequest,
    OnlyLivingSubjectsCanRequestTheirRecord,
    WeDoNotHaveRoyalNavyServiceRecords,
    WeAreUnlikelyToLocateThisRecord,
    WeAreUnlikelyToHoldArmyOfficerRecords,
    WeAreUnlikelyToHoldRafOfficerRecords,
    WeAreUnlikelyToHoldOfficerRecordsGeneric,
    WeMayHoldThisRecord,
    WeDoNotHaveRecordsForPeopleBornAfter,
    YouHaveCancelledYourRequest,
    ProceedToPayment,
}

impl Outcome {
    pub const ALL: [Self; 11] = [
        Self::MustSubmitSubjectAccessRequest,
        Self::OnlyLivingSubjectsCanRequestTheirRecord,
        Self::WeDoNotHaveRoyalNavyServiceRecords,
        Self::WeAreUnlikelyToLocateThisRecord,
        Self::WeAreUnlikelyToHoldArmyOfficerRecords,
        Self::WeAreUnlikelyToHoldRafOfficerRecords,
        Self::WeAreUnlikelyToHoldOfficerRecordsGeneric,
        Self::WeMayHoldThisRecord,
        Self::WeDoNotHaveRecordsForPeopleBornAfter,
        Self::YouHaveCancelledYourRequest,
        Self::ProceedToPayment,
    ];

    /// The URL path segment for this outcome.
    pub fn path(self) -> &'static str {
        match self {
            Self::MustSubmitSubjectAccessRequest => "must-submit-subject-access-request",
            Self::OnlyLivingSubjectsCanRequestTheirRecord => {
                "only-living-subjects-can-request-their-record"
            }
            Self::WeDoNotHaveRoyalNavyServiceRecords => {
                "we-do-not-have-royal-navy-service-branch-records"
            }
            Self::WeAreUnlikelyToLocateThisRecord => "we-are-unlikely-to-locate-this-record",
            Self::WeAreUnlikelyToHoldArmyOfficerRecords => {
                "we-are-unlikely-to-hold-army-officer-records"
            }
            Self::WeAreUnlikelyToHoldRafOfficerRecords => {
                "we-are-unlikely-to-hold-royal-air-force-officer-records"
            }
            Self::WeAreUnlikelyToHoldOfficerRecordsGeneric => {
                "we-are-unlikely-to-hold-officer-records-for-this-branch"
            }
            Self::WeMayHoldThisRecord => "we-may-hold-this-record",
            Self::WeDoNotHaveRecordsForPeopleBornAfter => {
                "we-do-not-have-records-for-people-born-after"
            }
            Self::YouHaveCancelledYourRequest => "you-have-cancelled-your-request",
            Self::ProceedToPayment => "send-to-gov-uk-pay",
        }
    }

    /// Stable identifier of the content variant rendered for this outcome.
    pub fn template_id(self) -> &'static str {
        match self {
            Self::MustSubmitSubjectAccessRequest => "must-submit-subject-access-request",
            Self::OnlyLivingSubjectsCanRequestTheirRecord => {
                "only-living-subjects-can-request-their-record"
            }
            Self::WeDoNotHaveRoyalNavyServiceRecords => "we-do-not-hold-this-record--royal-navy",
            Self::WeAreUnlikelyToLocateThisRecord => {
                "we-are-unlikely-to-locate-this-record--home-guard"
            }
            Self::WeAreUnlikelyToHoldArmyOfficerRecords => "unlikely-to-hold--army-officer-records",
            Self::WeAreUnlikelyToHoldRafOfficerRecords => "unlikely-to-hold--raf-officer-records",
            Self::WeAreUnlikelyToHoldOfficerRecordsGeneric => {
                "we-are-unlikely-to-hold-this-record--generic"
            }
            Self::WeMayHoldThisRecord => "we-may-hold-this-record--generic",
            Self::WeDoNotHaveRecordsForPeopleBornAfter => {
                "we-do-not-have-records-for-people-born-after"
            }
            Self::YouHaveCancelledYourRequest => "you-have-cancelled-your-request",
            Self::ProceedToPayment => "send-to-gov-uk-pay",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::MustSubmitSubjectAccessRequest => "You must submit a subject access request",
            Self::OnlyLivingSubjectsCanRequestTheirRecord => {
                "Only living subjects can request their record"
            }
            Self::WeDoNotHaveRoyalNavyServiceRecords => {
                "We do not have Royal Navy service records"
            }
            Self::WeAreUnlikelyToLocateThisRecord => "We are unlikely to locate this record",
            Self::WeAreUnlikelyToHoldArmyOfficerRecords => {
                "We are unlikely to hold this record"
            }
            Self::WeAreUnlikelyToHoldRafOfficerRecords => "We are unlikely to hold this record",
            Self::WeAreUnlikelyToHoldOfficerRecordsGeneric => {
                "We are unlikely to hold this record"
            }
            Self::WeMayHoldThisRecord => "We may hold this record",
            Self::WeDoNotHaveRecordsForPeopleBornAfter => {
                "We do not have records for people born after 1939"
            }
            Self::YouHaveCancelledYourRequest => "You have cancelled your request",
            Self::ProceedToPayment => "Proceed to payment",
        }
    }

    /// The step reached through "continue this request", if any.
    pub fn resumes_at(self) -> Option<StepId> {
        match self {
            Self::WeAreUnlikelyToHoldArmyOfficerRecords
            | Self::WeAreUnlikelyToHoldRafOfficerRecords
            | Self::WeAreUnlikelyToHoldOfficerRecordsGeneric
            | Self::WeMayHoldThisRecord => Some(StepId::WhatWasTheirDateOfBirth),
            _ => None,
        }
    }

    /// Whether the page offers the "exit this form" action.
    pub fn offers_exit(self) -> bool {
        !self.ends_journey() && self.resumes_at().is_none()
    }

    /// Whether the page renders a back link.
    pub fn has_back_link(self) -> bool {
        !matches!(
            self,
            Self::WeAreUnlikelyToHoldOfficerRecordsGeneric
                | Self::YouHaveCancelledYourRequest
                | Self::ProceedToPayment
        )
    }

    /// Reaching this outcome closes the journey.
    pub fn ends_journey(self) -> bool {
        matches!(self, Self::YouHaveCancelledYourRequest | Self::ProceedToPayment)
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        Self::ALL.into_iter().find(|o| o.path() == path)
    }
}

/// Anything the user can land on: a form step or an outcome page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum Page {
    Step(StepId),
    Outcome(Outcome),
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Self::Step(s) => s.path(),
            Self::Outcome(o) => o.path(),
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Step(s) => s.heading(),
            Self::Outcome(o) => o.heading(),
        }
    }

    /// Resolve a URL path segment to a step or an outcome.
    pub fn from_path(path: &str) -> Option<Self> {
        StepId::from_path(path)
            .map(Self::Step)
            .or_else(|| Outcome::from_path(path).map(Self::Outcome))
    }

    pub fn as_step(self) -> Option<StepId> {
        match self {
            Self::Step(s) => Some(s),
            Self::Outcome(_) => None,
        }
    }
}

impl From<StepId> for Page {
    fn from(step: StepId) -> Self {
        Self::Step(step)
    }
}

impl From<Outcome> for Page {
    fn from(outcome: Outcome) -> Self {
        Self::Outcome(outcome)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
