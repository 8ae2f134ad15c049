//! Branching decisions.
//!
//! Each function reads the answers it needs and names the next page. They
//! return `None` only when a required answer is missing; the graph turns
//! that into a configuration error.

use jiff::civil::Date;

use crate::model::{
    AnswerStore, OfficerStatus, Outcome, Page, ServiceBranch, StepId, YesNo, YesNoDontKnow,
};

/// Oldest records the service holds are for people born in this year.
pub const EARLIEST_BIRTH_YEAR: i16 = 1800;
/// No records are held for anyone born after this year.
pub const LATEST_BIRTH_YEAR: i16 = 1939;
/// Records stay closed this many years after the service person's birth.
pub const RECORD_CLOSURE_YEARS: i16 = 115;

/// Inputs to routing that do not come from the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteContext {
    pub today: Date,
}

impl RouteContext {
    /// People born after this year still have closed records, so a proof of
    /// death is needed.
    pub fn last_open_birth_year(&self) -> i16 {
        self.today.year() - RECORD_CLOSURE_YEARS - 1
    }
}

pub(super) const ALIVE_TARGETS: &[Page] = &[
    Page::Outcome(Outcome::MustSubmitSubjectAccessRequest),
    Page::Step(StepId::ServiceBranch),
    Page::Outcome(Outcome::OnlyLivingSubjectsCanRequestTheirRecord),
];

pub(super) fn after_is_alive(answers: &AnswerStore, _: &RouteContext) -> Option<Page> {
    let page = match answers.choice::<YesNoDontKnow>("is_service_person_alive")? {
        YesNoDontKnow::Yes => Outcome::MustSubmitSubjectAccessRequest.into(),
        YesNoDontKnow::No => StepId::ServiceBranch.into(),
        YesNoDontKnow::DontKnow => Outcome::OnlyLivingSubjectsCanRequestTheirRecord.into(),
    };
    Some(page)
}

pub(super) const BRANCH_TARGETS: &[Page] = &[
    Page::Outcome(Outcome::WeDoNotHaveRoyalNavyServiceRecords),
    Page::Outcome(Outcome::WeAreUnlikelyToLocateThisRecord),
    Page::Step(StepId::WereTheyACommissionedOfficer),
];

pub(super) fn after_service_branch(answers: &AnswerStore, _: &RouteContext) -> Option<Page> {
    let page = match answers.choice::<ServiceBranch>("service_branch")? {
        ServiceBranch::RoyalNavy => Outcome::WeDoNotHaveRoyalNavyServiceRecords.into(),
        ServiceBranch::HomeGuard => Outcome::WeAreUnlikelyToLocateThisRecord.into(),
        ServiceBranch::BritishArmy
        | ServiceBranch::RoyalAirForce
        | ServiceBranch::Other
        | ServiceBranch::Unknown => StepId::WereTheyACommissionedOfficer.into(),
    };
    Some(page)
}

pub(super) const OFFICER_TARGETS: &[Page] = &[
    Page::Outcome(Outcome::WeAreUnlikelyToHoldArmyOfficerRecords),
    Page::Outcome(Outcome::WeAreUnlikelyToHoldRafOfficerRecords),
    Page::Outcome(Outcome::WeAreUnlikelyToHoldOfficerRecordsGeneric),
    Page::Outcome(Outcome::WeMayHoldThisRecord),
];

/// Which outcome an officer answer leads to, given the branch.
pub fn officer_outcome(branch: ServiceBranch, officer: OfficerStatus) -> Outcome {
    match (officer, branch) {
        (OfficerStatus::Yes, ServiceBranch::BritishArmy) => {
            Outcome::WeAreUnlikelyToHoldArmyOfficerRecords
        }
        (OfficerStatus::Yes, ServiceBranch::RoyalAirForce) => {
            Outcome::WeAreUnlikelyToHoldRafOfficerRecords
        }
        (OfficerStatus::Yes, _) => Outcome::WeAreUnlikelyToHoldOfficerRecordsGeneric,
        (OfficerStatus::No | OfficerStatus::Unknown, _) => Outcome::WeMayHoldThisRecord,
    }
}

pub(super) fn after_officer(answers: &AnswerStore, _: &RouteContext) -> Option<Page> {
    let branch = answers.choice::<ServiceBranch>("service_branch")?;
    let officer = answers.choice::<OfficerStatus>("were_they_a_commissioned_officer")?;
    Some(officer_outcome(branch, officer).into())
}

pub(super) const BIRTH_TARGETS: &[Page] = &[
    Page::Outcome(Outcome::WeDoNotHaveRecordsForPeopleBornAfter),
    Page::Step(StepId::DoYouHaveAProofOfDeath),
    Page::Step(StepId::ServicePersonDetails),
];

pub(super) fn after_date_of_birth(answers: &AnswerStore, ctx: &RouteContext) -> Option<Page> {
    let year = answers.date("date_of_birth")?.year();
    let page = if year > LATEST_BIRTH_YEAR {
        Outcome::WeDoNotHaveRecordsForPeopleBornAfter.into()
    } else if year > ctx.last_open_birth_year() {
        StepId::DoYouHaveAProofOfDeath.into()
    } else {
        StepId::ServicePersonDetails.into()
    };
    Some(page)
}

pub(super) const PROOF_TARGETS: &[Page] = &[
    Page::Step(StepId::UploadAProofOfDeath),
    Page::Step(StepId::AreYouSureYouWantToProceedWithoutProofOfDeath),
];

pub(super) fn after_proof_of_death(answers: &AnswerStore, _: &RouteContext) -> Option<Page> {
    let page = match answers.choice::<YesNo>("do_you_have_a_proof_of_death")? {
        YesNo::Yes => StepId::UploadAProofOfDeath,
        YesNo::No => StepId::AreYouSureYouWantToProceedWithoutProofOfDeath,
    };
    Some(page.into())
}

pub(super) const PROCEED_WITHOUT_PROOF_TARGETS: &[Page] = &[
    Page::Step(StepId::ServicePersonDetails),
    Page::Step(StepId::UploadAProofOfDeath),
];

pub(super) fn after_proceed_without_proof(
    answers: &AnswerStore,
    _: &RouteContext,
) -> Option<Page> {
    let page = match answers.choice::<YesNo>("proceed_without_proof_of_death")? {
        YesNo::Yes => StepId::ServicePersonDetails,
        YesNo::No => StepId::UploadAProofOfDeath,
    };
    Some(page.into())
}

pub(super) const CONTACT_TARGETS: &[Page] = &[
    Page::Step(StepId::YourOrderSummary),
    Page::Step(StepId::WhatIsYourAddress),
];

pub(super) fn after_contact_details(answers: &AnswerStore, _: &RouteContext) -> Option<Page> {
    let page = if answers.text("requester_email").is_some() {
        StepId::YourOrderSummary
    } else if answers.flag("does_not_have_email") {
        StepId::WhatIsYourAddress
    } else {
        return None;
    };
    Some(page.into())
}
