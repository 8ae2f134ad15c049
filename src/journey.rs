//! The journey orchestrator.
//!
//! Ties the step graph to a user's state: check reachability, validate,
//! store, route, record history. State goes in and comes back out; the
//! orchestrator holds nothing per user, so any session store can sit
//! behind it.

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::graph::{Reachability, RouteContext, StepGraph};
use crate::model::{AnswerStore, JourneyState, JourneyStatus, NavigationHistory, Page, StepId};
use crate::pricing::{OrderSummary, PriceTable};
use crate::validate::{FieldErrors, RawInput, ValidationResult};

/// Errors from journey operations.
///
/// Field validation failures are not errors; they come back as
/// [`Submission::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    #[error("page '{0}' is not reachable from this journey")]
    Unreachable(Page),

    #[error("journey configuration error: {0}")]
    Configuration(String),

    #[error("journey has already ended")]
    Ended,

    #[error("page '{0}' does not continue to another step")]
    NotResumable(Page),

    #[error("page '{0}' has no back link")]
    NoBackLink(Page),
}

pub type Result<T> = core::result::Result<T, JourneyError>;

/// What a submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Answers were stored and the user moves on to this page.
    Advanced(Page),
    /// Nothing was stored; show these errors on the same step.
    Rejected(FieldErrors),
}

/// Runs journeys over one verified step graph.
pub struct Journey<C = SystemClock> {
    graph: StepGraph,
    prices: PriceTable,
    clock: C,
}

impl<C: Clock> Journey<C> {
    pub fn new(graph: StepGraph, prices: PriceTable, clock: C) -> Self {
        Self {
            graph,
            prices,
            clock,
        }
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    fn route_context(&self) -> RouteContext {
        RouteContext {
            today: self.clock.today(),
        }
    }

    /// A fresh journey, standing on the start page.
    pub fn start(&self) -> JourneyState {
        info!(revision = %self.graph.revision(), "journey started");
        JourneyState {
            answers: AnswerStore::new(),
            history: NavigationHistory::starting_at(Page::Step(StepId::Start)),
            status: JourneyStatus::Active,
        }
    }

    /// Validate raw input for `step` without touching any state.
    pub fn validate(&self, step: StepId, raw: &RawInput) -> Result<ValidationResult> {
        self.graph.validate(step, raw, self.clock.today())
    }

    /// Where `step` leads given `answers`.
    pub fn route(&self, step: StepId, answers: &AnswerStore) -> Result<Page> {
        self.graph.route(step, answers, &self.route_context())
    }

    /// Whether `state` may land on `page`.
    ///
    /// Steps follow their guard. Outcomes are only reachable once routing
    /// has sent the user there.
    pub fn is_reachable(&self, page: Page, state: &JourneyState) -> bool {
        match page {
            Page::Step(step) => {
                let Ok(node) = self.graph.node(step) else {
                    return false;
                };
                match node.guard {
                    Reachability::Always => true,
                    _ if !state.has_started() || !state.is_active() => false,
                    Reachability::AfterStart => true,
                    Reachability::RequiresAnswer(field) => state.answers.field(field).is_some(),
                }
            }
            Page::Outcome(_) => state.history.contains(page),
        }
    }

    /// Land on `page` directly, e.g. from a deep link or a "change" link.
    ///
    /// Visiting the start page of a missing or finished journey begins a
    /// new one.
    pub fn visit(&self, page: Page, state: &JourneyState) -> Result<JourneyState> {
        if page == Page::Step(StepId::Start) && (!state.has_started() || !state.is_active()) {
            return Ok(self.start());
        }
        if !self.is_reachable(page, state) {
            debug!(%page, "refused unreachable visit");
            return Err(JourneyError::Unreachable(page));
        }
        let mut next = state.clone();
        next.history.record_visit(page);
        Ok(next)
    }

    /// Submit raw input for `step`.
    ///
    /// Invalid input leaves the state untouched. Valid input replaces the
    /// step's answers, clears answers the new route has made stale, and
    /// moves the user on.
    pub fn submit(
        &self,
        step: StepId,
        raw: &RawInput,
        state: &JourneyState,
    ) -> Result<(JourneyState, Submission)> {
        if state.has_started() && !state.is_active() {
            return Err(JourneyError::Ended);
        }
        if !self.is_reachable(Page::Step(step), state) {
            debug!(%step, "refused submission to unreachable step");
            return Err(JourneyError::Unreachable(Page::Step(step)));
        }

        let mut next = if state.has_started() {
            state.clone()
        } else {
            self.start()
        };

        let ctx = self.route_context();
        let answers = match self.graph.validate(step, raw, ctx.today)? {
            ValidationResult::Valid(answers) => answers,
            ValidationResult::Invalid(errors) => {
                debug!(
                    %step,
                    errors = errors.number_of_errors(),
                    "submission rejected"
                );
                return Ok((next, Submission::Rejected(errors)));
            }
        };

        let previous = if next.answers.has_answered(step) {
            self.graph.route(step, &next.answers, &ctx).ok()
        } else {
            None
        };

        next.answers.replace_step(step, answers);
        let destination = self.graph.route(step, &next.answers, &ctx)?;

        if let Some(old) = previous.filter(|old| *old != destination) {
            self.clear_stale(step, old, destination, &mut next);
        }

        next.history.record_visit(Page::Step(step));
        next.history.record_visit(destination);

        if let Page::Outcome(outcome) = destination {
            if outcome.ends_journey() {
                next.status = JourneyStatus::Ended {
                    ended_at: self.clock.timestamp(),
                    outcome,
                };
                info!(outcome = outcome.template_id(), "journey ended");
            }
        }

        info!(%step, %destination, "step submitted");
        Ok((next, Submission::Advanced(destination)))
    }

    /// Drop answers and history for steps only reachable through the old
    /// destination.
    fn clear_stale(&self, step: StepId, old: Page, new: Page, state: &mut JourneyState) {
        let still_reachable = self.graph.reachable_from(new);
        let abandoned: Vec<StepId> = self
            .graph
            .reachable_from(old)
            .into_iter()
            .filter(|s| *s != step && !still_reachable.contains(s))
            .collect();

        state
            .history
            .retain(|page| !matches!(page, Page::Step(s) if abandoned.contains(&s)));
        let cleared: Vec<StepId> = abandoned
            .into_iter()
            .filter(|s| state.answers.clear_step(*s))
            .collect();
        if !cleared.is_empty() {
            info!(%step, %old, %new, cleared = ?cleared, "cleared answers from abandoned route");
        }
    }

    /// Go back one page. Never moves past the start page and never
    /// re-validates.
    ///
    /// Pages the user can no longer reach are skipped. Outcomes without a
    /// back link refuse.
    pub fn back(&self, state: &JourneyState) -> Result<(JourneyState, Page)> {
        if !state.has_started() {
            return Err(JourneyError::Unreachable(Page::Step(StepId::Start)));
        }
        if !state.is_active() {
            return Err(JourneyError::Ended);
        }
        if let Some(current @ Page::Outcome(outcome)) = state.current_page() {
            if !outcome.has_back_link() {
                return Err(JourneyError::NoBackLink(current));
            }
        }

        let mut next = state.clone();
        let mut page = next.history.back().unwrap_or(Page::Step(StepId::Start));
        while !self.is_reachable(page, &next) && next.history.len() > 1 {
            debug!(%page, "skipped unreachable page");
            page = next.history.back().unwrap_or(Page::Step(StepId::Start));
        }
        debug!(%page, "went back");
        Ok((next, page))
    }

    /// "Exit this form": move to the cancel confirmation.
    pub fn exit(&self, state: &JourneyState) -> Result<(JourneyState, Page)> {
        let page = Page::Step(StepId::AreYouSureYouWantToCancel);
        let next = self.visit(page, state).map_err(|e| match e {
            JourneyError::Unreachable(_) if state.has_started() => JourneyError::Ended,
            other => other,
        })?;
        info!("exit requested");
        Ok((next, page))
    }

    /// "Continue this request" from an outcome that allows it.
    pub fn continue_request(&self, state: &JourneyState) -> Result<(JourneyState, Page)> {
        if state.has_started() && !state.is_active() {
            return Err(JourneyError::Ended);
        }
        let current = state
            .current_page()
            .ok_or(JourneyError::Unreachable(Page::Step(StepId::Start)))?;
        let resume = match current {
            Page::Outcome(outcome) => outcome.resumes_at(),
            Page::Step(_) => None,
        }
        .ok_or(JourneyError::NotResumable(current))?;

        let page = Page::Step(resume);
        let next = self.visit(page, state)?;
        info!(from = %current, to = %page, "request continued");
        Ok((next, page))
    }

    /// The priced order, once an order type has been chosen.
    pub fn order_summary(&self, state: &JourneyState) -> Option<OrderSummary> {
        OrderSummary::from_answers(&state.answers, &self.prices)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use jiff::tz::TimeZone;

    use super::*;
    use crate::clock::FixedClock;
    use crate::model::{Answer, Outcome};
    use crate::revision::Revision;
    use crate::validate::UploadedFile;

    fn journey() -> Journey<FixedClock> {
        let now = date(2026, 10, 16)
            .at(12, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        Journey::new(
            StepGraph::build(Revision::V2).unwrap(),
            PriceTable::default(),
            FixedClock::new(now),
        )
    }

    fn one(field: &str, value: &str) -> RawInput {
        RawInput::new().text(field, value)
    }

    fn advance(j: &Journey<FixedClock>, state: &JourneyState, step: StepId, raw: &RawInput) -> (JourneyState, Page) {
        match j.submit(step, raw, state).unwrap() {
            (next, Submission::Advanced(page)) => (next, page),
            (_, Submission::Rejected(errors)) => panic!("{step} rejected: {errors:?}"),
        }
    }

    /// Walk from start to the alive question.
    fn through_intro(j: &Journey<FixedClock>) -> JourneyState {
        let state = j.start();
        let (state, _) = advance(j, &state, StepId::Start, &RawInput::new());
        let (state, _) = advance(j, &state, StepId::HowWeProcessRequests, &RawInput::new());
        let (state, _) = advance(j, &state, StepId::BeforeYouStart, &one("ready_to_continue", "y"));
        let (state, _) = advance(j, &state, StepId::YouMayWantToCheckAncestry, &RawInput::new());
        state
    }

    /// Walk to the date of birth question as an army non-officer.
    fn to_date_of_birth(j: &Journey<FixedClock>) -> JourneyState {
        let state = through_intro(j);
        let (state, _) = advance(j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "no"));
        let (state, _) = advance(j, &state, StepId::ServiceBranch, &one("service_branch", "BRITISH_ARMY"));
        let (state, _) = advance(j, &state, StepId::WereTheyACommissionedOfficer, &one("were_they_a_commissioned_officer", "no"));
        let (state, page) = j.continue_request(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::WhatWasTheirDateOfBirth));
        state
    }

    #[test]
    fn start_stands_on_the_start_page() {
        let state = journey().start();
        assert_eq!(state.current_page(), Some(Page::Step(StepId::Start)));
        assert!(state.is_active());
        assert!(state.answers.is_empty());
    }

    #[test]
    fn invalid_submission_changes_nothing() {
        let j = journey();
        let state = through_intro(&j);

        let (after, submission) = j
            .submit(StepId::IsServicePersonAlive, &RawInput::new(), &state)
            .unwrap();

        let Submission::Rejected(errors) = submission else {
            panic!("expected rejection");
        };
        assert_eq!(errors.messages(), ["Tell us if the service person is alive"]);
        assert_eq!(after, state);
    }

    #[test]
    fn alive_answers_route_three_ways() {
        let j = journey();
        let state = through_intro(&j);
        let cases = [
            ("yes", Page::Outcome(Outcome::MustSubmitSubjectAccessRequest)),
            ("no", Page::Step(StepId::ServiceBranch)),
            ("dont_know", Page::Outcome(Outcome::OnlyLivingSubjectsCanRequestTheirRecord)),
        ];
        for (answer, expected) in cases {
            let (_, page) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", answer));
            assert_eq!(page, expected, "{answer}");
        }
    }

    #[test]
    fn branch_outcomes_for_navy_and_home_guard() {
        let j = journey();
        let state = through_intro(&j);
        let (state, _) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "no"));

        let (navy, page) = advance(&j, &state, StepId::ServiceBranch, &one("service_branch", "ROYAL_NAVY"));
        assert_eq!(page, Page::Outcome(Outcome::WeDoNotHaveRoyalNavyServiceRecords));
        assert!(matches!(
            j.continue_request(&navy).unwrap_err(),
            JourneyError::NotResumable(_)
        ));

        let (_, page) = advance(&j, &state, StepId::ServiceBranch, &one("service_branch", "HOME_GUARD"));
        assert_eq!(page, Page::Outcome(Outcome::WeAreUnlikelyToLocateThisRecord));
    }

    #[test]
    fn unstarted_journey_cannot_deep_link() {
        let j = journey();
        let empty = JourneyState::default();

        assert!(!j.is_reachable(Page::Step(StepId::WhatWasTheirDateOfBirth), &empty));
        assert!(j.is_reachable(Page::Step(StepId::Start), &empty));

        let err = j
            .submit(StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "1", "1", "1900"), &empty)
            .unwrap_err();
        assert!(matches!(err, JourneyError::Unreachable(Page::Step(StepId::WhatWasTheirDateOfBirth))));
    }

    #[test]
    fn officer_question_requires_a_branch() {
        let j = journey();
        let state = through_intro(&j);

        let err = j
            .submit(StepId::WereTheyACommissionedOfficer, &one("were_they_a_commissioned_officer", "yes"), &state)
            .unwrap_err();
        assert!(matches!(err, JourneyError::Unreachable(_)));
        // Unreachable is decided before validation.
        let err = j
            .submit(StepId::WereTheyACommissionedOfficer, &RawInput::new(), &state)
            .unwrap_err();
        assert!(matches!(err, JourneyError::Unreachable(_)));
    }

    #[test]
    fn outcomes_are_not_deep_linkable() {
        let j = journey();
        let state = through_intro(&j);
        let err = j
            .visit(Page::Outcome(Outcome::WeMayHoldThisRecord), &state)
            .unwrap_err();
        assert!(matches!(err, JourneyError::Unreachable(_)));
    }

    #[test]
    fn back_round_trip_keeps_prefill() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, page) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        assert_eq!(page, Page::Step(StepId::DoYouHaveAProofOfDeath));

        let (state, page) = j.back(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::WhatWasTheirDateOfBirth));
        assert_eq!(
            state.answers.step(StepId::WhatWasTheirDateOfBirth).and_then(|a| a.get("date_of_birth")),
            Some(&Answer::Date(date(1914, 6, 15)))
        );

        let (state, page) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        assert_eq!(page, Page::Step(StepId::DoYouHaveAProofOfDeath));
        assert_eq!(state.history.previous(), Some(Page::Step(StepId::WhatWasTheirDateOfBirth)));
    }

    #[test]
    fn back_from_an_outcome_returns_to_the_question() {
        let j = journey();
        let state = through_intro(&j);
        let (state, _) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "yes"));

        let (_, page) = j.back(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::IsServicePersonAlive));
    }

    #[test]
    fn back_after_a_branching_answer_restores_the_question() {
        let j = journey();
        let at_officer = {
            let state = through_intro(&j);
            let (state, _) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "no"));
            let (state, _) = advance(&j, &state, StepId::ServiceBranch, &one("service_branch", "BRITISH_ARMY"));
            state
        };
        let (at_proof, _) = advance(&j, &to_date_of_birth(&j), StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        let (at_details, _) = advance(&j, &to_date_of_birth(&j), StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "01", "01", "1890"));
        let (at_previous, _) = advance(&j, &at_details, StepId::ServicePersonDetails, &one("forenames", "Albert").text("last_name", "Smith"));
        let (at_order, _) = advance(&j, &at_previous, StepId::HaveYouPreviouslyMadeARequest, &one("have_you_previously_made_a_request", "no"));
        let (at_contact, _) = advance(&j, &at_order, StepId::ChooseYourOrderType, &one("processing_option", "standard"));

        let cases = [
            (
                &at_officer,
                StepId::WereTheyACommissionedOfficer,
                one("were_they_a_commissioned_officer", "no"),
                Page::Outcome(Outcome::WeMayHoldThisRecord),
                "were_they_a_commissioned_officer",
                "no",
            ),
            (
                &at_proof,
                StepId::DoYouHaveAProofOfDeath,
                one("do_you_have_a_proof_of_death", "yes"),
                Page::Step(StepId::UploadAProofOfDeath),
                "do_you_have_a_proof_of_death",
                "yes",
            ),
            (
                &at_proof,
                StepId::DoYouHaveAProofOfDeath,
                one("do_you_have_a_proof_of_death", "no"),
                Page::Step(StepId::AreYouSureYouWantToProceedWithoutProofOfDeath),
                "do_you_have_a_proof_of_death",
                "no",
            ),
            (
                &at_previous,
                StepId::HaveYouPreviouslyMadeARequest,
                one("have_you_previously_made_a_request", "no"),
                Page::Step(StepId::ChooseYourOrderType),
                "have_you_previously_made_a_request",
                "no",
            ),
            (
                &at_contact,
                StepId::YourContactDetails,
                one("requester_first_name", "Jo")
                    .text("requester_last_name", "Bloggs")
                    .text("requester_email", "jo@example.com"),
                Page::Step(StepId::YourOrderSummary),
                "requester_email",
                "jo@example.com",
            ),
        ];

        for (state, step, raw, destination, field, value) in cases {
            let (after, page) = advance(&j, state, step, &raw);
            assert_eq!(page, destination, "{step}");

            let (back, page) = j.back(&after).unwrap();
            assert_eq!(page, Page::Step(step), "{step}");
            assert_eq!(back.current_page(), Some(Page::Step(step)), "{step}");
            assert_eq!(back.answers.text(field), Some(value), "{step}");
        }
    }

    #[test]
    fn back_skips_pages_cut_off_by_a_changed_answer() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, _) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        let (state, _) = advance(&j, &state, StepId::DoYouHaveAProofOfDeath, &one("do_you_have_a_proof_of_death", "yes"));
        let certificate = RawInput::new().file(
            "proof_of_death",
            UploadedFile {
                filename: "death.jpg".into(),
                size_bytes: 1024,
                reference: None,
            },
        );
        let (state, _) = advance(&j, &state, StepId::UploadAProofOfDeath, &certificate);

        let state = j.visit(Page::Step(StepId::WhatWasTheirDateOfBirth), &state).unwrap();
        let (mut state, page) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "01", "01", "1890"));
        assert_eq!(page, Page::Step(StepId::ServicePersonDetails));
        assert!(!state.history.contains(Page::Step(StepId::DoYouHaveAProofOfDeath)));
        assert!(!state.history.contains(Page::Step(StepId::UploadAProofOfDeath)));

        for _ in 0..4 {
            let (next, page) = j.back(&state).unwrap();
            assert!(j.is_reachable(page, &next), "{page}");
            if let Page::Step(step) = page {
                assert!(j.submit(step, &RawInput::new(), &next).is_ok(), "{page}");
            }
            state = next;
        }
        assert_eq!(state.current_page(), Some(Page::Outcome(Outcome::WeMayHoldThisRecord)));
    }

    #[test]
    fn back_passes_over_pages_whose_guard_now_fails() {
        let j = journey();
        let mut state = to_date_of_birth(&j);
        state.history.record_visit(Page::Step(StepId::UploadAProofOfDeath));
        state.history.record_visit(Page::Step(StepId::ServicePersonDetails));

        let (next, page) = j.back(&state).unwrap();

        assert_eq!(page, Page::Step(StepId::WhatWasTheirDateOfBirth));
        assert_eq!(next.current_page(), Some(page));
    }

    #[test]
    fn back_refuses_outcomes_without_a_back_link() {
        let j = journey();
        let state = through_intro(&j);
        let (state, _) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "no"));
        let (state, _) = advance(&j, &state, StepId::ServiceBranch, &one("service_branch", "OTHER"));
        let (state, page) = advance(&j, &state, StepId::WereTheyACommissionedOfficer, &one("were_they_a_commissioned_officer", "yes"));
        assert_eq!(page, Page::Outcome(Outcome::WeAreUnlikelyToHoldOfficerRecordsGeneric));

        assert!(matches!(
            j.back(&state).unwrap_err(),
            JourneyError::NoBackLink(Page::Outcome(Outcome::WeAreUnlikelyToHoldOfficerRecordsGeneric))
        ));
        // The way forward stays open.
        let (_, page) = j.continue_request(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::WhatWasTheirDateOfBirth));
    }

    #[test]
    fn back_never_leaves_the_start_page() {
        let j = journey();
        let (state, page) = j.back(&j.start()).unwrap();
        assert_eq!(page, Page::Step(StepId::Start));
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn resubmitting_unchanged_answers_is_idempotent() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let raw = RawInput::new().date("date_of_birth", "15", "06", "1914");
        let (once, first) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &raw);
        let (twice, second) = advance(&j, &once, StepId::WhatWasTheirDateOfBirth, &raw);

        assert_eq!(first, second);
        assert_eq!(once.answers, twice.answers);
    }

    #[test]
    fn divergent_resubmission_clears_the_abandoned_branch() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, _) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        let (state, _) = advance(&j, &state, StepId::DoYouHaveAProofOfDeath, &one("do_you_have_a_proof_of_death", "no"));
        let (state, _) = advance(&j, &state, StepId::AreYouSureYouWantToProceedWithoutProofOfDeath, &one("proceed_without_proof_of_death", "yes"));
        let (state, _) = advance(&j, &state, StepId::ServicePersonDetails, &one("forenames", "Albert").text("last_name", "Smith"));

        let (state, page) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "01", "01", "1890"));

        assert_eq!(page, Page::Step(StepId::ServicePersonDetails));
        assert!(!state.answers.has_answered(StepId::DoYouHaveAProofOfDeath));
        assert!(!state.answers.has_answered(StepId::AreYouSureYouWantToProceedWithoutProofOfDeath));
        assert_eq!(state.answers.text("forenames"), Some("Albert"));
        assert!(!j.is_reachable(Page::Step(StepId::UploadAProofOfDeath), &state));
    }

    #[test]
    fn switching_to_the_navy_clears_everything_downstream() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, _) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "01", "01", "1890"));

        let (state, page) = advance(&j, &state, StepId::ServiceBranch, &one("service_branch", "ROYAL_NAVY"));

        assert_eq!(page, Page::Outcome(Outcome::WeDoNotHaveRoyalNavyServiceRecords));
        assert!(!state.answers.has_answered(StepId::WereTheyACommissionedOfficer));
        assert!(!state.answers.has_answered(StepId::WhatWasTheirDateOfBirth));
        assert!(state.answers.has_answered(StepId::IsServicePersonAlive));
    }

    #[test]
    fn exit_then_cancel_ends_the_journey() {
        let j = journey();
        let state = through_intro(&j);
        let (state, _) = advance(&j, &state, StepId::IsServicePersonAlive, &one("is_service_person_alive", "yes"));

        let (state, page) = j.exit(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::AreYouSureYouWantToCancel));

        let (state, page) = advance(&j, &state, StepId::AreYouSureYouWantToCancel, &RawInput::new());
        assert_eq!(page, Page::Outcome(Outcome::YouHaveCancelledYourRequest));
        assert!(matches!(
            state.status,
            JourneyStatus::Ended { outcome: Outcome::YouHaveCancelledYourRequest, .. }
        ));

        assert!(matches!(j.back(&state).unwrap_err(), JourneyError::Ended));
        assert!(matches!(j.exit(&state).unwrap_err(), JourneyError::Ended));
        assert!(matches!(
            j.submit(StepId::ServiceBranch, &one("service_branch", "OTHER"), &state).unwrap_err(),
            JourneyError::Ended
        ));
        assert!(j.is_reachable(Page::Outcome(Outcome::YouHaveCancelledYourRequest), &state));
    }

    #[test]
    fn start_after_an_ended_journey_begins_again() {
        let j = journey();
        let state = through_intro(&j);
        let (state, _) = j.exit(&state).unwrap();
        let (state, _) = advance(&j, &state, StepId::AreYouSureYouWantToCancel, &RawInput::new());

        let fresh = j.visit(Page::Step(StepId::Start), &state).unwrap();
        assert!(fresh.is_active());
        assert!(fresh.answers.is_empty());
    }

    #[test]
    fn upload_continues_with_or_without_a_file() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, _) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "15", "06", "1914"));
        let (state, page) = advance(&j, &state, StepId::DoYouHaveAProofOfDeath, &one("do_you_have_a_proof_of_death", "yes"));
        assert_eq!(page, Page::Step(StepId::UploadAProofOfDeath));

        let (_, page) = advance(&j, &state, StepId::UploadAProofOfDeath, &RawInput::new());
        assert_eq!(page, Page::Step(StepId::ServicePersonDetails));

        let too_big = RawInput::new().file(
            "proof_of_death",
            UploadedFile {
                filename: "death.png".into(),
                size_bytes: 5 * 1024 * 1024 + 1,
                reference: None,
            },
        );
        let (_, submission) = j.submit(StepId::UploadAProofOfDeath, &too_big, &state).unwrap();
        assert!(matches!(submission, Submission::Rejected(e) if e.messages() == ["The selected file must be smaller than 5MB"]));
    }

    #[test]
    fn no_email_detours_through_the_address() {
        let j = journey();
        let state = to_date_of_birth(&j);
        let (state, _) = advance(&j, &state, StepId::WhatWasTheirDateOfBirth, &RawInput::new().date("date_of_birth", "01", "01", "1890"));
        let (state, _) = advance(&j, &state, StepId::ServicePersonDetails, &one("forenames", "Albert").text("last_name", "Smith"));
        let (state, _) = advance(&j, &state, StepId::HaveYouPreviouslyMadeARequest, &one("have_you_previously_made_a_request", "no"));
        let (state, _) = advance(&j, &state, StepId::ChooseYourOrderType, &one("processing_option", "full"));
        let (state, page) = advance(
            &j,
            &state,
            StepId::YourContactDetails,
            &one("requester_first_name", "Jo").text("requester_last_name", "Bloggs").text("does_not_have_email", "on"),
        );
        assert_eq!(page, Page::Step(StepId::WhatIsYourAddress));

        let (state, page) = advance(
            &j,
            &state,
            StepId::WhatIsYourAddress,
            &one("requester_address1", "1 High Street")
                .text("requester_town_city", "Kew")
                .text("requester_postcode", "TW9 4DU")
                .text("requester_country", "United Kingdom"),
        );
        assert_eq!(page, Page::Step(StepId::YourOrderSummary));

        let summary = j.order_summary(&state).unwrap();
        assert_eq!(summary.formatted_price(), "£48.87");

        let (state, page) = j.back(&state).unwrap();
        assert_eq!(page, Page::Step(StepId::WhatIsYourAddress));
        assert_eq!(state.history.previous(), Some(Page::Step(StepId::YourContactDetails)));
    }
}
