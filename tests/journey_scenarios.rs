//! End-to-end journeys through the public API, persisted between steps
//! the way a host would.

use jiff::Timestamp;
use jiff::civil::date;
use jiff::tz::TimeZone;
use tempfile::TempDir;

use service_record::clock::FixedClock;
use service_record::graph::StepGraph;
use service_record::journey::{Journey, JourneyError, Submission};
use service_record::model::{JourneyState, JourneyStatus, Outcome, Page, StepId};
use service_record::pricing::PriceTable;
use service_record::revision::Revision;
use service_record::storage::{
    DirectoryFileStore, FileStore, MemorySessionStore, Session, SessionStore, Storage,
};
use service_record::validate::{RawInput, RawValue, UploadedFile};

fn journey() -> Journey<FixedClock> {
    let now = date(2026, 3, 2)
        .at(10, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .unwrap();
    Journey::new(
        StepGraph::build(Revision::V2).unwrap(),
        PriceTable::default(),
        FixedClock::new(now),
    )
}

/// Submit, persist, reload: what one HTTP request would do.
fn submit_and_save(
    j: &Journey<FixedClock>,
    store: &impl SessionStore,
    session: &mut Session,
    step: StepId,
    raw: &RawInput,
) -> Page {
    let (state, submission) = j.submit(step, raw, &session.state).unwrap();
    let page = match submission {
        Submission::Advanced(page) => page,
        Submission::Rejected(errors) => panic!("{step} rejected: {errors:?}"),
    };
    session.state = state;
    session.updated_at = Timestamp::now();
    store.update_session(session).unwrap();
    *session = store.load_session(session.id).unwrap();
    page
}

fn text(field: &str, value: &str) -> RawInput {
    RawInput::new().text(field, value)
}

#[test]
fn army_request_with_proof_of_death_reaches_payment() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path().join("data")).unwrap();
    let files = DirectoryFileStore::new(storage.uploads_dir()).unwrap();
    let j = journey();

    let mut session = Session::new(j.start(), Timestamp::now());
    storage.create_session(&session).unwrap();

    let s = &mut session;
    assert_eq!(
        submit_and_save(&j, &storage, s, StepId::Start, &RawInput::new()),
        Page::Step(StepId::HowWeProcessRequests)
    );
    submit_and_save(&j, &storage, s, StepId::HowWeProcessRequests, &RawInput::new());
    submit_and_save(&j, &storage, s, StepId::BeforeYouStart, &text("ready_to_continue", "yes"));
    submit_and_save(&j, &storage, s, StepId::YouMayWantToCheckAncestry, &RawInput::new());
    assert_eq!(
        submit_and_save(&j, &storage, s, StepId::IsServicePersonAlive, &text("is_service_person_alive", "no")),
        Page::Step(StepId::ServiceBranch)
    );
    submit_and_save(&j, &storage, s, StepId::ServiceBranch, &text("service_branch", "BRITISH_ARMY"));
    assert_eq!(
        submit_and_save(
            &j,
            &storage,
            s,
            StepId::WereTheyACommissionedOfficer,
            &text("were_they_a_commissioned_officer", "no"),
        ),
        Page::Outcome(Outcome::WeMayHoldThisRecord)
    );

    let (state, page) = j.continue_request(&s.state).unwrap();
    assert_eq!(page, Page::Step(StepId::WhatWasTheirDateOfBirth));
    s.state = state;

    assert_eq!(
        submit_and_save(
            &j,
            &storage,
            s,
            StepId::WhatWasTheirDateOfBirth,
            &RawInput::new().date("date_of_birth", "15", "06", "1914"),
        ),
        Page::Step(StepId::DoYouHaveAProofOfDeath)
    );
    assert_eq!(
        submit_and_save(&j, &storage, s, StepId::DoYouHaveAProofOfDeath, &text("do_you_have_a_proof_of_death", "yes")),
        Page::Step(StepId::UploadAProofOfDeath)
    );

    // The host stores the bytes only once validation would accept them.
    let upload = UploadedFile {
        filename: "certificate.jpg".to_string(),
        size_bytes: 4 * 1024 * 1024,
        reference: None,
    };
    let mut raw = RawInput::new().file("proof_of_death", upload.clone());
    assert!(j.validate(StepId::UploadAProofOfDeath, &raw).unwrap().is_valid());
    let reference = files.store(&upload.filename, b"jpeg").unwrap();
    raw.insert(
        "proof_of_death",
        RawValue::File(UploadedFile {
            reference: Some(reference.clone()),
            ..upload
        }),
    );
    assert_eq!(
        submit_and_save(&j, &storage, s, StepId::UploadAProofOfDeath, &raw),
        Page::Step(StepId::ServicePersonDetails)
    );
    let stored = s.state.answers.file("proof_of_death").unwrap();
    assert_eq!(stored.reference.as_deref(), Some(reference.as_str()));
    assert_eq!(files.load(&reference).unwrap(), b"jpeg");

    submit_and_save(
        &j,
        &storage,
        s,
        StepId::ServicePersonDetails,
        &text("forenames", "Thomas").text("last_name", "Atkins"),
    );
    submit_and_save(
        &j,
        &storage,
        s,
        StepId::HaveYouPreviouslyMadeARequest,
        &text("have_you_previously_made_a_request", "no"),
    );
    submit_and_save(&j, &storage, s, StepId::ChooseYourOrderType, &text("processing_option", "standard"));
    assert_eq!(
        submit_and_save(
            &j,
            &storage,
            s,
            StepId::YourContactDetails,
            &text("requester_first_name", "Jo")
                .text("requester_last_name", "Bloggs")
                .text("requester_email", "jo@example.com"),
        ),
        Page::Step(StepId::YourOrderSummary)
    );

    let summary = j.order_summary(&s.state).unwrap();
    assert_eq!(summary.processing_option_label(), "Standard");
    assert_eq!(summary.formatted_price(), "£42.25");

    assert_eq!(
        submit_and_save(&j, &storage, s, StepId::YourOrderSummary, &RawInput::new()),
        Page::Outcome(Outcome::ProceedToPayment)
    );
    assert!(matches!(
        s.state.status,
        JourneyStatus::Ended {
            outcome: Outcome::ProceedToPayment,
            ..
        }
    ));

    // A finished journey accepts nothing further.
    assert!(matches!(
        j.submit(StepId::ChooseYourOrderType, &text("processing_option", "full"), &s.state)
            .unwrap_err(),
        JourneyError::Ended
    ));
}

#[test]
fn cancelling_ends_the_journey_and_start_begins_again() {
    let store = MemorySessionStore::new();
    let j = journey();

    let mut session = Session::new(j.start(), Timestamp::now());
    store.create_session(&session).unwrap();
    let s = &mut session;

    submit_and_save(&j, &store, s, StepId::Start, &RawInput::new());
    submit_and_save(&j, &store, s, StepId::HowWeProcessRequests, &RawInput::new());

    let (state, page) = j.exit(&s.state).unwrap();
    assert_eq!(page, Page::Step(StepId::AreYouSureYouWantToCancel));
    s.state = state;
    assert_eq!(
        submit_and_save(&j, &store, s, StepId::AreYouSureYouWantToCancel, &RawInput::new()),
        Page::Outcome(Outcome::YouHaveCancelledYourRequest)
    );
    assert!(!s.state.is_active());
    assert!(matches!(j.back(&s.state).unwrap_err(), JourneyError::Ended));

    let fresh = j.visit(Page::Step(StepId::Start), &s.state).unwrap();
    assert!(fresh.is_active());
    assert!(fresh.answers.is_empty());
    assert_eq!(fresh.current_page(), Some(Page::Step(StepId::Start)));
}

#[test]
fn rejected_submissions_are_not_persisted() {
    let store = MemorySessionStore::new();
    let j = journey();
    let session = Session::new(j.start(), Timestamp::now());
    store.create_session(&session).unwrap();

    let (state, submission) = j
        .submit(StepId::Start, &RawInput::new(), &session.state)
        .unwrap();
    assert!(matches!(submission, Submission::Advanced(_)));

    let (after, submission) = j
        .submit(StepId::BeforeYouStart, &RawInput::new(), &state)
        .unwrap();
    let Submission::Rejected(errors) = submission else {
        panic!("expected rejection");
    };
    assert_eq!(errors.number_of_errors(), 1);
    assert_eq!(after, state);
    assert_eq!(store.load_session(session.id).unwrap().state, session.state);
}

#[test]
fn empty_state_only_allows_the_start_page() {
    let j = journey();
    let empty = JourneyState::default();

    for page in StepId::ALL.into_iter().map(Page::Step) {
        assert_eq!(
            j.is_reachable(page, &empty),
            page == Page::Step(StepId::Start),
            "{page}"
        );
    }
}
