//! The form behind each step.

use jiff::civil::date;

use crate::graph::EARLIEST_BIRTH_YEAR;
use crate::model::{
    OfficerStatus, PreviousRequest, ProcessingOption, ServiceBranch, StepId, YesNo,
    YesNoDontKnow, accepts,
};
use crate::revision::Revision;

use super::{COUNTRIES, DateBound, DateRules, FieldKind, FieldSpec, Form, Rule};

const SHORT: usize = 32;
const MEDIUM: usize = 64;
const LONG: usize = 128;
const EXTRA_LONG: usize = 256;

const EMAIL_FORMAT: &str = "Enter an email address in the correct format, like name@example.com";
const EMAIL_OR_NO_EMAIL: &str = "Enter an email address in the correct format like name@example.com, or select 'I do not have an email address'";
const EMAIL_MUST_BE_BLANK: &str =
    "Email must be blank if you have selected 'I do not have an email address'";
const BORN_TOO_EARLY: &str = "Date of birth must be after 31 December 1799. Records prior to this date are not contained in this collection.";

/// Build the form for `step` under `revision`.
pub fn form_for(step: StepId, revision: Revision) -> Form {
    match step {
        StepId::Start
        | StepId::HowWeProcessRequests
        | StepId::YouMayWantToCheckAncestry
        | StepId::YourOrderSummary
        | StepId::AreYouSureYouWantToCancel => Form::empty(),

        StepId::BeforeYouStart => Form::empty().with(
            FieldSpec::new(
                "ready_to_continue",
                "I can provide the mandatory information",
                FieldKind::Checkbox,
            )
            .rule(Rule::required(
                "You must confirm you can provide the mandatory information",
            )),
        ),

        StepId::IsServicePersonAlive => Form::empty().with(radio::<YesNoDontKnow>(
            "is_service_person_alive",
            "Is the service person alive?",
            "Tell us if the service person is alive",
        )),

        StepId::ServiceBranch => Form::empty().with(radio::<ServiceBranch>(
            "service_branch",
            "Which military branch did the person serve in?",
            "Select the branch they served in",
        )),

        StepId::WereTheyACommissionedOfficer => Form::empty().with(radio::<OfficerStatus>(
            "were_they_a_commissioned_officer",
            "Were they a commissioned officer?",
            "Tell us if the service person was a Commissioned Officer",
        )),

        StepId::WhatWasTheirDateOfBirth => Form::empty().with(FieldSpec::new(
            "date_of_birth",
            "What was their date of birth?",
            FieldKind::Date(DateRules {
                required: Some("Enter the service person's date of birth"),
                invalid: "What was their date of birth? must be a real date",
                bound: DateBound::Past {
                    message: "The date of birth must be in the past",
                },
                earliest: Some((date(EARLIEST_BIRTH_YEAR, 1, 1), BORN_TOO_EARLY)),
            }),
        )),

        StepId::DoYouHaveAProofOfDeath => Form::empty().with(radio::<YesNo>(
            "do_you_have_a_proof_of_death",
            "Do you have a proof of death?",
            "Tell us if you have a proof of death",
        )),

        StepId::AreYouSureYouWantToProceedWithoutProofOfDeath => {
            Form::empty().with(radio::<YesNo>(
                "proceed_without_proof_of_death",
                "Are you sure you want to proceed without a proof of death?",
                "Confirm if you want to continue without providing a proof of death",
            ))
        }

        StepId::UploadAProofOfDeath => Form::empty().with(FieldSpec::new(
            "proof_of_death",
            "Upload a proof of death",
            FieldKind::File(revision.upload_policy()),
        )),

        StepId::ServicePersonDetails => service_person_details(),

        StepId::HaveYouPreviouslyMadeARequest => Form::empty()
            .with(radio::<PreviousRequest>(
                "have_you_previously_made_a_request",
                "Have you previously made a request for this record?",
                "Tell us if you have previously made a request for this record",
            ))
            .with(
                FieldSpec::new(
                    "case_reference_number",
                    "Reference number",
                    FieldKind::Text,
                )
                .rule(Rule::RequiredWhenSelected {
                    radio: "have_you_previously_made_a_request",
                    values: &["yes_mod", "yes_tna"],
                    message: "Enter the reference number for your previous request".into(),
                })
                .rule(Rule::max_length("Reference number", MEDIUM)),
            ),

        StepId::ChooseYourOrderType => Form::empty().with(radio::<ProcessingOption>(
            "processing_option",
            "Choose your order type",
            "Select an order type",
        )),

        StepId::YourContactDetails => your_contact_details(),

        StepId::WhatIsYourAddress => what_is_your_address(),
    }
}

/// A required radio over the options of `C`.
fn radio<C: crate::model::Choice>(
    name: &'static str,
    label: &'static str,
    required: &'static str,
) -> FieldSpec {
    FieldSpec::new(
        name,
        label,
        FieldKind::Choice {
            accepts: accepts::<C>,
            invalid: required,
        },
    )
    .rule(Rule::required(required))
}

fn optional_text(name: &'static str, label: &'static str, max: usize) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Text).rule(Rule::max_length(label, max))
}

fn required_text(
    name: &'static str,
    label: &'static str,
    max: usize,
    required: &'static str,
) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Text)
        .rule(Rule::required(required))
        .rule(Rule::max_length(label, max))
}

fn service_person_details() -> Form {
    Form::empty()
        .with(required_text(
            "forenames",
            "First name",
            LONG,
            "The service person's first name is required",
        ))
        .with(required_text(
            "last_name",
            "Last name",
            LONG,
            "The service person's last name is required",
        ))
        .with(optional_text("other_last_names", "Other last names", LONG))
        .with(optional_text("service_number", "Service number", MEDIUM))
        .with(optional_text("regiment", "Regiment", LONG))
        .with(optional_text("place_of_birth", "Place of birth", LONG))
        .with(FieldSpec::new(
            "died_in_service",
            "Did they die in service?",
            FieldKind::Choice {
                accepts: accepts::<YesNoDontKnow>,
                invalid: "Tell us if they died in service",
            },
        ))
        .with(FieldSpec::new(
            "date_of_death",
            "Date of death",
            FieldKind::Date(DateRules {
                required: None,
                invalid: "Date of death must be a real date",
                bound: DateBound::PastOrToday {
                    message: "The date of death must be in the past",
                },
                earliest: None,
            }),
        ))
        .with(FieldSpec::new(
            "additional_information",
            "Additional information",
            FieldKind::Text,
        ))
}

fn your_contact_details() -> Form {
    Form::empty()
        .with(required_text(
            "requester_first_name",
            "Your first name",
            LONG,
            "Enter your first name",
        ))
        .with(required_text(
            "requester_last_name",
            "Your last name",
            LONG,
            "Enter your last name",
        ))
        .with(
            FieldSpec::new("requester_email", "Email address", FieldKind::Text)
                .rule(Rule::RequiredUnlessChecked {
                    checkbox: "does_not_have_email",
                    message: EMAIL_OR_NO_EMAIL.into(),
                })
                .rule(Rule::max_length("Email address", EXTRA_LONG))
                .rule(Rule::email(EMAIL_FORMAT))
                .rule(Rule::EmptyIfChecked {
                    checkbox: "does_not_have_email",
                    message: EMAIL_MUST_BE_BLANK.into(),
                }),
        )
        .with(FieldSpec::new(
            "does_not_have_email",
            "I do not have an email address",
            FieldKind::Checkbox,
        ))
}

fn what_is_your_address() -> Form {
    Form::empty()
        .with(required_text(
            "requester_address1",
            "Address line 1",
            EXTRA_LONG,
            "Enter address line 1, typically the building and street",
        ))
        .with(optional_text(
            "requester_address2",
            "Address line 2",
            EXTRA_LONG,
        ))
        .with(required_text(
            "requester_town_city",
            "Town or city",
            LONG,
            "Enter town or city",
        ))
        .with(optional_text("requester_county", "County", MEDIUM))
        .with(required_text(
            "requester_postcode",
            "Postcode",
            SHORT,
            "Enter postcode",
        ))
        .with(
            FieldSpec::new("requester_country", "Country", FieldKind::Text)
                .rule(Rule::required("Select a country from the list"))
                .rule(Rule::OneOf {
                    values: COUNTRIES,
                    message: "Select a country from the list".into(),
                }),
        )
}
