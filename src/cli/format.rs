//! Output formatting for CLI display.

use crate::clock::Clock;
use crate::graph::{Reachability, StepGraph};
use crate::journey::Journey;
use crate::model::{Answer, AnswerStore, Choice, JourneyState, JourneyStatus, Page, ServiceBranch, StepId};
use crate::pricing::OrderSummary;
use crate::storage::Session;
use crate::validate::FieldErrors;

/// Describe `page` as the user would see it: heading, prefilled answers,
/// errors, and the links it offers.
pub(super) fn describe_page<C: Clock>(
    journey: &Journey<C>,
    state: &JourneyState,
    page: Page,
    errors: Option<&FieldErrors>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", page.heading()));
    out.push_str(&format!("  page: /{page}\n"));

    if let Some(errors) = errors.filter(|e| !e.is_empty()) {
        out.push_str(&format!("  there is a problem ({}):\n", errors.number_of_errors()));
        for error in errors.iter() {
            out.push_str(&format!("    - {}: {}\n", error.field, error.message));
        }
    }

    match page {
        Page::Step(step) => {
            if let Ok(node) = journey.graph().node(step) {
                let answers = state.answers.step(step);
                for field in &node.form.fields {
                    let value = answers
                        .and_then(|a| a.get(field.name))
                        .map(Answer::display)
                        .unwrap_or_default();
                    out.push_str(&format!("  {} [{}]: {value}\n", field.label, field.name));
                }
            }
            if let Some(previous) = state.history.previous().filter(|_| step != StepId::Start) {
                out.push_str(&format!("  back: /{previous}\n"));
            }
        }
        Page::Outcome(outcome) => {
            out.push_str(&format!("  template: {}\n", outcome.template_id()));
            if let Some(previous) = state.history.previous().filter(|_| outcome.has_back_link()) {
                out.push_str(&format!("  back: /{previous}\n"));
            }
            if let Some(resume) = outcome.resumes_at() {
                out.push_str(&format!("  continue: /{resume}\n"));
            }
            if outcome.offers_exit() {
                out.push_str(&format!("  exit: /{}\n", StepId::AreYouSureYouWantToCancel));
            }
        }
    }

    if let JourneyStatus::Ended { ended_at, .. } = &state.status {
        out.push_str(&format!("  journey ended at {ended_at}\n"));
    }

    out
}

pub(super) fn format_summary(summary: &OrderSummary, answers: &AnswerStore) -> String {
    let mut out = String::from("Your order summary\n");

    let name = [answers.text("forenames"), answers.text("last_name")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if !name.is_empty() {
        out.push_str(&format!("  Service person: {name}\n"));
    }
    if let Some(branch) = answers.choice::<ServiceBranch>("service_branch") {
        out.push_str(&format!("  Service branch: {}\n", branch.label()));
    }
    out.push_str(&format!("  Order type: {}\n", summary.processing_option_label()));
    out.push_str(&format!("  Delivery: {}\n", summary.delivery.label()));
    out.push_str(&format!("  Price: {}\n", summary.formatted_price()));
    out
}

/// One line per session for `sessions list`.
pub(super) fn format_session_line(session: &Session) -> String {
    let short_id = &session.id.to_string()[..8];
    let status = match &session.state.status {
        JourneyStatus::Active => "active".to_string(),
        JourneyStatus::Ended { outcome, .. } => format!("ended: {}", outcome.template_id()),
    };
    let page = session
        .state
        .current_page()
        .map_or_else(|| "-".to_string(), |p| format!("/{p}"));
    format!(
        "{short_id}  [{status}]  updated {}  {page}",
        session.updated_at
    )
}

/// Every step with its guard and the pages it may lead to.
pub(super) fn format_graph(graph: &StepGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("revision {}\n", graph.revision()));
    for node in graph.nodes() {
        let guard = match node.guard {
            Reachability::Always => "always".to_string(),
            Reachability::AfterStart => "after start".to_string(),
            Reachability::RequiresAnswer(field) => format!("requires {field}"),
        };
        out.push_str(&format!("/{}  [{guard}]\n", node.step));
        let targets = node
            .transition
            .targets()
            .iter()
            .map(|p| format!("/{p}"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("  → {targets}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::clock::SystemClock;
    use crate::model::{Outcome, ProcessingOption, StepAnswers};
    use crate::pricing::{DeliveryChannel, PriceTable};
    use crate::revision::Revision;

    fn journey() -> Journey<SystemClock> {
        Journey::new(
            StepGraph::build(Revision::V2).unwrap(),
            PriceTable::default(),
            SystemClock,
        )
    }

    #[test]
    fn step_page_shows_prefill_and_back_link() {
        let j = journey();
        let mut state = j.start();
        state.history.record_visit(Page::Step(StepId::HowWeProcessRequests));
        state.answers.replace_step(
            StepId::HowWeProcessRequests,
            StepAnswers::from([("ready_to_continue".to_string(), Answer::Flag(true))]),
        );

        let text = describe_page(&j, &state, Page::Step(StepId::HowWeProcessRequests), None);

        assert!(text.contains("page: /how-we-process-requests"));
        assert!(text.contains("[ready_to_continue]: yes"));
        assert!(text.contains("back: /start"));
    }

    #[test]
    fn outcome_page_shows_template_and_links() {
        let j = journey();
        let mut state = j.start();
        state.history.record_visit(Page::Outcome(Outcome::WeMayHoldThisRecord));

        let text = describe_page(&j, &state, Page::Outcome(Outcome::WeMayHoldThisRecord), None);

        assert!(text.contains(&format!("template: {}", Outcome::WeMayHoldThisRecord.template_id())));
        assert!(text.contains("continue: /what-was-their-date-of-birth"));
    }

    #[test]
    fn summary_lists_price_and_delivery() {
        let summary = OrderSummary {
            processing_option: ProcessingOption::Standard,
            delivery: DeliveryChannel::Email,
            price_pence: 4225,
        };
        let mut answers = AnswerStore::new();
        answers.replace_step(
            StepId::ServicePersonDetails,
            StepAnswers::from([
                ("forenames".to_string(), Answer::Text("Thomas".into())),
                ("last_name".to_string(), Answer::Text("Atkins".into())),
            ]),
        );

        let text = format_summary(&summary, &answers);

        assert!(text.contains("Service person: Thomas Atkins"));
        assert!(text.contains("Order type: Standard"));
        assert!(text.contains("Price: £42.25"));
    }

    #[test]
    fn session_line_uses_short_id() {
        let j = journey();
        let session = Session::new(j.start(), Timestamp::now());

        let line = format_session_line(&session);

        assert!(line.starts_with(&session.id.to_string()[..8]));
        assert!(line.contains("[active]"));
        assert!(line.ends_with("/start"));
    }

    #[test]
    fn graph_lists_every_step() {
        let j = journey();
        let text = format_graph(j.graph());

        for step in StepId::ALL {
            assert!(text.contains(&format!("/{step}  [")), "missing {step}");
        }
    }
}
