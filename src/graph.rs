//! The step graph: every form page, its form, where it may lead, and who may
//! land on it.
//!
//! The graph is built once per [`Revision`] and verified before use, so a
//! transition that points at a page with no node, or a field name shared by
//! two steps, fails at startup rather than mid-journey.

mod transitions;

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use jiff::civil::Date;

use crate::journey::JourneyError;
use crate::model::{AnswerStore, Outcome, Page, StepId};
use crate::revision::Revision;
use crate::validate::{Form, RawInput, ValidationResult, form_for};

pub use transitions::{
    EARLIEST_BIRTH_YEAR, LATEST_BIRTH_YEAR, RECORD_CLOSURE_YEARS, RouteContext, officer_outcome,
};

/// Who may land on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// Anyone, even without a journey.
    Always,
    /// Any started journey.
    AfterStart,
    /// A started journey that has answered `field`.
    RequiresAnswer(&'static str),
}

type Decide = fn(&AnswerStore, &RouteContext) -> Option<Page>;

/// How a step picks the next page.
#[derive(Debug, Clone, Copy)]
pub enum Transition {
    /// Always the same page.
    Fixed(Page),
    /// One of `targets`, chosen by `decide`.
    Branch {
        targets: &'static [Page],
        decide: Decide,
    },
}

impl Transition {
    /// Every page this transition may produce.
    pub fn targets(&self) -> &[Page] {
        match self {
            Self::Fixed(page) => std::slice::from_ref(page),
            Self::Branch { targets, .. } => targets,
        }
    }
}

/// One step of the graph.
#[derive(Debug, Clone)]
pub struct StepNode {
    pub step: StepId,
    pub form: Form,
    pub guard: Reachability,
    pub transition: Transition,
}

/// The verified, immutable step graph for one revision.
#[derive(Debug, Clone)]
pub struct StepGraph {
    revision: Revision,
    nodes: BTreeMap<StepId, StepNode>,
}

impl StepGraph {
    /// Build and verify the graph for `revision`.
    pub fn build(revision: Revision) -> Result<Self, JourneyError> {
        let nodes = StepId::ALL
            .into_iter()
            .map(|step| (step, node_for(step, revision)))
            .collect();
        Self::from_nodes(revision, nodes)
    }

    /// Verify a hand-assembled node set.
    pub fn from_nodes(
        revision: Revision,
        nodes: BTreeMap<StepId, StepNode>,
    ) -> Result<Self, JourneyError> {
        let graph = Self { revision, nodes };
        graph.verify()?;
        Ok(graph)
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn node(&self, step: StepId) -> Result<&StepNode, JourneyError> {
        self.nodes
            .get(&step)
            .ok_or_else(|| JourneyError::Configuration(format!("no node for step '{step}'")))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StepNode> {
        self.nodes.values()
    }

    /// Validate raw input for `step`.
    pub fn validate(
        &self,
        step: StepId,
        raw: &RawInput,
        today: Date,
    ) -> Result<ValidationResult, JourneyError> {
        Ok(self.node(step)?.form.validate(raw, today))
    }

    /// Decide where `step` leads given `answers`.
    ///
    /// Deterministic: the same step, answers and date always give the same
    /// page. A result outside the step's declared targets is a
    /// configuration error.
    pub fn route(
        &self,
        step: StepId,
        answers: &AnswerStore,
        ctx: &RouteContext,
    ) -> Result<Page, JourneyError> {
        let node = self.node(step)?;
        let page = match node.transition {
            Transition::Fixed(page) => page,
            Transition::Branch { decide, .. } => decide(answers, ctx).ok_or_else(|| {
                JourneyError::Configuration(format!(
                    "step '{step}' cannot route: a required answer is missing"
                ))
            })?,
        };
        if !node.transition.targets().contains(&page) {
            return Err(JourneyError::Configuration(format!(
                "step '{step}' routed to undeclared target '{page}'"
            )));
        }
        if let Page::Step(next) = page {
            self.node(next)?;
        }
        Ok(page)
    }

    /// Steps statically reachable from `page` by following declared
    /// targets and "continue this request" links.
    ///
    /// The exit action is not followed; `page` itself is included when it
    /// is a step.
    pub fn reachable_from(&self, page: Page) -> BTreeSet<StepId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([page]);
        while let Some(page) = queue.pop_front() {
            let step = match page {
                Page::Step(step) => step,
                Page::Outcome(outcome) => match outcome.resumes_at() {
                    Some(step) => step,
                    None => continue,
                },
            };
            if !seen.insert(step) {
                continue;
            }
            if let Some(node) = self.nodes.get(&step) {
                queue.extend(node.transition.targets().iter().copied());
            }
        }
        seen
    }

    /// Static checks run at build time.
    fn verify(&self) -> Result<(), JourneyError> {
        let fail = |msg: String| Err(JourneyError::Configuration(msg));

        if !self.nodes.contains_key(&StepId::Start) {
            return fail("graph has no start step".into());
        }

        let mut field_owner: HashMap<&str, StepId> = HashMap::new();
        for (key, node) in &self.nodes {
            if *key != node.step {
                return fail(format!("node for '{}' is filed under '{key}'", node.step));
            }
            for target in node.transition.targets() {
                let missing = match target {
                    Page::Step(step) => Some(*step),
                    Page::Outcome(outcome) => outcome.resumes_at(),
                }
                .filter(|step| !self.nodes.contains_key(step));
                if let Some(step) = missing {
                    return fail(format!(
                        "step '{}' leads to '{step}', which has no node",
                        node.step
                    ));
                }
            }
            for field in node.form.field_names() {
                if let Some(other) = field_owner.insert(field, node.step) {
                    return fail(format!(
                        "field '{field}' is declared by both '{other}' and '{}'",
                        node.step
                    ));
                }
            }
            if let Reachability::RequiresAnswer(field) = node.guard {
                if !self.nodes.values().any(|n| n.form.field_names().any(|f| f == field)) {
                    return fail(format!(
                        "step '{}' is guarded by unknown field '{field}'",
                        node.step
                    ));
                }
            }
        }

        let mut reachable = self.reachable_from(Page::Step(StepId::Start));
        // Exit leads to the cancel confirmation from anywhere in the journey.
        reachable.insert(StepId::AreYouSureYouWantToCancel);
        if let Some(orphan) = self.nodes.keys().find(|s| !reachable.contains(s)) {
            return fail(format!("step '{orphan}' is unreachable from start"));
        }

        let routed: BTreeSet<Outcome> = self
            .nodes
            .values()
            .flat_map(|n| n.transition.targets())
            .filter_map(|p| match p {
                Page::Outcome(o) => Some(*o),
                Page::Step(_) => None,
            })
            .collect();
        if let Some(orphan) = Outcome::ALL.iter().find(|o| !routed.contains(o)) {
            return fail(format!("outcome '{}' is never routed to", orphan.path()));
        }

        Ok(())
    }
}

fn node_for(step: StepId, revision: Revision) -> StepNode {
    use transitions as t;

    let fixed = |next: StepId| Transition::Fixed(Page::Step(next));
    let branch = |targets, decide| Transition::Branch { targets, decide };

    let (guard, transition) = match step {
        StepId::Start => (Reachability::Always, fixed(StepId::HowWeProcessRequests)),
        StepId::HowWeProcessRequests => (Reachability::AfterStart, fixed(StepId::BeforeYouStart)),
        StepId::BeforeYouStart => (
            Reachability::AfterStart,
            fixed(StepId::YouMayWantToCheckAncestry),
        ),
        StepId::YouMayWantToCheckAncestry => {
            (Reachability::AfterStart, fixed(StepId::IsServicePersonAlive))
        }
        StepId::IsServicePersonAlive => (
            Reachability::AfterStart,
            branch(t::ALIVE_TARGETS, t::after_is_alive as Decide),
        ),
        StepId::ServiceBranch => (
            Reachability::AfterStart,
            branch(t::BRANCH_TARGETS, t::after_service_branch as Decide),
        ),
        StepId::WereTheyACommissionedOfficer => (
            Reachability::RequiresAnswer("service_branch"),
            branch(t::OFFICER_TARGETS, t::after_officer as Decide),
        ),
        StepId::WhatWasTheirDateOfBirth => (
            Reachability::AfterStart,
            branch(t::BIRTH_TARGETS, t::after_date_of_birth as Decide),
        ),
        StepId::DoYouHaveAProofOfDeath => (
            Reachability::AfterStart,
            branch(t::PROOF_TARGETS, t::after_proof_of_death as Decide),
        ),
        StepId::AreYouSureYouWantToProceedWithoutProofOfDeath => (
            Reachability::RequiresAnswer("do_you_have_a_proof_of_death"),
            branch(
                t::PROCEED_WITHOUT_PROOF_TARGETS,
                t::after_proceed_without_proof as Decide,
            ),
        ),
        StepId::UploadAProofOfDeath => (
            Reachability::RequiresAnswer("do_you_have_a_proof_of_death"),
            fixed(StepId::ServicePersonDetails),
        ),
        StepId::ServicePersonDetails => (
            Reachability::AfterStart,
            fixed(StepId::HaveYouPreviouslyMadeARequest),
        ),
        StepId::HaveYouPreviouslyMadeARequest => {
            (Reachability::AfterStart, fixed(StepId::ChooseYourOrderType))
        }
        StepId::ChooseYourOrderType => (Reachability::AfterStart, fixed(StepId::YourContactDetails)),
        StepId::YourContactDetails => (
            Reachability::AfterStart,
            branch(t::CONTACT_TARGETS, t::after_contact_details as Decide),
        ),
        StepId::WhatIsYourAddress => (Reachability::AfterStart, fixed(StepId::YourOrderSummary)),
        StepId::YourOrderSummary => (
            Reachability::RequiresAnswer("processing_option"),
            Transition::Fixed(Page::Outcome(Outcome::ProceedToPayment)),
        ),
        StepId::AreYouSureYouWantToCancel => (
            Reachability::AfterStart,
            Transition::Fixed(Page::Outcome(Outcome::YouHaveCancelledYourRequest)),
        ),
    };

    StepNode {
        step,
        form: form_for(step, revision),
        guard,
        transition,
    }
}
