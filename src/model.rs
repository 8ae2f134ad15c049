//! Core data model for the journey engine.
//!
//! Steps and outcomes are the nodes users land on, answers are what they
//! submitted, history is where they have been.

mod answer;
mod choice;
mod history;
mod journey;
mod outcome;
mod step;

pub use answer::{Answer, AnswerStore, FileMetadata, StepAnswers};
pub use choice::{
    Choice, OfficerStatus, PreviousRequest, ProcessingOption, ServiceBranch, YesNo,
    YesNoDontKnow, accepts,
};
pub use history::NavigationHistory;
pub use journey::{JourneyState, JourneyStatus};
pub use outcome::{Outcome, Page};
pub use step::StepId;
