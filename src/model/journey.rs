//! Journey state: everything a session store needs to persist.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{AnswerStore, NavigationHistory, Outcome, Page};

/// One user's progress through the journey.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyState {
    pub answers: AnswerStore,
    pub history: NavigationHistory,
    pub status: JourneyStatus,
}

impl JourneyState {
    /// A journey exists once the start page has been recorded.
    pub fn has_started(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, JourneyStatus::Active)
    }

    pub fn current_page(&self) -> Option<Page> {
        self.history.current()
    }
}

/// Where a journey stands in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JourneyStatus {
    /// The user can still move through the form.
    #[default]
    Active,

    /// Cancelled or handed off to payment.
    Ended {
        ended_at: Timestamp,
        outcome: Outcome,
    },
}
