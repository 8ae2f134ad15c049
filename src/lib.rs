//! A multi-step form journey for requesting a military service record.
//!
//! The journey is a verified graph of form steps ([`graph`]). Each step
//! validates its own input ([`validate`]) and routes on the answers
//! collected so far. The [`journey`] orchestrator threads one user's
//! [`model::JourneyState`] through that graph; [`storage`] keeps it
//! between requests.

pub mod cli;
pub mod clock;
pub mod config;
pub mod graph;
pub mod journey;
pub mod logging;
pub mod model;
pub mod pricing;
pub mod revision;
pub mod storage;
pub mod validate;
