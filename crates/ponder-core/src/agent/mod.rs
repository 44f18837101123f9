//! Cache-gated, bounded-iteration agent core
//!
//! A [`Controller`] owns a [`Router`] and drives a [`Workflow`] through the
//! phases in [`phase`]. Workflows reach language models through the
//! [`Responder`] trait.

pub mod controller;
pub mod outcome;
pub mod phase;
pub mod responder;
pub mod router;
pub mod state;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use outcome::{AnswerSource, RunOutcome};
pub use phase::{Phase, transition};
pub use responder::Responder;
pub use router::{Decision, FastPathMatcher, Router};
pub use state::{ConversationState, Lane, StateDecision, StateDelta};
pub use workflow::{FragmentSink, RunContext, Workflow};
