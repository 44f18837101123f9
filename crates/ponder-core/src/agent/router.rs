//! Routing policy
//!
//! The router turns a state into a [`Decision`]. It is pure: the same state
//! always yields the same decision, and it never performs I/O.

use super::state::{ConversationState, StateDecision};
use serde::{Deserialize, Serialize};

/// Outcome of a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    AnswerFromCache,
    FastPath,
    ExpertPath,
    Continue,
    Terminate,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Decision::AnswerFromCache => "answer_from_cache",
            Decision::FastPath => "fast_path",
            Decision::ExpertPath => "expert_path",
            Decision::Continue => "continue",
            Decision::Terminate => "terminate",
        };
        write!(f, "{}", name)
    }
}

/// Matches queries that may skip the expert loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastPathMatcher {
    keywords: Vec<String>,
}

impl FastPathMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }

    /// True when the query contains any keyword
    pub fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|k| query.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Routing policy with an attempt cap and an optional fast path
#[derive(Debug, Clone)]
pub struct Router {
    cap: u32,
    fast_path: Option<FastPathMatcher>,
}

impl Router {
    /// Router with the given attempt cap (at least 1) and no fast path
    pub fn new(cap: u32) -> Self {
        Self {
            cap: cap.max(1),
            fast_path: None,
        }
    }

    pub fn with_fast_path(mut self, matcher: FastPathMatcher) -> Self {
        self.fast_path = Some(matcher);
        self
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn has_fast_path(&self) -> bool {
        self.fast_path.is_some()
    }

    /// Decide what happens next for this state
    pub fn decide(&self, state: &ConversationState) -> Decision {
        if state.decision() == StateDecision::CacheHit {
            return Decision::AnswerFromCache;
        }

        if self
            .fast_path
            .as_ref()
            .is_some_and(|m| m.matches(state.query()))
        {
            return Decision::FastPath;
        }

        if state.decision() == StateDecision::Sufficient {
            return Decision::Terminate;
        }

        if state.attempt_count() >= self.cap {
            return Decision::Terminate;
        }

        if state.attempt_count() == 0 {
            return Decision::ExpertPath;
        }

        Decision::Continue
    }
}
