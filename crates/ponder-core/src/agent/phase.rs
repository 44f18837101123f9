//! Controller phases and the transition table

use super::router::Decision;
use serde::{Deserialize, Serialize};

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    CheckCache,
    CacheHit,
    Route,
    Act,
    Evaluate,
    Finalize,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::CacheHit | Phase::Done | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::CheckCache => "check_cache",
            Phase::CacheHit => "cache_hit",
            Phase::Route => "route",
            Phase::Act => "act",
            Phase::Evaluate => "evaluate",
            Phase::Finalize => "finalize",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Next phase after `phase` completes, given the router's decision
///
/// Terminal phases map to themselves. `Failed` is entered on step errors,
/// never through this table.
pub fn transition(phase: Phase, decision: Decision) -> Phase {
    use Decision::*;

    match (phase, decision) {
        (Phase::Init, _) => Phase::CheckCache,

        (Phase::CheckCache, AnswerFromCache) => Phase::CacheHit,
        (Phase::CheckCache, _) => Phase::Route,

        (Phase::Route, AnswerFromCache) => Phase::CacheHit,
        (Phase::Route, Terminate) => Phase::Finalize,
        (Phase::Route, FastPath | ExpertPath | Continue) => Phase::Act,

        (Phase::Act, _) => Phase::Evaluate,

        (Phase::Evaluate, AnswerFromCache) => Phase::CacheHit,
        (Phase::Evaluate, Continue | ExpertPath) => Phase::Act,
        (Phase::Evaluate, Terminate | FastPath) => Phase::Finalize,

        (Phase::Finalize, _) => Phase::Done,

        (terminal @ (Phase::CacheHit | Phase::Done | Phase::Failed), _) => terminal,
    }
}
