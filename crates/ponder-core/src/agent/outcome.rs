//! Run outcome types

use crate::error::PonderError;
use serde::{Deserialize, Serialize};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnswerSource {
    Cache,
    Fast,
    Expert,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::Cache => write!(f, "CACHE"),
            AnswerSource::Fast => write!(f, "FAST"),
            AnswerSource::Expert => write!(f, "EXPERT"),
        }
    }
}

/// Explicit outcome of a run.
///
/// A run never returns `Err`; step failures are captured here together with
/// the number of attempts made before the failure.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The run produced an answer
    Answered {
        answer: String,
        source: AnswerSource,
        attempts: u32,
        /// Normalized cache key of the query
        key: String,
    },

    /// A step failed; the cache was left untouched
    Failed { error: PonderError, attempts: u32 },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answered { answer, .. } => Some(answer),
            Self::Failed { .. } => None,
        }
    }

    pub fn source(&self) -> Option<AnswerSource> {
        match self {
            Self::Answered { source, .. } => Some(*source),
            Self::Failed { .. } => None,
        }
    }

    /// Act steps performed, regardless of outcome
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Answered { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn error(&self) -> Option<&PonderError> {
        match self {
            Self::Answered { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Convert into a `Result` with the answer text
    pub fn into_result(self) -> Result<String, PonderError> {
        match self {
            Self::Answered { answer, .. } => Ok(answer),
            Self::Failed { error, .. } => Err(error),
        }
    }
}
