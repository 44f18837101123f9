//! Answer cache for Ponder
//!
//! A flat, persistent mapping from a normalized query to the final answer of
//! a previous run. The controller consults it exactly once when a run starts
//! and writes to it at most once when the run ends.
//!
//! ## Failure policy
//!
//! - `lookup` never fails: a missing key, a missing file and a corrupt file
//!   all read as a miss
//! - `store` may fail; callers log the failure and still deliver the answer
//!
//! How a raw query becomes a key is the caller's choice, see [`KeyPolicy`].

pub mod file;
pub mod key;
pub mod memory;
pub mod types;


pub use file::JsonFileCache;
pub use key::KeyPolicy;
pub use memory::MemoryCache;
pub use types::CacheStatistics;

use crate::error::PonderResult;
use async_trait::async_trait;

/// Key-value store of previously produced answers
#[async_trait]
pub trait AnswerCache: Send + Sync {
    /// Look up a previously stored answer; absence is not an error
    async fn lookup(&self, key: &str) -> Option<String>;

    /// Store an answer, silently replacing any previous value for the key
    async fn store(&self, key: &str, value: &str) -> PonderResult<()>;

    /// Hit/miss/write counters since this instance was created
    fn statistics(&self) -> CacheStatistics;
}
