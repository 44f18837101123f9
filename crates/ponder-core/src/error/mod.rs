//! Error types for Ponder
//!
//! Every fallible operation in the core returns [`PonderResult`]. The
//! controller sorts errors into three buckets when a run goes wrong:
//! - cache errors are recovered locally and never reach the user
//! - responder and search errors end the current run as a failure
//! - malformed structured output is downgraded to an "insufficient" judgment

mod constructors;
mod conversions;
mod types;

pub use types::{PonderError, PonderResult};
