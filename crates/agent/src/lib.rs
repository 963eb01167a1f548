//! The memory-agent call loop.
//!
//! One user message becomes a *turn*:
//!
//! 1. **Wrap** the input as a `user_message` envelope in the turn scratch
//! 2. **Call the model** with the system prompt (preamble + core memory),
//!    committed history, scratch, and the function schemas
//! 3. **On a function call**: dispatch it, append call and result to the
//!    scratch, loop back to step 2
//! 4. **On plain text**: accept it if `send_message` ran this turn and
//!    commit the scratch; otherwise retry with a reminder
//!
//! Transport failures and unaddressed answers share one retry budget. A
//! failed round-trip is re-issued from where the turn stands, so function
//! calls that already ran are never replayed.

pub mod boot;
pub mod loop_runner;
pub mod outcome;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use loop_runner::{FAILURE_NOTICE, MemoryAgent};
pub use outcome::{TurnError, TurnFailure, TurnOutcome};
pub use shared::SharedAgent;
