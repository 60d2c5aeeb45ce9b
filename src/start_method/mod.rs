//! Worker start method selection.
//!
//! Forking after a native accelerator driver has created device contexts,
//! locks or threads duplicates that state into the child, where it can
//! deadlock or crash. This module decides whether workers may be forked or
//! must be spawned, and records a forced decision so every worker created by
//! the process observes the same value.

mod context;
mod method;
mod selector;
mod startup;

pub use context::WorkerContext;
pub use method::StartMethod;
pub use selector::{Decision, Reason, parse_override, select};
pub use startup::ProcessStartupConfig;
