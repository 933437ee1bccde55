//! High-level operations.
//!
//! Planning turns a request into an ordered list of actions; dispatch runs
//! them. The remaining modules are the post-build actions.

pub mod addr2line;
pub mod dispatch;
pub mod plan;
pub mod run;

pub use dispatch::{dispatch, preview, Dispatcher};
pub use plan::{plan, Action, ActionPlan};
