//! Core domain types
//!
//! These types represent the client-side view of one pipeline run. They are
//! produced by the reconciler in `pipewatch-monitor` and read by observers.

pub mod definition;
pub mod execution;
pub mod source;
pub mod step;
pub mod subfeed;
