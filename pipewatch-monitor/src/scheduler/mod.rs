//! Scheduler layer for the monitor
//!
//! This layer decides when sources are fetched. Each poller owns one source,
//! a timer, and the bookkeeping that keeps at most one fetch in flight.

pub mod poller;

pub use poller::Poller;
