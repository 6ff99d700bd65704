//! Data Transfer Objects for the backend status endpoints
//!
//! Field names follow the camelCase contract of the endpoints; snake_case
//! aliases are accepted because older backend builds emitted those.

pub mod agent;
pub mod report;
pub mod run;
pub mod workflow;
