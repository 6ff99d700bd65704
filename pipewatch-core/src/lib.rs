//! Pipewatch Core
//!
//! Core types shared by the pipewatch crates.
//!
//! This crate contains:
//! - Domain types: pipeline definitions, steps, executions and sub-feed state
//! - DTOs: wire shapes of the backend status endpoints

pub mod domain;
pub mod dto;
pub mod error;

pub use error::DefinitionError;
