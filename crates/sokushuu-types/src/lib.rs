//! Shared type definitions for the Sokushuu landing page.
//!
//! This crate is the single source of truth for every payload that crosses
//! the HTTP boundary between the landing API and the frontend. Types flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`statistics`] -- Launch date and waiting list responses with their
//!   [`DataSource`] discriminator
//! - [`waitlist`] -- Subscribe request/response and validation outcome
//! - [`learning`] -- Lessons, questions, and the learning flow state

pub mod learning;
pub mod statistics;
pub mod waitlist;

// Re-export all public types at crate root for convenience.
pub use learning::{LearningState, Lesson, Question};
pub use statistics::{DataSource, LaunchDateResponse, WaitingTotalResponse, iso8601};
pub use waitlist::{ApiErrorBody, SubscribeRequest, SubscribeResponse, ValidationOutcome};
