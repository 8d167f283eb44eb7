//! Domain logic of the Sokushuu landing page.
//!
//! Everything here is pure and synchronous: callers pass in the current time
//! where it matters so behavior is deterministic under test.
//!
//! # Modules
//!
//! - [`validation`] -- Email validation shared by the subscribe form and the
//!   API.
//! - [`countdown`] -- Time remaining until launch.
//! - [`flow`] -- The interactive learning flow state machine behind the quiz
//!   card.
//! - [`lesson`] -- The built-in demo lesson shown in the hero section.
//! - [`waitlist`] -- Lenient parsing of the stored waiting list counter.

pub mod countdown;
pub mod flow;
pub mod lesson;
pub mod validation;
pub mod waitlist;

pub use countdown::{TimeLeft, time_left};
pub use flow::{CompletionSummary, FlowError, LearningFlow};
pub use lesson::demo_lesson;
pub use validation::{email_rule, is_email_format_valid, normalize_email, validate_email};
pub use waitlist::{next_waiting_total, parse_waiting_total};
