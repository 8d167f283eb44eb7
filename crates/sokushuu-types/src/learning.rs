//! Lesson content and learning flow state.
//!
//! Field names are camelCase on the wire to match the frontend's lesson
//! catalogue.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A multiple choice question inside a [`Lesson`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Position-independent question identifier.
    pub id: u32,
    /// The prompt shown on the card.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer: usize,
    /// Shown after the learner answers.
    pub explanation: String,
}

impl Question {
    /// Whether `answer` is the correct option.
    pub const fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }
}

/// A short interactive lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Lesson {
    /// Slug identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// One-line summary.
    pub description: String,
    /// Catalogue category.
    pub category: String,
    /// Difficulty label (`Beginner`, `Intermediate`, `Advanced`).
    pub difficulty: String,
    /// Human estimate such as `2-3 min`.
    pub estimated_time: String,
    /// Reward in USD. Absent for lessons without a payout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub reward: Option<Decimal>,
    /// Number of questions advertised on the collection card.
    pub total_questions: u32,
    /// Emoji thumbnail.
    pub thumbnail: String,
    /// Creator of the lesson.
    pub author: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// The questions, asked in order.
    pub questions: Vec<Question>,
}

/// Which card face the learning flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LearningState {
    /// Lesson overview with the start button.
    Collection,
    /// A question is on screen.
    Question,
    /// The explanation for the chosen answer is on screen.
    Answered,
    /// All questions done. Terminal.
    Completed,
}
