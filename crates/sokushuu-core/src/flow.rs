//! The interactive learning flow behind the quiz card.
//!
//! # States
//!
//! ```text
//!              start                select_answer
//! Collection --------> Question ------------------> Answered
//!                        ^  ^                        |  |  |
//!                        |  +------ retry_question --+  |  |  (wrong answer)
//!                        |  +------ flip_card <-------->+  |
//!                        +--- next_question / continue_anyway (more questions)
//!                                                          |
//!                      next_question / continue_anyway / finish (last question)
//!                                                          v
//!                                                      Completed
//! ```
//!
//! `Completed` is terminal. Every method that is not valid in the current
//! state returns [`FlowError::InvalidTransition`] and leaves the flow
//! unchanged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sokushuu_types::{LearningState, Lesson, Question};
use tracing::debug;

/// Errors returned by [`LearningFlow`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The lesson has nothing to ask.
    #[error("lesson {0} has no questions")]
    EmptyLesson(String),

    /// A question's correct answer does not point at one of its options.
    #[error("question {id} has correct answer {correct_answer} but only {options} options")]
    InvalidQuestion {
        /// The offending question.
        id: u32,
        /// Its declared correct answer.
        correct_answer: usize,
        /// How many options it has.
        options: usize,
    },

    /// The action is not allowed in the current state.
    #[error("cannot {action} while in {state:?} state")]
    InvalidTransition {
        /// The attempted action.
        action: &'static str,
        /// The state the flow was in.
        state: LearningState,
    },

    /// The chosen option does not exist.
    #[error("answer {index} out of range for {options} options")]
    AnswerOutOfRange {
        /// The chosen index.
        index: usize,
        /// How many options the question has.
        options: usize,
    },
}

/// Result of a finished lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    /// Title of the finished lesson.
    pub lesson_title: String,
    /// Questions answered correctly on the first try or after retrying.
    pub correct_answers: u32,
    /// Number of questions in the lesson.
    pub total_questions: usize,
    /// Seconds from start to completion, rounded.
    pub elapsed_secs: u64,
    /// Reward for the lesson, if it pays one.
    pub reward: Option<Decimal>,
}

impl CompletionSummary {
    /// Elapsed time as `m:ss`.
    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }

    /// Text for the "share on X" button.
    pub fn share_text(&self) -> String {
        let earned = self
            .reward
            .map(|reward| format!("\u{1f4b0} Earned: ${reward} USD\n"))
            .unwrap_or_default();
        format!(
            "\u{1f389} Just completed \"{}\" on @sokushuu_de! \n\n\
             \u{1f4ca} Score: {}/{}\n\
             \u{23f1}\u{fe0f} Time: {}\n\
             {earned}\n\
             Learn Web3 and level up your knowledge! \u{1f680}",
            self.lesson_title,
            self.correct_answers,
            self.total_questions,
            self.elapsed_label(),
        )
    }
}

/// Format seconds as `m:ss`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs.div_euclid(60), secs.rem_euclid(60))
}

/// In-memory progress through one lesson.
#[derive(Debug, Clone)]
pub struct LearningFlow {
    lesson: Lesson,
    state: LearningState,
    question_index: usize,
    selected_answer: Option<usize>,
    correct_answers: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl LearningFlow {
    /// Start a flow for `lesson`, showing its collection card.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptyLesson`] if the lesson has no questions, or
    /// [`FlowError::InvalidQuestion`] if any question's correct answer is
    /// not one of its options.
    pub fn new(lesson: Lesson) -> Result<Self, FlowError> {
        if lesson.questions.is_empty() {
            return Err(FlowError::EmptyLesson(lesson.id));
        }
        if let Some(bad) = lesson
            .questions
            .iter()
            .find(|q| q.correct_answer >= q.options.len())
        {
            return Err(FlowError::InvalidQuestion {
                id: bad.id,
                correct_answer: bad.correct_answer,
                options: bad.options.len(),
            });
        }

        Ok(Self {
            lesson,
            state: LearningState::Collection,
            question_index: 0,
            selected_answer: None,
            correct_answers: 0,
            started_at: None,
            completed_at: None,
        })
    }

    /// Current card face.
    pub const fn state(&self) -> LearningState {
        self.state
    }

    /// The lesson being played.
    pub const fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    /// Zero-based index of the current question.
    pub const fn question_index(&self) -> usize {
        self.question_index
    }

    /// The question currently on the card.
    pub fn current_question(&self) -> Option<&Question> {
        self.lesson.questions.get(self.question_index)
    }

    /// The option chosen for the current question, if any.
    pub const fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    /// Correct answers so far.
    pub const fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Whether the chosen option for the current question is correct.
    pub fn answered_correctly(&self) -> bool {
        match (self.selected_answer, self.current_question()) {
            (Some(answer), Some(question)) => question.is_correct(answer),
            _ => false,
        }
    }

    /// Whether the current question is the lesson's last.
    pub fn is_last_question(&self) -> bool {
        self.question_index.saturating_add(1) >= self.lesson.questions.len()
    }

    /// Leave the collection card and show the first question.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless in `Collection`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), FlowError> {
        self.require(LearningState::Collection, "start")?;
        self.started_at = Some(now);
        self.enter(LearningState::Question);
        Ok(())
    }

    /// Choose option `index` for the current question.
    ///
    /// Returns whether the answer was correct.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless a question is showing
    /// and has not been answered yet, or [`FlowError::AnswerOutOfRange`] for
    /// an index past the last option.
    pub fn select_answer(&mut self, index: usize) -> Result<bool, FlowError> {
        self.require(LearningState::Question, "select an answer")?;
        if self.selected_answer.is_some() {
            return Err(self.invalid("select an answer"));
        }
        let Some(question) = self.current_question() else {
            return Err(self.invalid("select an answer"));
        };
        if index >= question.options.len() {
            return Err(FlowError::AnswerOutOfRange {
                index,
                options: question.options.len(),
            });
        }

        let correct = question.is_correct(index);
        self.selected_answer = Some(index);
        if correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
        self.enter(LearningState::Answered);
        Ok(correct)
    }

    /// After a correct answer, move to the next question, or complete the
    /// lesson after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless the explanation of a
    /// correct answer is showing.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> Result<(), FlowError> {
        self.require(LearningState::Answered, "go to the next question")?;
        if !self.answered_correctly() {
            return Err(self.invalid("go to the next question"));
        }
        self.advance(now);
        Ok(())
    }

    /// After a wrong answer, move on without retrying.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless the explanation of a
    /// wrong answer is showing.
    pub fn continue_anyway(&mut self, now: DateTime<Utc>) -> Result<(), FlowError> {
        self.require(LearningState::Answered, "continue")?;
        if self.answered_correctly() {
            return Err(self.invalid("continue"));
        }
        self.advance(now);
        Ok(())
    }

    /// After a wrong answer, ask the same question again.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless the explanation of a
    /// wrong answer is showing.
    pub fn retry_question(&mut self) -> Result<(), FlowError> {
        self.require(LearningState::Answered, "retry")?;
        if self.answered_correctly() {
            return Err(self.invalid("retry"));
        }
        self.selected_answer = None;
        self.enter(LearningState::Question);
        Ok(())
    }

    /// Complete the lesson from the last question's explanation, whatever
    /// the answer was.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] unless the last question has
    /// been answered.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), FlowError> {
        self.require(LearningState::Answered, "finish")?;
        if !self.is_last_question() {
            return Err(self.invalid("finish"));
        }
        self.complete(now);
        Ok(())
    }

    /// Flip between an answered question and its explanation.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] before the current question
    /// is answered or once the lesson is complete.
    pub fn flip_card(&mut self) -> Result<(), FlowError> {
        match (self.state, self.selected_answer) {
            (LearningState::Answered, Some(_)) => self.enter(LearningState::Question),
            (LearningState::Question, Some(_)) => self.enter(LearningState::Answered),
            _ => return Err(self.invalid("flip the card")),
        }
        Ok(())
    }

    /// Score and timing once the lesson is complete.
    pub fn summary(&self) -> Option<CompletionSummary> {
        if self.state != LearningState::Completed {
            return None;
        }
        Some(CompletionSummary {
            lesson_title: self.lesson.title.clone(),
            correct_answers: self.correct_answers,
            total_questions: self.lesson.questions.len(),
            elapsed_secs: self.elapsed_secs(),
            reward: self.lesson.reward,
        })
    }

    /// Rounded seconds between start and completion, zero if either is
    /// missing or the clock went backwards.
    fn elapsed_secs(&self) -> u64 {
        let (Some(start), Some(end)) = (self.started_at, self.completed_at) else {
            return 0;
        };
        let millis = end.signed_duration_since(start).num_milliseconds();
        u64::try_from(millis)
            .map(|ms| ms.saturating_add(500).div_euclid(1000))
            .unwrap_or(0)
    }

    fn advance(&mut self, now: DateTime<Utc>) {
        if self.is_last_question() {
            self.complete(now);
        } else {
            self.question_index = self.question_index.saturating_add(1);
            self.selected_answer = None;
            self.enter(LearningState::Question);
        }
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.completed_at = Some(now);
        self.enter(LearningState::Completed);
    }

    fn enter(&mut self, next: LearningState) {
        debug!(
            lesson = %self.lesson.id,
            from = ?self.state,
            to = ?next,
            question = self.question_index,
            "learning flow transition"
        );
        self.state = next;
    }

    fn require(&self, state: LearningState, action: &'static str) -> Result<(), FlowError> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    const fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            state: self.state,
        }
    }
}
