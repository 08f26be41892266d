//! quizmark-core: answer grading engine, question banks, and exam scoring.
//!
//! This crate defines the question/answer data model, the per-type answer
//! equivalence rules, and the exam-level scoring built on top of them.

pub mod config;
pub mod error;
pub mod grading;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod scoring;

pub use grading::{grade, Grader, GradingConfig, Outcome, Verdict};
pub use model::{AnswerValue, Question, QuestionType};
