//! Exam-level scoring.
//!
//! Grades every question of an exam against a submission and totals the
//! marks. Correct answers earn full marks; incorrect and ungraded answers
//! earn none until reviewed.

use serde::{Deserialize, Serialize};

use crate::grading::{ElementResults, Grader, Outcome};
use crate::model::{AnswerValue, Exam, QuestionType, Submission};
use crate::normalize::is_blank;

/// What the caller should tell the user about one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    NotAnswered,
    Correct,
    Incorrect,
    NeedsReview,
    UnsupportedType,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::NotAnswered => "not answered",
            Feedback::Correct => "correct",
            Feedback::Incorrect => "incorrect",
            Feedback::NeedsReview => "needs manual review",
            Feedback::UnsupportedType => "unsupported question type",
        }
    }
}

/// Graded result for one exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_type: QuestionType,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_results: Option<ElementResults>,
    pub feedback: Feedback,
    pub user_answer: AnswerValue,
    pub correct_answer: AnswerValue,
    pub marks_obtained: u32,
    pub marks: u32,
}

/// A fully graded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedExam {
    pub exam_id: String,
    pub exam_title: String,
    /// Results in exam question order.
    pub results: Vec<QuestionResult>,
    pub total_score: u64,
    pub max_score: u64,
    /// `total_score / max_score * 100`, or 0 for an exam worth no marks.
    pub percentage: f64,
    /// Questions with a non-blank answer.
    pub answered: usize,
    /// Answered questions waiting for a human grade.
    pub pending_review: usize,
    /// Pass/fail against the exam threshold; `None` without a threshold or
    /// while review is pending.
    pub passed: Option<bool>,
}

impl GradedExam {
    pub fn correct_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == Outcome::Correct)
            .count()
    }
}

/// Marks earned for an outcome on a question worth `marks`.
pub fn marks_awarded(outcome: Outcome, marks: u32) -> u32 {
    match outcome {
        Outcome::Correct => marks,
        Outcome::Incorrect | Outcome::Ungraded => 0,
    }
}

/// Grade a whole submission against an exam.
pub fn grade_submission(exam: &Exam, submission: &Submission, grader: &Grader) -> GradedExam {
    if let Some(exam_id) = &submission.exam_id {
        if exam_id != &exam.id {
            tracing::warn!(
                "submission is for exam '{}' but is being graded against '{}'",
                exam_id,
                exam.id
            );
        }
    }
    for question_id in submission.answers.keys() {
        if exam.question(question_id).is_none() {
            tracing::warn!("ignoring answer for unknown question '{question_id}'");
        }
    }

    let mut results = Vec::with_capacity(exam.questions.len());
    let mut answered = 0usize;
    let mut pending_review = 0usize;

    for question in &exam.questions {
        let answer = submission.answer(&question.id);
        let blank = is_blank(answer);
        let verdict = grader.grade(question, answer);

        let feedback = if !question.question_type.is_supported() {
            Feedback::UnsupportedType
        } else if blank {
            Feedback::NotAnswered
        } else {
            match verdict.outcome {
                Outcome::Correct => Feedback::Correct,
                Outcome::Incorrect => Feedback::Incorrect,
                Outcome::Ungraded => Feedback::NeedsReview,
            }
        };

        if !blank {
            answered += 1;
        }
        if feedback == Feedback::NeedsReview {
            pending_review += 1;
        }

        results.push(QuestionResult {
            question_id: question.id.clone(),
            question_type: question.question_type.clone(),
            outcome: verdict.outcome,
            element_results: verdict.element_results,
            feedback,
            user_answer: answer.clone(),
            correct_answer: question.correct_answer.clone(),
            marks_obtained: marks_awarded(verdict.outcome, question.marks),
            marks: question.marks,
        });
    }

    let total_score: u64 = results.iter().map(|r| u64::from(r.marks_obtained)).sum();
    let max_score = exam.total_marks();
    let percentage = if max_score > 0 {
        total_score as f64 / max_score as f64 * 100.0
    } else {
        0.0
    };
    let passed = match exam.passing_marks {
        Some(threshold) if pending_review == 0 => Some(total_score >= u64::from(threshold)),
        _ => None,
    };

    tracing::info!(
        "graded exam '{}': {}/{} ({:.1}%), {} pending review",
        exam.id,
        total_score,
        max_score,
        percentage,
        pending_review
    );

    GradedExam {
        exam_id: exam.id.clone(),
        exam_title: exam.title.clone(),
        results,
        total_score,
        max_score,
        percentage,
        answered,
        pending_review,
        passed,
    }
}
