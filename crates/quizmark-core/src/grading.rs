//! Answer grading engine.
//!
//! [`Grader::grade`] decides whether a submitted answer matches a question's
//! canonical answer using type-specific comparison rules. It is pure: no
//! I/O, no shared state, and every malformed input degrades to a defined
//! outcome instead of an error.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, Question, QuestionType};
use crate::normalize::{coerce_to_scalar, coerce_to_sequence, is_blank, CaseFolding};

/// The result of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Cannot be graded automatically; needs human review.
    Ungraded,
}

/// Per-label state of a multiple-answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMark {
    /// Selected and part of the canonical set.
    Correct,
    /// Selected but not part of the canonical set.
    Incorrect,
    /// Part of the canonical set but not selected.
    Missed,
    /// Neither selected nor canonical.
    Unselected,
}

/// Breakdown of a multi-part answer, for highlighting individual parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "marks", rename_all = "snake_case")]
pub enum ElementResults {
    /// One entry per position (fill-in-the-blank, ordering).
    Positions(Vec<bool>),
    /// One entry per option label (multiple answer).
    Labels(BTreeMap<String, LabelMark>),
}

/// Verdict for one question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_results: Option<ElementResults>,
}

impl Verdict {
    pub fn correct() -> Self {
        Self {
            outcome: Outcome::Correct,
            element_results: None,
        }
    }

    pub fn incorrect() -> Self {
        Self {
            outcome: Outcome::Incorrect,
            element_results: None,
        }
    }

    pub fn ungraded() -> Self {
        Self {
            outcome: Outcome::Ungraded,
            element_results: None,
        }
    }

    fn with_elements(outcome: Outcome, elements: ElementResults) -> Self {
        Self {
            outcome,
            element_results: Some(elements),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }
}

/// Case folding applied per question type.
///
/// Surrounding whitespace is always trimmed; only letter case is
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub multiple_choice: CaseFolding,
    pub true_false: CaseFolding,
    pub multiple_answer: CaseFolding,
    pub fill_blank: CaseFolding,
    pub ordering: CaseFolding,
    pub short_answer: CaseFolding,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            multiple_choice: CaseFolding::Upper,
            true_false: CaseFolding::Upper,
            multiple_answer: CaseFolding::Upper,
            fill_blank: CaseFolding::Lower,
            short_answer: CaseFolding::Lower,
            // Ordering items may be case-significant tokens.
            ordering: CaseFolding::Sensitive,
        }
    }
}

impl GradingConfig {
    pub fn folding_for(&self, question_type: &QuestionType) -> CaseFolding {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::MultipleAnswer => self.multiple_answer,
            QuestionType::FillBlank => self.fill_blank,
            QuestionType::Ordering => self.ordering,
            QuestionType::ShortAnswer => self.short_answer,
            QuestionType::Essay | QuestionType::Unsupported(_) => CaseFolding::Sensitive,
        }
    }
}

/// Grades answers under a fixed [`GradingConfig`].
#[derive(Debug, Clone, Default)]
pub struct Grader {
    config: GradingConfig,
}

impl Grader {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade a submitted answer against a question's canonical answer.
    pub fn grade(&self, question: &Question, answer: &AnswerValue) -> Verdict {
        let verdict = match &question.question_type {
            QuestionType::Essay => Verdict::ungraded(),
            QuestionType::Unsupported(name) => {
                tracing::warn!(
                    question_id = %question.id,
                    question_type = %name,
                    "unsupported question type, grading as incorrect"
                );
                Verdict::incorrect()
            }
            _ if is_blank(answer) => Verdict::incorrect(),
            QuestionType::MultipleChoice
            | QuestionType::TrueFalse
            | QuestionType::ShortAnswer => self.grade_single(question, answer),
            QuestionType::MultipleAnswer => self.grade_label_set(question, answer),
            QuestionType::FillBlank | QuestionType::Ordering => {
                self.grade_sequence(question, answer)
            }
        };

        tracing::debug!(
            question_id = %question.id,
            question_type = %question.question_type,
            outcome = ?verdict.outcome,
            "graded answer"
        );
        verdict
    }

    fn grade_single(&self, question: &Question, answer: &AnswerValue) -> Verdict {
        let folding = self.config.folding_for(&question.question_type);
        let submitted = folding.apply(&coerce_to_scalar(answer));
        let canonical = folding.apply(&coerce_to_scalar(&question.correct_answer));

        if !canonical.is_empty() && submitted == canonical {
            Verdict::correct()
        } else {
            Verdict::incorrect()
        }
    }

    fn grade_label_set(&self, question: &Question, answer: &AnswerValue) -> Verdict {
        let folding = self.config.folding_for(&question.question_type);
        let label_set = |value: &AnswerValue| -> BTreeSet<String> {
            coerce_to_sequence(value)
                .iter()
                .map(|label| folding.apply(label))
                .filter(|label| !label.is_empty())
                .collect()
        };
        let selected = label_set(answer);
        let canonical = label_set(&question.correct_answer);

        let offered = question
            .options
            .iter()
            .flat_map(|options| options.keys())
            .map(|label| folding.apply(label))
            .filter(|label| !label.is_empty());

        let marks: BTreeMap<String, LabelMark> = offered
            .chain(selected.iter().cloned())
            .chain(canonical.iter().cloned())
            .map(|label| {
                let mark = match (selected.contains(&label), canonical.contains(&label)) {
                    (true, true) => LabelMark::Correct,
                    (true, false) => LabelMark::Incorrect,
                    (false, true) => LabelMark::Missed,
                    (false, false) => LabelMark::Unselected,
                };
                (label, mark)
            })
            .collect();

        let outcome = if !canonical.is_empty() && selected == canonical {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        Verdict::with_elements(outcome, ElementResults::Labels(marks))
    }

    fn grade_sequence(&self, question: &Question, answer: &AnswerValue) -> Verdict {
        let folding = self.config.folding_for(&question.question_type);
        let submitted: Vec<String> = coerce_to_sequence(answer)
            .iter()
            .map(|item| folding.apply(item))
            .collect();
        let canonical: Vec<String> = coerce_to_sequence(&question.correct_answer)
            .iter()
            .map(|item| folding.apply(item))
            .collect();

        let len = submitted.len().max(canonical.len());
        let positions: Vec<bool> = (0..len)
            .map(|i| match (submitted.get(i), canonical.get(i)) {
                (Some(given), Some(expected)) => given == expected,
                _ => false,
            })
            .collect();

        let outcome = if !canonical.is_empty()
            && submitted.len() == canonical.len()
            && positions.iter().all(|&ok| ok)
        {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        Verdict::with_elements(outcome, ElementResults::Positions(positions))
    }
}

/// Grade with the default per-type case folding.
pub fn grade(question: &Question, answer: &AnswerValue) -> Verdict {
    Grader::default().grade(question, answer)
}
