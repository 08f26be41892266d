//! Core data model types for quizmark.
//!
//! Questions, answers, and exams as they arrive from a question bank or
//! from the answer form. None of these types are mutated by grading.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The declared type of a question.
///
/// Unknown type names are kept verbatim in [`QuestionType::Unsupported`]
/// so callers can report them instead of failing to load the bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    MultipleAnswer,
    FillBlank,
    Ordering,
    ShortAnswer,
    Essay,
    Unsupported(String),
}

impl QuestionType {
    /// Every recognized question type.
    pub const SUPPORTED: [QuestionType; 7] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::MultipleAnswer,
        QuestionType::FillBlank,
        QuestionType::Ordering,
        QuestionType::ShortAnswer,
        QuestionType::Essay,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::MultipleAnswer => "multiple_answer",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::Ordering => "ordering",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Essay => "essay",
            QuestionType::Unsupported(name) => name,
        }
    }

    /// Types answered by picking option labels.
    pub fn is_choice_based(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::TrueFalse | QuestionType::MultipleAnswer
        )
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, QuestionType::Unsupported(_))
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for QuestionType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" => QuestionType::MultipleChoice,
            "true_false" => QuestionType::TrueFalse,
            "multiple_answer" => QuestionType::MultipleAnswer,
            "fill_blank" => QuestionType::FillBlank,
            "ordering" => QuestionType::Ordering,
            "short_answer" => QuestionType::ShortAnswer,
            "essay" => QuestionType::Essay,
            _ => QuestionType::Unsupported(s.to_string()),
        }
    }
}

impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        QuestionType::from(s.as_str())
    }
}

impl From<QuestionType> for String {
    fn from(qt: QuestionType) -> Self {
        qt.as_str().to_string()
    }
}

/// A raw answer value, either submitted by a user or stored as canonical.
///
/// Deserializes from any JSON/TOML value. Numbers and booleans become text,
/// arrays become sequences of element text, objects become their compact
/// JSON text. A text value may still hold a JSON-encoded array; see
/// [`crate::normalize::coerce_to_sequence`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AnswerValue {
    /// No answer at all.
    #[default]
    Missing,
    /// A single string (label, free text, or a serialized sequence).
    Text(String),
    /// A native sequence (label set, blanks, or ordered items).
    Sequence(Vec<String>),
}

impl AnswerValue {
    pub fn text(s: impl Into<String>) -> Self {
        AnswerValue::Text(s.into())
    }

    pub fn sequence<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Interpret a command-line or form input: valid JSON is taken as a
    /// value, anything else as plain text.
    pub fn parse_input(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => AnswerValue::from(value),
            Err(_) => AnswerValue::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AnswerValue::Missing)
    }
}

impl From<Value> for AnswerValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AnswerValue::Missing,
            Value::String(s) => AnswerValue::Text(s),
            Value::Array(items) => {
                AnswerValue::Sequence(items.into_iter().map(element_text).collect())
            }
            other => AnswerValue::Text(element_text(other)),
        }
    }
}

impl From<AnswerValue> for Value {
    fn from(answer: AnswerValue) -> Self {
        match answer {
            AnswerValue::Missing => Value::Null,
            AnswerValue::Text(s) => Value::String(s),
            AnswerValue::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Missing => Ok(()),
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::Sequence(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Text form of one JSON element inside an answer.
pub(crate) fn element_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Question difficulty as tagged in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single question from a question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: String,
    /// The prompt shown to the user.
    #[serde(default)]
    pub question_text: String,
    /// Declared question type.
    pub question_type: QuestionType,
    /// Option label to display text, for choice-based types only.
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
    /// Canonical answer; may be a JSON-encoded string for sequence types.
    #[serde(default)]
    pub correct_answer: AnswerValue,
    /// Shown after answering; never used for grading.
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Marks awarded for a correct answer.
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_marks() -> u32 {
    1
}

impl Question {
    /// Build a question with default marks and no options.
    pub fn new(
        id: impl Into<String>,
        question_type: QuestionType,
        correct_answer: AnswerValue,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: String::new(),
            question_type,
            options: None,
            correct_answer,
            explanation: None,
            difficulty: None,
            marks: default_marks(),
            tags: Vec::new(),
        }
    }

    /// Attach option labels and their display text.
    pub fn with_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = Some(
            options
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

/// An exam: a titled, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minimum total score to pass, if the exam has a threshold.
    #[serde(default)]
    pub passing_marks: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Exam {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Sum of marks over all questions. Widened so large per-question
    /// marks cannot overflow.
    pub fn total_marks(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.marks)).sum()
    }
}

/// A user's answers to an exam, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Exam the answers were given for, if recorded.
    #[serde(default)]
    pub exam_id: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

impl Submission {
    pub fn answer(&self, question_id: &str) -> &AnswerValue {
        const MISSING: &AnswerValue = &AnswerValue::Missing;
        self.answers.get(question_id).unwrap_or(MISSING)
    }
}
