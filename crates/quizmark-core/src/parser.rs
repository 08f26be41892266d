//! Question bank and submission loader.
//!
//! Loads exams from TOML or JSON bank files and directories, loads answer
//! submissions, and validates banks for authoring mistakes.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::LoadError;
use crate::model::{Exam, Question, QuestionType, Submission};
use crate::normalize::{coerce_to_sequence, is_blank, CaseFolding};

/// On-disk encoding of a bank or submission file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Intermediate structure for bank files.
#[derive(Debug, Deserialize)]
struct BankFile {
    exam: BankHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct BankHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    passing_marks: Option<u32>,
}

fn decode<T: DeserializeOwned>(
    content: &str,
    format: FileFormat,
    source_path: &Path,
) -> Result<T, LoadError> {
    match format {
        FileFormat::Toml => toml::from_str(content).map_err(|source| LoadError::Toml {
            path: source_path.to_path_buf(),
            source,
        }),
        FileFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: source_path.to_path_buf(),
            source,
        }),
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a single bank file into an `Exam`.
pub fn parse_bank(path: &Path) -> Result<Exam, LoadError> {
    let format = FileFormat::from_path(path)?;
    let content = read(path)?;
    parse_bank_str(&content, format, path)
}

/// Parse bank file contents (useful for testing).
pub fn parse_bank_str(
    content: &str,
    format: FileFormat,
    source_path: &Path,
) -> Result<Exam, LoadError> {
    let parsed: BankFile = decode(content, format, source_path)?;

    Ok(Exam {
        id: parsed.exam.id,
        title: parsed.exam.title,
        description: parsed.exam.description,
        passing_marks: parsed.exam.passing_marks,
        questions: parsed.questions,
    })
}

/// Parse a submission file.
pub fn parse_submission(path: &Path) -> Result<Submission, LoadError> {
    let format = FileFormat::from_path(path)?;
    let content = read(path)?;
    parse_submission_str(&content, format, path)
}

/// Parse submission file contents.
pub fn parse_submission_str(
    content: &str,
    format: FileFormat,
    source_path: &Path,
) -> Result<Submission, LoadError> {
    decode(content, format, source_path)
}

/// Recursively load all `.toml` and `.json` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<Exam>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            exams.extend(load_bank_directory(&path)?);
        } else if FileFormat::from_path(&path).is_ok() {
            match parse_bank(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate an exam for common authoring issues.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if exam.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "exam has no questions".into(),
        });
    }

    let total = exam.total_marks();
    if total > u64::from(u32::MAX) {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!("total marks {total} exceeds the maximum of {}", u32::MAX),
        });
    }

    if let Some(passing) = exam.passing_marks {
        if u64::from(passing) > total {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("passing_marks {passing} exceeds total marks {total}"),
            });
        }
    }

    let mut seen_ids = HashSet::new();
    for question in &exam.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }
        validate_question(question, &mut warnings);
    }

    warnings
}

fn validate_question(question: &Question, warnings: &mut Vec<ValidationWarning>) {
    let id = question.id.as_str();
    let qt = &question.question_type;

    if question.question_text.trim().is_empty() {
        warnings.push(ValidationWarning::question(id, "question text is empty"));
    }
    if question.marks == 0 {
        warnings.push(ValidationWarning::question(id, "question is worth zero marks"));
    }

    if !qt.is_supported() {
        warnings.push(ValidationWarning::question(
            id,
            format!("unsupported question type: {qt}"),
        ));
        return;
    }

    match (&question.options, qt.is_choice_based()) {
        (Some(_), false) => warnings.push(ValidationWarning::question(
            id,
            format!("options are ignored for {qt} questions"),
        )),
        (None, true) => warnings.push(ValidationWarning::question(
            id,
            format!("{qt} question has no options"),
        )),
        _ => {}
    }

    if let Some(options) = &question.options {
        if options.values().any(|text| text.trim().is_empty()) {
            warnings.push(ValidationWarning::question(id, "option text is empty"));
        }
        if *qt == QuestionType::TrueFalse && options.len() != 2 {
            warnings.push(ValidationWarning::question(
                id,
                format!(
                    "true_false question must have exactly two options, found {}",
                    options.len()
                ),
            ));
        }
    }

    if *qt != QuestionType::Essay && is_blank(&question.correct_answer) {
        warnings.push(ValidationWarning::question(id, "correct answer is missing"));
        return;
    }

    if qt.is_choice_based() {
        if let Some(options) = &question.options {
            let offered: BTreeSet<String> = options
                .keys()
                .map(|label| CaseFolding::Upper.apply(label))
                .collect();
            let canonical: Vec<String> = coerce_to_sequence(&question.correct_answer)
                .iter()
                .map(|label| CaseFolding::Upper.apply(label))
                .filter(|label| !label.is_empty())
                .collect();

            for label in canonical.iter().filter(|label| !offered.contains(*label)) {
                warnings.push(ValidationWarning::question(
                    id,
                    format!("correct answer '{label}' is not an offered option"),
                ));
            }
            if *qt != QuestionType::MultipleAnswer && canonical.len() > 1 {
                warnings.push(ValidationWarning::question(
                    id,
                    format!("{qt} question has {} correct labels", canonical.len()),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerValue;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[exam]
id = "general"
title = "General Knowledge"
description = "Mixed question types"
passing_marks = 3

[[questions]]
id = "capital"
question_text = "Which city is the capital of France?"
question_type = "multiple_choice"
correct_answer = "B"
difficulty = "easy"

[questions.options]
A = "Lyon"
B = "Paris"
C = "Nice"

[[questions]]
id = "primes"
question_text = "Select the prime numbers."
question_type = "multiple_answer"
correct_answer = '["A","C"]'

[questions.options]
A = "2"
B = "4"
C = "5"

[[questions]]
id = "tower"
question_text = "The Eiffel Tower is in ___ and opened in ___."
question_type = "fill_blank"
correct_answer = ["Paris", "1889"]
marks = 2
"#;

    fn parse(toml: &str) -> Exam {
        parse_bank_str(toml, FileFormat::Toml, &PathBuf::from("test.toml")).unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let exam = parse(VALID_TOML);
        assert_eq!(exam.id, "general");
        assert_eq!(exam.passing_marks, Some(3));
        assert_eq!(exam.questions.len(), 3);
        assert_eq!(exam.questions[1].correct_answer, AnswerValue::text(r#"["A","C"]"#));
        assert_eq!(
            exam.questions[2].correct_answer,
            AnswerValue::sequence(["Paris", "1889"])
        );
        assert_eq!(exam.total_marks(), 4);
        assert!(validate_exam(&exam).is_empty());
    }

    #[test]
    fn parse_json_bank() {
        let json = r#"{
            "exam": {"id": "j", "title": "JSON bank"},
            "questions": [
                {"id": "q1", "question_text": "2 + 2?", "question_type": "short_answer",
                 "correct_answer": 4}
            ]
        }"#;
        let exam = parse_bank_str(json, FileFormat::Json, &PathBuf::from("bank.json")).unwrap();
        assert_eq!(exam.questions[0].correct_answer, AnswerValue::text("4"));
        assert_eq!(exam.passing_marks, None);
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_bank_str(
            "this is not [valid toml }{",
            FileFormat::Toml,
            &PathBuf::from("bad.toml"),
        );
        assert!(matches!(result, Err(LoadError::Toml { .. })));

        let err = parse_bank(Path::new("/nonexistent/bank.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().starts_with("failed to read /nonexistent/bank.toml"));
    }

    #[test]
    fn unsupported_extension() {
        let err = FileFormat::from_path(Path::new("bank.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
        assert_eq!(err.path(), Path::new("bank.yaml"));
        assert!(err.to_string().contains("bank.yaml"));
    }

    #[test]
    fn parse_submission_both_formats() {
        let json = r#"{"exam_id": "general", "answers": {"capital": "b", "primes": ["c", "a"]}}"#;
        let sub = parse_submission_str(json, FileFormat::Json, &PathBuf::from("a.json")).unwrap();
        assert_eq!(sub.exam_id.as_deref(), Some("general"));
        assert_eq!(sub.answer("primes"), &AnswerValue::sequence(["c", "a"]));

        let toml = "[answers]\ncapital = \"b\"\ntower = [\"paris\", \"1889\"]\n";
        let sub = parse_submission_str(toml, FileFormat::Toml, &PathBuf::from("a.toml")).unwrap();
        assert_eq!(sub.exam_id, None);
        assert_eq!(sub.answer("tower"), &AnswerValue::sequence(["paris", "1889"]));
    }

    #[test]
    fn validate_duplicate_ids() {
        let exam = parse(
            r#"
[exam]
id = "dupes"
title = "Dupes"

[[questions]]
id = "same"
question_text = "First"
question_type = "short_answer"
correct_answer = "a"

[[questions]]
id = "same"
question_text = "Second"
question_type = "short_answer"
correct_answer = "b"
"#,
        );
        let warnings = validate_exam(&exam);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_option_mistakes() {
        let exam = parse(
            r#"
[exam]
id = "opts"
title = "Options"

[[questions]]
id = "tf"
question_text = "The sky is green."
question_type = "true_false"
correct_answer = "B"

[questions.options]
A = "True"
B = "False"
C = "Maybe"

[[questions]]
id = "mc"
question_text = "Pick one"
question_type = "multiple_choice"
correct_answer = "E"

[questions.options]
A = "One"
B = ""

[[questions]]
id = "sa"
question_text = "Name it"
question_type = "short_answer"
correct_answer = "x"

[questions.options]
A = "stray"

[[questions]]
id = "ma"
question_text = "Pick some"
question_type = "multiple_answer"
correct_answer = ["A"]
"#,
        );
        let warnings = validate_exam(&exam);
        let for_id = |id: &str| -> Vec<&str> {
            warnings
                .iter()
                .filter(|w| w.question_id.as_deref() == Some(id))
                .map(|w| w.message.as_str())
                .collect()
        };

        assert!(for_id("tf").iter().any(|m| m.contains("exactly two options")));
        assert!(for_id("mc").iter().any(|m| m.contains("'E' is not an offered option")));
        assert!(for_id("mc").iter().any(|m| m.contains("option text is empty")));
        assert!(for_id("sa").iter().any(|m| m.contains("options are ignored")));
        assert!(for_id("ma").iter().any(|m| m.contains("has no options")));
    }

    #[test]
    fn validate_missing_answers_and_types() {
        let exam = parse(
            r#"
[exam]
id = "gaps"
title = "Gaps"
passing_marks = 10

[[questions]]
id = "blank"
question_text = "Fill"
question_type = "fill_blank"

[[questions]]
id = "essay"
question_text = "Discuss"
question_type = "essay"

[[questions]]
id = "odd"
question_text = ""
question_type = "matching"
correct_answer = "A"
marks = 0
"#,
        );
        let warnings = validate_exam(&exam);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(messages.contains(&"correct answer is missing"));
        assert!(messages.iter().any(|m| m.contains("unsupported question type: matching")));
        assert!(messages.contains(&"question text is empty"));
        assert!(messages.contains(&"question is worth zero marks"));
        assert!(messages.iter().any(|m| m.contains("passing_marks 10 exceeds")));
        assert!(!warnings
            .iter()
            .any(|w| w.question_id.as_deref() == Some("essay")));
    }

    #[test]
    fn validate_total_marks_beyond_u32() {
        let exam = parse(
            r#"
[exam]
id = "huge"
title = "Huge"
passing_marks = 4294967295

[[questions]]
id = "big"
question_text = "Worth a lot"
question_type = "short_answer"
correct_answer = "x"
marks = 4294967295

[[questions]]
id = "small"
question_text = "Worth a little"
question_type = "short_answer"
correct_answer = "y"
marks = 2
"#,
        );
        assert_eq!(exam.total_marks(), 4_294_967_297);

        let warnings = validate_exam(&exam);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["total marks 4294967297 exceeds the maximum of 4294967295"]
        );
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("general.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("small.json"),
            r#"{"exam": {"id": "small", "title": "Small"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let exams = load_bank_directory(dir.path()).unwrap();
        let ids: Vec<&str> = exams.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["general", "small"]);
    }

    #[test]
    fn load_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("general.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert!(load_bank_directory(&file).is_err());
    }
}
