//! The `quizmark check` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::config::load_config_from;
use quizmark_core::grading::{ElementResults, LabelMark, Outcome};
use quizmark_core::model::AnswerValue;
use quizmark_core::parser::parse_bank;

pub fn execute(
    bank_path: PathBuf,
    question_id: String,
    raw_answer: String,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let exam = parse_bank(&bank_path)?;

    let Some(question) = exam.question(&question_id) else {
        anyhow::bail!(
            "question '{}' not found in {}",
            question_id,
            bank_path.display()
        );
    };

    let answer = AnswerValue::parse_input(&raw_answer);
    let verdict = config.grader().grade(question, &answer);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    if !question.question_type.is_supported() {
        println!(
            "Warning: unsupported question type '{}'",
            question.question_type
        );
    }

    match verdict.outcome {
        Outcome::Correct => println!("{question_id}: correct"),
        Outcome::Incorrect => println!("{question_id}: incorrect"),
        Outcome::Ungraded => println!("{question_id}: ungraded (needs manual review)"),
    }

    match &verdict.element_results {
        Some(ElementResults::Positions(marks)) => {
            for (i, ok) in marks.iter().enumerate() {
                println!("  [{}] {}", i + 1, if *ok { "ok" } else { "wrong" });
            }
        }
        Some(ElementResults::Labels(marks)) => {
            for (label, mark) in marks {
                let text = match mark {
                    LabelMark::Correct => "correct",
                    LabelMark::Incorrect => "incorrect",
                    LabelMark::Missed => "missed",
                    LabelMark::Unselected => "unselected",
                };
                println!("  {label}: {text}");
            }
        }
        None => {}
    }

    Ok(())
}
