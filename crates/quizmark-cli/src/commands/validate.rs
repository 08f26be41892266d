//! The `quizmark validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::model::Exam;
use quizmark_core::parser::{load_bank_directory, parse_bank, validate_exam};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let exams = if bank_path.is_dir() {
        load_bank_directory(&bank_path)?
    } else {
        vec![parse_bank(&bank_path)?]
    };
    anyhow::ensure!(
        !exams.is_empty(),
        "no question banks found in {}",
        bank_path.display()
    );

    let mut total_warnings = 0;

    for exam in &exams {
        println!(
            "Exam: {} ({} questions, {} marks)",
            exam.title,
            exam.questions.len(),
            exam.total_marks()
        );
        println!("  types: {}", type_breakdown(exam));

        let warnings = validate_exam(exam);
        for w in &warnings {
            match &w.question_id {
                Some(id) => println!("  [{id}] WARNING: {}", w.message),
                None => println!("  WARNING: {}", w.message),
            }
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn type_breakdown(exam: &Exam) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for q in &exam.questions {
        *counts.entry(q.question_type.to_string()).or_default() += 1;
    }
    counts
        .iter()
        .map(|(qt, n)| format!("{qt} x{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}
