//! The `quizmark grade` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::config::load_config_from;
use quizmark_core::parser::{parse_bank, parse_submission, validate_exam};
use quizmark_core::report::GradeReport;
use quizmark_core::scoring::grade_submission;

pub fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let exam = parse_bank(&bank_path)?;
    let submission = parse_submission(&answers_path)?;

    for w in validate_exam(&exam) {
        match &w.question_id {
            Some(id) => tracing::warn!("[{id}] {}", w.message),
            None => tracing::warn!("{}", w.message),
        }
    }

    let graded = grade_submission(&exam, &submission, &config.grader());
    let report = GradeReport::new(&exam, graded);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "text" => print_summary(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, json, markdown)"),
    }

    if let Some(path) = &output {
        report.save_json(path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &GradeReport) {
    use comfy_table::{Cell, Table};

    let graded = &report.graded;

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Answer", "Result", "Marks"]);

    for r in &graded.results {
        table.add_row(vec![
            Cell::new(&r.question_id),
            Cell::new(&r.question_type),
            Cell::new(&r.user_answer),
            Cell::new(r.feedback.message()),
            Cell::new(format!("{}/{}", r.marks_obtained, r.marks)),
        ]);
    }

    println!("Exam: {}", graded.exam_title);
    println!("{table}");
    println!(
        "Score: {}/{} ({:.1}%), {} of {} answered",
        graded.total_score,
        graded.max_score,
        graded.percentage,
        graded.answered,
        graded.results.len()
    );

    match graded.passed {
        Some(true) => println!("Result: PASSED"),
        Some(false) => println!("Result: FAILED"),
        None if graded.pending_review > 0 => println!(
            "Result: PENDING ({} answer(s) need manual review)",
            graded.pending_review
        ),
        None => {}
    }
}
