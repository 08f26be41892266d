//! Grade report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Exam;
use crate::scoring::GradedExam;

/// A persisted record of one graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the exam that was graded.
    pub exam: ExamSummary,
    /// Per-question results and totals.
    pub graded: GradedExam,
}

/// Summary of an exam (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub passing_marks: Option<u32>,
}

impl GradeReport {
    pub fn new(exam: &Exam, graded: GradedExam) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam: ExamSummary {
                id: exam.id.clone(),
                title: exam.title.clone(),
                question_count: exam.questions.len(),
                passing_marks: exam.passing_marks,
            },
            graded,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Render the per-question results as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("## {}\n\n", self.exam.title));
        md.push_str(&format!(
            "Score: **{}/{}** ({:.1}%)",
            self.graded.total_score, self.graded.max_score, self.graded.percentage
        ));
        match self.graded.passed {
            Some(true) => md.push_str(" (passed)\n\n"),
            Some(false) => md.push_str(" (failed)\n\n"),
            None => md.push_str("\n\n"),
        }

        md.push_str("| Question | Type | Result | Marks |\n");
        md.push_str("|----------|------|--------|-------|\n");
        for r in &self.graded.results {
            md.push_str(&format!(
                "| {} | {} | {} | {}/{} |\n",
                r.question_id,
                r.question_type,
                r.feedback.message(),
                r.marks_obtained,
                r.marks
            ));
        }

        if self.graded.pending_review > 0 {
            md.push_str(&format!(
                "\n{} answer(s) need manual review.\n",
                self.graded.pending_review
            ));
        }
        md
    }
}
