//! The `quizmark init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("quizmark.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("question-banks")?;
    write_if_absent(Path::new("question-banks/example.toml"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Edit question-banks/example.toml with your questions");
    println!("  2. Run: quizmark validate --bank question-banks/example.toml");
    println!(
        "  3. Run: quizmark check --bank question-banks/example.toml --question capital --answer b"
    );

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

# Letter case handling per question type: "upper", "lower", or "sensitive".
# Surrounding whitespace is always ignored.
[case_folding]
multiple_choice = "upper"
true_false = "upper"
multiple_answer = "upper"
fill_blank = "lower"
short_answer = "lower"
ordering = "sensitive"
"#;

const EXAMPLE_BANK: &str = r#"[exam]
id = "example"
title = "Example Exam"
description = "A small exam to get started"
passing_marks = 3

[[questions]]
id = "capital"
question_text = "Which city is the capital of France?"
question_type = "multiple_choice"
correct_answer = "B"
explanation = "Paris has been the capital since 987."

[questions.options]
A = "Lyon"
B = "Paris"
C = "Marseille"
D = "Nice"

[[questions]]
id = "primes"
question_text = "Select every prime number."
question_type = "multiple_answer"
correct_answer = ["A", "C"]

[questions.options]
A = "2"
B = "9"
C = "11"
D = "15"

[[questions]]
id = "steps"
question_text = "Put the baking steps in order."
question_type = "ordering"
correct_answer = ["Mix", "Bake", "Cool"]
marks = 2

[[questions]]
id = "reflection"
question_text = "Describe what you learned."
question_type = "essay"
"#;
