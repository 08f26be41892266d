use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::grading::Grader;
use quizmark_core::model::{AnswerValue, Exam, Question, QuestionType, Submission};
use quizmark_core::normalize::coerce_to_sequence;
use quizmark_core::scoring::grade_submission;

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let grader = Grader::default();

    let choice = Question::new("mc", QuestionType::MultipleChoice, AnswerValue::text("B"))
        .with_options([("A", "One"), ("B", "Two"), ("C", "Three")]);
    group.bench_function("multiple_choice", |b| {
        let answer = AnswerValue::text(" b ");
        b.iter(|| grader.grade(black_box(&choice), black_box(&answer)))
    });

    let multi = Question::new(
        "ma",
        QuestionType::MultipleAnswer,
        AnswerValue::text(r#"["A","C","D"]"#),
    )
    .with_options([("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")]);
    group.bench_function("multiple_answer_encoded", |b| {
        let answer = AnswerValue::sequence(["d", "a", "c"]);
        b.iter(|| grader.grade(black_box(&multi), black_box(&answer)))
    });

    let steps: Vec<String> = (0..50).map(|i| format!("Step {i}")).collect();
    let ordering = Question::new(
        "ord",
        QuestionType::Ordering,
        AnswerValue::Sequence(steps.clone()),
    );
    group.bench_function("ordering_50", |b| {
        let answer = AnswerValue::Sequence(steps.clone());
        b.iter(|| grader.grade(black_box(&ordering), black_box(&answer)))
    });

    group.finish();
}

fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_to_sequence");

    group.bench_function("plain_text", |b| {
        let v = AnswerValue::text("Paris");
        b.iter(|| coerce_to_sequence(black_box(&v)))
    });

    group.bench_function("encoded_array", |b| {
        let v = AnswerValue::text(r#"["Paris","1889","Gustave Eiffel"]"#);
        b.iter(|| coerce_to_sequence(black_box(&v)))
    });

    group.bench_function("malformed_array", |b| {
        let v = AnswerValue::text("[Paris, 1889]");
        b.iter(|| coerce_to_sequence(black_box(&v)))
    });

    group.finish();
}

fn bench_submission(c: &mut Criterion) {
    let questions: Vec<Question> = (0..100)
        .map(|i| {
            Question::new(
                format!("q{i}"),
                QuestionType::FillBlank,
                AnswerValue::sequence(["alpha", "beta"]),
            )
        })
        .collect();
    let exam = Exam {
        id: "bench".into(),
        title: "Bench".into(),
        description: String::new(),
        passing_marks: Some(50),
        questions,
    };
    let submission = Submission {
        exam_id: Some("bench".into()),
        answers: (0..100)
            .map(|i| (format!("q{i}"), AnswerValue::sequence(["Alpha", "beta"])))
            .collect(),
    };
    let grader = Grader::default();

    c.bench_function("grade_submission_100", |b| {
        b.iter(|| grade_submission(black_box(&exam), black_box(&submission), &grader))
    });
}

criterion_group!(benches, bench_grade, bench_coerce, bench_submission);
criterion_main!(benches);
