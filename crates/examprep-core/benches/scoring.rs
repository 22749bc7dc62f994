use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use examprep_core::assembler::assemble_practice_exam;
use examprep_core::config::ExamConfig;
use examprep_core::index::index_by_domain;
use examprep_core::model::{AnswerMap, AnswerOption, Letter, Question};
use examprep_core::scoring::{score, score_by_domain};

fn make_question(id: u32, domain: u8) -> Question {
    Question {
        id,
        domain_label: format!("Domain {domain}: Bench"),
        domain_number: domain,
        question_text: format!("Bench question {id}?"),
        options: Letter::ALL
            .iter()
            .map(|&letter| AnswerOption {
                letter,
                text: format!("option {letter}"),
                is_correct: letter == Letter::C,
            })
            .collect(),
        excerpt: String::new(),
    }
}

fn make_corpus(per_domain: u32) -> Vec<Question> {
    (0..per_domain * 5)
        .map(|i| make_question(i + 1, (i % 5) as u8 + 1))
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let exam = make_corpus(31);

    let all_answered: AnswerMap = (0..exam.len())
        .map(|i| (i, if i % 4 == 0 { Letter::A } else { Letter::C }))
        .collect();
    let half_answered: AnswerMap = (0..exam.len())
        .filter(|i| i % 2 == 0)
        .map(|i| (i, Letter::C))
        .collect();

    group.bench_function("155_all_answered", |b| {
        b.iter(|| score(black_box(&exam), black_box(&all_answered), 80.0))
    });

    group.bench_function("155_half_answered", |b| {
        b.iter(|| score(black_box(&exam), black_box(&half_answered), 80.0))
    });

    group.bench_function("155_by_domain", |b| {
        b.iter(|| score_by_domain(black_box(&exam), black_box(&all_answered)))
    });

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_practice_exam");
    let quotas = ExamConfig::default().quota_table();

    let full = make_corpus(100);
    let short = make_corpus(20);

    group.bench_function("500_question_bank", |b| {
        let index = index_by_domain(&full);
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| assemble_practice_exam(black_box(&index), black_box(&quotas), &mut rng))
    });

    group.bench_function("100_question_bank_with_shortfall", |b| {
        let index = index_by_domain(&short);
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| assemble_practice_exam(black_box(&index), black_box(&quotas), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_assemble);
criterion_main!(benches);
