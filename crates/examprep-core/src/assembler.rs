//! Exam assembly: stratified practice exams and single-domain study sessions.
//!
//! Both entry points take the random source as a parameter. Production code
//! passes a freshly seeded generator per session; tests pass `StdRng` with a
//! fixed seed, or a constant `StepRng`, and assert exact selections.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DomainQuota;
use crate::index::DomainIndex;
use crate::model::Question;

/// Build a practice exam from per-domain quotas.
///
/// Each domain in `quotas` is visited in order and contributes `count`
/// questions drawn uniformly without replacement. A domain whose pool is too
/// small contributes everything it has, and the shortfall is drawn from the
/// questions of every other domain. A corpus entry is never selected twice
/// in one exam: each draw skips entries already taken earlier in the pass.
/// When the corpus is too small overall the exam is simply shorter.
///
/// The result is shuffled so domain order is not visible to the taker.
pub fn assemble_practice_exam<R: Rng + ?Sized>(
    index: &DomainIndex<'_>,
    quotas: &[DomainQuota],
    rng: &mut R,
) -> Vec<Question> {
    let corpus = index.corpus();
    let nominal: usize = quotas.iter().map(|q| q.count).sum();
    let mut taken = vec![false; corpus.len()];
    let mut selected: Vec<usize> = Vec::with_capacity(nominal);

    for quota in quotas {
        let own: Vec<usize> = index
            .positions(quota.domain)
            .iter()
            .copied()
            .filter(|&p| !taken[p])
            .collect();
        let drawn = draw(&own, quota.count, rng);
        mark_taken(&mut taken, &mut selected, &drawn);

        let missing = quota.count - drawn.len();
        if missing == 0 {
            continue;
        }

        let others: Vec<usize> = corpus
            .iter()
            .enumerate()
            .filter(|&(p, q)| !taken[p] && q.domain_number != quota.domain)
            .map(|(p, _)| p)
            .collect();
        let borrowed = draw(&others, missing, rng);
        tracing::warn!(
            domain = quota.domain,
            quota = quota.count,
            available = drawn.len(),
            borrowed = borrowed.len(),
            "domain pool is short of its quota, borrowing from other domains"
        );
        mark_taken(&mut taken, &mut selected, &borrowed);
    }

    if selected.len() < nominal {
        tracing::warn!(
            selected = selected.len(),
            nominal,
            "question bank too small for a full practice exam"
        );
    }

    selected.shuffle(rng);
    tracing::debug!(questions = selected.len(), "assembled practice exam");
    selected.into_iter().map(|p| corpus[p].clone()).collect()
}

/// Draw `count` questions uniformly without replacement from one domain pool.
///
/// Callers keep `count` within `1..=pool.len()`; see [`clamp_study_count`].
pub fn assemble_study_session<R: Rng + ?Sized>(
    pool: &[&Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    pool.choose_multiple(rng, count).map(|&q| q.clone()).collect()
}

/// Constrain a requested study session size to `1..=available`.
///
/// Returns 0 only when the pool is empty.
pub fn clamp_study_count(requested: usize, available: usize) -> usize {
    requested.clamp(1, available.max(1)).min(available)
}

fn draw<R: Rng + ?Sized>(pool: &[usize], amount: usize, rng: &mut R) -> Vec<usize> {
    pool.choose_multiple(rng, amount).copied().collect()
}

fn mark_taken(taken: &mut [bool], selected: &mut Vec<usize>, positions: &[usize]) {
    for &p in positions {
        taken[p] = true;
        selected.push(p);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::ExamConfig;
    use crate::index::index_by_domain;
    use crate::model::fixtures::{corpus, question};
    use crate::model::Letter;

    fn domain_counts(exam: &[Question]) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for q in exam {
            *counts.entry(q.domain_number).or_insert(0) += 1;
        }
        counts
    }

    fn assert_unique(exam: &[Question]) {
        let ids: HashSet<u32> = exam.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), exam.len(), "exam contains a duplicate question");
    }

    #[test]
    fn stratified_counts_match_quotas() {
        let corpus = corpus([40, 40, 40, 40, 40]);
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();
        let mut rng = StdRng::seed_from_u64(7);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);

        assert_eq!(exam.len(), 152);
        assert_unique(&exam);
        assert!(exam.iter().all(|q| corpus.contains(q)));
        let counts = domain_counts(&exam);
        for quota in &quotas {
            assert_eq!(counts.get(&quota.domain), Some(&quota.count));
        }
    }

    #[test]
    fn result_is_shuffled_across_domains() {
        let corpus = corpus([40, 40, 40, 40, 40]);
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();
        let mut rng = StdRng::seed_from_u64(11);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);
        let sorted = exam
            .windows(2)
            .all(|w| w[0].domain_number <= w[1].domain_number);
        assert!(!sorted, "domains should be interleaved after the shuffle");
    }

    #[test]
    fn shortfall_is_borrowed_from_other_domains() {
        let corpus = corpus([10, 60, 60, 60, 60]);
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();
        let mut rng = StdRng::seed_from_u64(3);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);

        assert_eq!(exam.len(), 152);
        assert_unique(&exam);
        let counts = domain_counts(&exam);
        assert_eq!(counts.get(&1), Some(&10));

        let mut overshoot = 0;
        for quota in quotas.iter().skip(1) {
            let got = counts.get(&quota.domain).copied().unwrap_or(0);
            assert!(got >= quota.count);
            assert!(got <= quota.count + 22);
            overshoot += got - quota.count;
        }
        assert_eq!(overshoot, 22);
    }

    #[test]
    fn borrowing_never_duplicates_across_domains() {
        // Domain 1 borrows heavily from domain 2, which then runs short too.
        let corpus = corpus([0, 12, 0, 0, 0]);
        let index = index_by_domain(&corpus);
        let quotas = [
            DomainQuota { domain: 1, count: 8 },
            DomainQuota { domain: 2, count: 8 },
        ];
        let mut rng = StdRng::seed_from_u64(5);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);

        assert_eq!(exam.len(), 12);
        assert_unique(&exam);
    }

    #[test]
    fn small_corpus_gives_short_exam() {
        let corpus = corpus([2, 2, 2, 2, 2]);
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();
        let mut rng = StdRng::seed_from_u64(1);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);

        assert_eq!(exam.len(), 10);
        assert_unique(&exam);
    }

    #[test]
    fn unknown_domain_questions_fill_shortfalls() {
        let corpus: Vec<Question> = (1..=5).map(|id| question(id, 0, Some(Letter::A))).collect();
        let index = index_by_domain(&corpus);
        let quotas = [DomainQuota { domain: 1, count: 3 }];
        let mut rng = StdRng::seed_from_u64(9);

        let exam = assemble_practice_exam(&index, &quotas, &mut rng);

        assert_eq!(exam.len(), 3);
        assert!(exam.iter().all(|q| q.domain_number == 0));
    }

    #[test]
    fn same_seed_same_exam() {
        let corpus = corpus([40, 40, 40, 40, 40]);
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();

        let first = assemble_practice_exam(&index, &quotas, &mut StdRng::seed_from_u64(42));
        let second = assemble_practice_exam(&index, &quotas, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn constant_rng_pins_exact_selection() {
        // ids 1..=3 in domain 1, ids 4..=6 in domain 2, nothing in domain 3.
        let corpus = corpus([3, 3, 0, 0, 0]);
        let index = index_by_domain(&corpus);
        let quotas = [
            DomainQuota { domain: 1, count: 1 },
            DomainQuota { domain: 2, count: 1 },
            DomainQuota { domain: 3, count: 1 },
        ];

        // An all-zero generator always takes the lowest index: each domain
        // draws its first untaken question, domain 3 borrows id 2, and the
        // shuffle rotates [1, 4, 2] into [4, 2, 1].
        let mut rng = StepRng::new(0, 0);
        let exam = assemble_practice_exam(&index, &quotas, &mut rng);
        let ids: Vec<u32> = exam.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn empty_corpus_gives_empty_exam() {
        let corpus: Vec<Question> = Vec::new();
        let index = index_by_domain(&corpus);
        let quotas = ExamConfig::default().quota_table();
        let exam = assemble_practice_exam(&index, &quotas, &mut StdRng::seed_from_u64(0));
        assert!(exam.is_empty());
    }

    #[test]
    fn study_session_draws_without_replacement() {
        let corpus = corpus([0, 0, 25, 0, 0]);
        let index = index_by_domain(&corpus);
        let pool = index.pool(3);
        let mut rng = StdRng::seed_from_u64(21);

        let session = assemble_study_session(&pool, 10, &mut rng);
        assert_eq!(session.len(), 10);
        assert_unique(&session);
        assert!(session.iter().all(|q| q.domain_number == 3));

        let all = assemble_study_session(&pool, pool.len(), &mut rng);
        assert_eq!(all.len(), 25);
        assert_unique(&all);
    }

    #[test]
    fn clamp_study_count_bounds() {
        assert_eq!(clamp_study_count(10, 25), 10);
        assert_eq!(clamp_study_count(0, 25), 1);
        assert_eq!(clamp_study_count(40, 25), 25);
        assert_eq!(clamp_study_count(5, 0), 0);
    }
}
