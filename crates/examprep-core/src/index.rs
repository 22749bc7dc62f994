//! Domain index: questions grouped by domain number.

use std::collections::BTreeMap;

use crate::config::DomainQuota;
use crate::model::Question;

/// Questions of one corpus grouped by `domain_number`, corpus order kept.
///
/// Groups hold corpus positions so the assembler can track which entries are
/// already taken. The index borrows the corpus and is rebuilt whenever the
/// corpus changes.
#[derive(Debug, Clone)]
pub struct DomainIndex<'a> {
    corpus: &'a [Question],
    groups: BTreeMap<u8, Vec<usize>>,
}

/// A domain whose pool holds fewer questions than its quota asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub domain: u8,
    pub quota: usize,
    pub available: usize,
}

impl Shortfall {
    /// Questions that must be borrowed from other domains.
    pub fn missing(&self) -> usize {
        self.quota - self.available
    }
}

/// Group a corpus by domain number.
pub fn index_by_domain(corpus: &[Question]) -> DomainIndex<'_> {
    DomainIndex::build(corpus)
}

impl<'a> DomainIndex<'a> {
    pub fn build(corpus: &'a [Question]) -> Self {
        let mut groups: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
        for (position, question) in corpus.iter().enumerate() {
            groups
                .entry(question.domain_number)
                .or_default()
                .push(position);
        }
        Self { corpus, groups }
    }

    /// The corpus this index was built from.
    pub fn corpus(&self) -> &'a [Question] {
        self.corpus
    }

    /// Corpus positions of the questions in `domain`.
    pub fn positions(&self, domain: u8) -> &[usize] {
        self.groups.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Questions in `domain`, in corpus order.
    pub fn pool(&self, domain: u8) -> Vec<&'a Question> {
        let corpus = self.corpus;
        self.positions(domain)
            .iter()
            .map(|&position| &corpus[position])
            .collect()
    }

    /// Number of questions in `domain`.
    pub fn count(&self, domain: u8) -> usize {
        self.positions(domain).len()
    }

    /// Question count per domain, including the unknown domain when present.
    pub fn counts(&self) -> BTreeMap<u8, usize> {
        self.groups
            .iter()
            .map(|(&domain, positions)| (domain, positions.len()))
            .collect()
    }

    /// Domains that cannot fill their quota on their own.
    pub fn shortfalls(&self, quotas: &[DomainQuota]) -> Vec<Shortfall> {
        quotas
            .iter()
            .filter_map(|q| {
                let available = self.count(q.domain);
                (available < q.count).then_some(Shortfall {
                    domain: q.domain,
                    quota: q.count,
                    available,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}
