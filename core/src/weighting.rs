use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::InvertedIndex;
use crate::{DocNorms, QueryId, QueryNorms, TermFreqs};

/// How inverse document frequency is derived from `N` and `df`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfScheme {
    /// `log10(N / df)`. A term found in every document weighs zero, so it
    /// retrieves documents only with a score of 0.
    #[default]
    Standard,
    /// `log10(1 + N / df)`; terms found in every document keep a positive weight.
    Smoothed,
}

/// TF-IDF weights and vector lengths against one document collection.
///
/// Queries are weighted with the collection's IDF, never their own.
#[derive(Debug, Clone, Copy)]
pub struct VectorWeighter {
    num_docs: u32,
    scheme: IdfScheme,
}

impl VectorWeighter {
    pub fn new(num_docs: u32, scheme: IdfScheme) -> Self { Self { num_docs, scheme } }

    pub fn for_index(index: &InvertedIndex, scheme: IdfScheme) -> Self {
        Self::new(index.num_docs(), scheme)
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn scheme(&self) -> IdfScheme { self.scheme }

    pub fn idf(&self, document_frequency: u32) -> f64 {
        if document_frequency == 0 || self.num_docs == 0 {
            return 0.0;
        }
        let ratio = self.num_docs as f64 / document_frequency as f64;
        match self.scheme {
            IdfScheme::Standard => ratio.log10(),
            IdfScheme::Smoothed => (1.0 + ratio).log10(),
        }
    }

    /// L2 norm of every indexed document's TF-IDF vector. Documents without
    /// any indexed term are absent.
    pub fn document_norms(&self, index: &InvertedIndex) -> DocNorms {
        let mut sums: DocNorms = BTreeMap::new();
        for (_, entry) in index.terms() {
            let idf = self.idf(entry.document_frequency);
            for (doc_id, tf) in &entry.postings {
                let w = *tf as f64 * idf;
                *sums.entry(*doc_id).or_insert(0.0) += w * w;
            }
        }
        for norm in sums.values_mut() {
            *norm = norm.sqrt();
        }
        sums
    }

    /// L2 norm of one query vector. Out-of-vocabulary terms are ignored.
    pub fn query_norm(&self, tf: &TermFreqs, index: &InvertedIndex) -> Option<f64> {
        let mut sum: Option<f64> = None;
        for (term, count) in tf {
            if let Some(entry) = index.get(term) {
                let w = *count as f64 * self.idf(entry.document_frequency);
                *sum.get_or_insert(0.0) += w * w;
            }
        }
        sum.map(f64::sqrt)
    }

    /// Norms for every query sharing at least one term with the index.
    pub fn query_norms(&self, queries: &BTreeMap<QueryId, TermFreqs>, index: &InvertedIndex) -> QueryNorms {
        queries
            .iter()
            .filter_map(|(qid, tf)| self.query_norm(tf, index).map(|norm| (*qid, norm)))
            .collect()
    }
}

/// Multiset count of a normalized token sequence.
pub fn term_frequencies(tokens: &[String]) -> TermFreqs {
    let mut tf = TermFreqs::new();
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0) += 1;
    }
    tf
}
