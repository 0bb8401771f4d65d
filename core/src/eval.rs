//! Precision and recall at fixed rank cutoffs.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, Result};
use crate::ranking::{RankedResults, ScoredDoc};
use crate::{DocId, QueryId, Relevance};

pub const DEFAULT_CUTOFFS: [usize; 4] = [10, 50, 100, 500];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetrics {
    /// Top-`n` documents in rank order; shorter than `n` when fewer were retrieved.
    pub retrieved: Vec<DocId>,
    pub relevant_retrieved: Vec<DocId>,
    /// Always divided by the nominal cutoff, not by `retrieved.len()`.
    pub precision: f64,
    /// `None` when the query has no relevance judgments.
    pub recall: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoffMetrics {
    pub cutoff: usize,
    pub queries: BTreeMap<QueryId, QueryMetrics>,
    /// Averages over the queries with a defined recall; `None` if there are none.
    pub average_precision: Option<f64>,
    pub average_recall: Option<f64>,
    pub averaged_queries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub cutoffs: Vec<CutoffMetrics>,
}

impl Metrics {
    pub fn at(&self, cutoff: usize) -> Option<&CutoffMetrics> {
        self.cutoffs.iter().find(|c| c.cutoff == cutoff)
    }
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    cutoffs: Vec<usize>,
}

impl Default for Evaluator {
    fn default() -> Self { Self { cutoffs: DEFAULT_CUTOFFS.to_vec() } }
}

impl Evaluator {
    pub fn new(cutoffs: Vec<usize>) -> Result<Self> {
        if cutoffs.is_empty() {
            return Err(CoreError::NoCutoffs);
        }
        if let Some(&bad) = cutoffs.iter().find(|&&n| n == 0) {
            return Err(CoreError::InvalidCutoff(bad));
        }
        Ok(Self { cutoffs })
    }

    pub fn cutoffs(&self) -> &[usize] { &self.cutoffs }

    /// Evaluate every ranked query at every cutoff. Judgments for queries
    /// that were never ranked are ignored.
    pub fn evaluate(&self, relevance: &Relevance, ranked: &RankedResults) -> Metrics {
        let unknown = relevance.keys().filter(|q| ranked.get(**q).is_none()).count();
        if unknown > 0 {
            tracing::warn!(unknown, "ignoring relevance judgments for queries that were not ranked");
        }
        let empty = BTreeSet::new();
        let cutoffs = self
            .cutoffs
            .iter()
            .map(|&cutoff| {
                let queries: BTreeMap<QueryId, QueryMetrics> = ranked
                    .iter()
                    .map(|(qid, list)| {
                        let relevant = relevance.get(&qid).unwrap_or(&empty);
                        (qid, evaluate_query(cutoff, relevant, list))
                    })
                    .collect();
                summarize(cutoff, queries)
            })
            .collect();
        Metrics { cutoffs }
    }
}

pub fn evaluate_query(cutoff: usize, relevant: &BTreeSet<DocId>, ranked: &[ScoredDoc]) -> QueryMetrics {
    let retrieved: Vec<DocId> = ranked.iter().take(cutoff).map(|d| d.doc_id).collect();
    let relevant_retrieved: Vec<DocId> = retrieved.iter().copied().filter(|d| relevant.contains(d)).collect();
    let hits = relevant_retrieved.len() as f64;
    let recall = if relevant.is_empty() { None } else { Some(hits / relevant.len() as f64) };
    QueryMetrics { retrieved, relevant_retrieved, precision: hits / cutoff as f64, recall }
}

fn summarize(cutoff: usize, queries: BTreeMap<QueryId, QueryMetrics>) -> CutoffMetrics {
    let defined: Vec<(f64, f64)> = queries
        .values()
        .filter_map(|m| m.recall.map(|r| (m.precision, r)))
        .collect();
    let count = defined.len();
    let (average_precision, average_recall) = if count == 0 {
        (None, None)
    } else {
        let (p, r) = defined.iter().fold((0.0, 0.0), |(p, r), (dp, dr)| (p + dp, r + dr));
        (Some(p / count as f64), Some(r / count as f64))
    };
    CutoffMetrics { cutoff, queries, average_precision, average_recall, averaged_queries: count }
}
