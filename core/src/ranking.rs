use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::index::InvertedIndex;
use crate::weighting::VectorWeighter;
use crate::{DocId, DocNorms, QueryId, QueryNorms, TermFreqs};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Ranked documents per query, best first. Equal scores are ordered by
/// ascending document ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResults {
    lists: BTreeMap<QueryId, Vec<ScoredDoc>>,
}

impl RankedResults {
    pub fn get(&self, query_id: QueryId) -> Option<&[ScoredDoc]> {
        self.lists.get(&query_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryId, &[ScoredDoc])> {
        self.lists.iter().map(|(q, list)| (*q, list.as_slice()))
    }

    pub fn query_ids(&self) -> impl Iterator<Item = QueryId> + '_ { self.lists.keys().copied() }

    /// Every retrieved `(query, document)` pair in rank order.
    pub fn pairs(&self) -> Vec<(QueryId, DocId)> {
        self.iter()
            .flat_map(|(q, list)| list.iter().map(move |d| (q, d.doc_id)))
            .collect()
    }

    pub fn len(&self) -> usize { self.lists.len() }

    pub fn is_empty(&self) -> bool { self.lists.is_empty() }
}

impl FromIterator<(QueryId, Vec<ScoredDoc>)> for RankedResults {
    fn from_iter<I: IntoIterator<Item = (QueryId, Vec<ScoredDoc>)>>(iter: I) -> Self {
        Self { lists: iter.into_iter().collect() }
    }
}

/// Cosine similarity of one query against every document sharing an indexed
/// term with it. Only the postings of the query's terms are visited.
///
/// A query without a positive norm retrieves nothing; documents without a
/// positive norm are never scored.
pub fn rank_query(
    weighter: &VectorWeighter,
    tf: &TermFreqs,
    query_norm: Option<f64>,
    index: &InvertedIndex,
    doc_norms: &DocNorms,
) -> Vec<ScoredDoc> {
    let query_norm = match query_norm {
        Some(n) if n > 0.0 => n,
        _ => return Vec::new(),
    };
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for (term, tfq) in tf {
        let Some(entry) = index.get(term) else { continue };
        let idf = weighter.idf(entry.document_frequency);
        let tfq = *tfq as f64;
        for (doc_id, tfd) in &entry.postings {
            let doc_norm = match doc_norms.get(doc_id) {
                Some(n) if *n > 0.0 => *n,
                _ => continue,
            };
            let contrib = (tfq * idf * *tfd as f64 * idf) / (doc_norm * query_norm);
            *scores.entry(*doc_id).or_insert(0.0) += contrib;
        }
    }

    let mut ranked: Vec<ScoredDoc> = scores
        .into_iter()
        .map(|(doc_id, score)| ScoredDoc { doc_id, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
    ranked
}

/// Rank every query. Each query ID appears in the result, with an empty list
/// when nothing could be retrieved for it.
pub fn rank(
    weighter: &VectorWeighter,
    queries: &BTreeMap<QueryId, TermFreqs>,
    index: &InvertedIndex,
    doc_norms: &DocNorms,
    query_norms: &QueryNorms,
) -> RankedResults {
    queries
        .iter()
        .map(|(qid, tf)| {
            let list = rank_query(weighter, tf, query_norms.get(qid).copied(), index, doc_norms);
            if list.is_empty() {
                tracing::debug!(query_id = qid, "query retrieved no documents");
            }
            (*qid, list)
        })
        .collect()
}
