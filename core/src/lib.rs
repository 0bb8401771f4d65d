//! Vector-space retrieval and evaluation.
//!
//! Raw documents and queries are normalized into terms, indexed, weighted with
//! TF-IDF, ranked by cosine similarity and scored against relevance judgments
//! with precision and recall at fixed cutoffs.

pub mod error;
pub mod eval;
pub mod index;
pub mod ingest;
pub mod normalizer;
pub mod pipeline;
pub mod ranking;
pub mod weighting;

use std::collections::{BTreeMap, BTreeSet};

pub type DocId = u32;
pub type QueryId = u32;

/// Raw text keyed by document ID, as produced by ingestion.
pub type RawCorpus = BTreeMap<DocId, String>;
/// Raw query text keyed by query ID.
pub type RawQueries = BTreeMap<QueryId, String>;
/// Normalized token sequences keyed by document ID.
pub type Corpus = BTreeMap<DocId, Vec<String>>;
/// Normalized token sequences keyed by query ID.
pub type QuerySet = BTreeMap<QueryId, Vec<String>>;
/// Raw term counts for one query.
pub type TermFreqs = BTreeMap<String, u32>;
/// Ground truth: relevant document IDs per query.
pub type Relevance = BTreeMap<QueryId, BTreeSet<DocId>>;
pub type DocNorms = BTreeMap<DocId, f64>;
pub type QueryNorms = BTreeMap<QueryId, f64>;

pub use error::{CoreError, Result};
pub use eval::{CutoffMetrics, Evaluator, Metrics, QueryMetrics};
pub use index::{IndexBuilder, InvertedIndex, TermEntry};
pub use normalizer::{Normalizer, StemCache, Stopwords};
pub use pipeline::{Pipeline, PipelineConfig, RetrievalRun};
pub use ranking::{RankedResults, ScoredDoc};
pub use weighting::{IdfScheme, VectorWeighter};
