use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::eval::{Evaluator, Metrics, DEFAULT_CUTOFFS};
use crate::index::InvertedIndex;
use crate::normalizer::{Normalizer, Stopwords, DEFAULT_STEM_CACHE_CAPACITY};
use crate::ranking::{self, RankedResults};
use crate::weighting::{term_frequencies, IdfScheme, VectorWeighter};
use crate::{DocNorms, QueryId, QueryNorms, RawCorpus, RawQueries, Relevance, TermFreqs};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub cutoffs: Vec<usize>,
    pub stem_cache_capacity: usize,
    pub idf: IdfScheme,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            stem_cache_capacity: DEFAULT_STEM_CACHE_CAPACITY,
            idf: IdfScheme::Standard,
        }
    }
}

/// Every intermediate structure of one run, for callers that report more
/// than the metrics.
#[derive(Debug, Clone)]
pub struct RetrievalRun {
    pub index: InvertedIndex,
    pub doc_norms: DocNorms,
    pub query_terms: BTreeMap<QueryId, TermFreqs>,
    pub query_norms: QueryNorms,
    pub ranked: RankedResults,
    pub metrics: Metrics,
}

pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    evaluator: Evaluator,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, stopwords: Stopwords) -> Result<Self> {
        let evaluator = Evaluator::new(config.cutoffs.clone())?;
        let normalizer = Normalizer::new(stopwords, config.stem_cache_capacity);
        Ok(Self { config, normalizer, evaluator })
    }

    pub fn config(&self) -> &PipelineConfig { &self.config }

    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    pub fn run(&self, docs: &RawCorpus, queries: &RawQueries, relevance: &Relevance) -> RetrievalRun {
        let corpus = self.normalizer.normalize_all(docs);
        let index = InvertedIndex::build(&corpus);
        let weighter = VectorWeighter::for_index(&index, self.config.idf);
        let doc_norms = weighter.document_norms(&index);

        let query_terms: BTreeMap<QueryId, TermFreqs> = self
            .normalizer
            .normalize_all(queries)
            .iter()
            .map(|(qid, tokens)| (*qid, term_frequencies(tokens)))
            .collect();
        let query_norms = weighter.query_norms(&query_terms, &index);

        let ranked = ranking::rank(&weighter, &query_terms, &index, &doc_norms, &query_norms);
        let metrics = self.evaluator.evaluate(relevance, &ranked);

        let cache = self.normalizer.cache();
        tracing::info!(
            num_docs = index.num_docs(),
            num_terms = index.num_terms(),
            num_queries = query_terms.len(),
            retrieved = ranked.pairs().len(),
            stem_cache_hit_rate = cache.hit_rate(),
            "retrieval run complete"
        );
        RetrievalRun { index, doc_norms, query_terms, query_norms, ranked, metrics }
    }
}
