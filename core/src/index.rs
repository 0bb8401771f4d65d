use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::{Corpus, DocId};

/// Per-term record. `document_frequency` always equals `postings.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub document_frequency: u32,
    /// Raw term frequency per document.
    pub postings: BTreeMap<DocId, u32>,
}

impl TermEntry {
    fn add_occurrences(&mut self, doc_id: DocId, count: u32) {
        match self.postings.entry(doc_id) {
            Entry::Occupied(mut e) => *e.get_mut() += count,
            Entry::Vacant(e) => {
                e.insert(count);
                self.document_frequency += 1;
            }
        }
    }
}

/// Sparse term -> postings mapping over a fixed document collection.
///
/// Ordered maps keep iteration, and therefore every floating point sum taken
/// over the index, identical from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: BTreeMap<String, TermEntry>,
    docs: BTreeSet<DocId>,
}

impl InvertedIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut builder = IndexBuilder::new();
        for (doc_id, tokens) in corpus {
            builder.add_document(*doc_id, tokens);
        }
        let index = builder.finish();
        tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "built inverted index");
        index
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> { self.terms.get(term) }

    pub fn contains(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &TermEntry)> {
        self.terms.iter().map(|(t, e)| (t.as_str(), e))
    }

    /// Documents in the collection, including those that contributed no terms.
    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ { self.docs.iter().copied() }

    pub fn num_docs(&self) -> u32 { self.docs.len() as u32 }

    pub fn num_terms(&self) -> usize { self.terms.len() }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.terms.get(term).map_or(0, |e| e.document_frequency)
    }
}

/// Accumulates documents into an [`InvertedIndex`]. Partial builders over
/// shards of a collection can be merged in any order and grouping.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    index: InvertedIndex,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    /// Register a document and count its tokens. An empty token slice still
    /// adds the document to the collection.
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[String]) {
        self.index.docs.insert(doc_id);
        for term in tokens {
            // avoid allocating for terms already in the dictionary
            if let Some(entry) = self.index.terms.get_mut(term.as_str()) {
                entry.add_occurrences(doc_id, 1);
            } else {
                let mut entry = TermEntry::default();
                entry.add_occurrences(doc_id, 1);
                self.index.terms.insert(term.clone(), entry);
            }
        }
    }

    /// Union postings per term, summing counts for documents present on both
    /// sides.
    pub fn merge(mut self, other: IndexBuilder) -> IndexBuilder {
        self.index.docs.extend(other.index.docs);
        for (term, theirs) in other.index.terms {
            let ours = self.index.terms.entry(term).or_default();
            for (doc_id, count) in theirs.postings {
                ours.add_occurrences(doc_id, count);
            }
        }
        self
    }

    pub fn finish(self) -> InvertedIndex { self.index }
}
