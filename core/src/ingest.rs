//! Readers for the batch inputs: a directory of marked-up documents, a query
//! file and a relevance judgment file.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{CoreError, Result};
use crate::{DocId, QueryId, RawCorpus, RawQueries, Relevance};

lazy_static! {
    static ref DOC: Selector = Selector::parse("doc").expect("valid selector");
    static ref DOCNO: Selector = Selector::parse("docno").expect("valid selector");
    static ref FIELDS: Selector = Selector::parse("title, text").expect("valid selector");
}

/// Read every regular file directly inside `dir`. A file may hold one
/// document or several `<DOC>` elements; files without a numeric `<DOCNO>`
/// are skipped.
pub fn read_corpus<P: AsRef<Path>>(dir: P) -> Result<RawCorpus> {
    let dir = dir.as_ref();
    let mut corpus = RawCorpus::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            CoreError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let bytes = fs::read(path).map_err(|e| CoreError::io(path, e))?;
        let docs = parse_documents(&String::from_utf8_lossy(&bytes));
        if docs.is_empty() {
            tracing::warn!(path = %path.display(), "no DOCNO found, skipping file");
        }
        for (doc_id, text) in docs {
            if corpus.insert(doc_id, text).is_some() {
                tracing::warn!(doc_id, path = %path.display(), "duplicate document id, keeping the later one");
            }
        }
    }
    tracing::info!(dir = %dir.display(), num_docs = corpus.len(), "read corpus");
    Ok(corpus)
}

/// Extract `(DOCNO, title + text)` pairs from one file's markup.
pub fn parse_documents(markup: &str) -> Vec<(DocId, String)> {
    let joined = markup.lines().map(str::trim).collect::<Vec<_>>().join(" ");
    let html = Html::parse_document(&joined);
    let mut roots: Vec<ElementRef> = html.select(&DOC).collect();
    if roots.is_empty() {
        roots.push(html.root_element());
    }
    roots.into_iter().filter_map(parse_document).collect()
}

fn parse_document(root: ElementRef) -> Option<(DocId, String)> {
    let doc_id = root.select(&DOCNO).next()?.text().collect::<String>().trim().parse::<DocId>().ok()?;
    let text = root
        .select(&FIELDS)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    Some((doc_id, text))
}

/// One query per line; the 1-based line number is the query ID.
pub fn read_queries<P: AsRef<Path>>(path: P) -> Result<RawQueries> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    let queries: RawQueries = content
        .lines()
        .enumerate()
        .map(|(i, line)| ((i + 1) as QueryId, line.trim().to_string()))
        .collect();
    tracing::info!(path = %path.display(), num_queries = queries.len(), "read queries");
    Ok(queries)
}

/// Whitespace-separated `query_id doc_id` pairs, one judgment per line.
/// Columns after the second are ignored.
pub fn read_relevance<P: AsRef<Path>>(path: P) -> Result<Relevance> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    let mut relevance = Relevance::new();
    for (i, line) in content.lines().enumerate() {
        let parse_err = |message: String| CoreError::Parse { path: path.to_path_buf(), line: i + 1, message };
        let mut fields = line.split_whitespace();
        let Some(query) = fields.next() else { continue };
        let doc = fields.next().ok_or_else(|| parse_err("expected `query_id doc_id`".into()))?;
        let query: QueryId = query.parse().map_err(|e| parse_err(format!("bad query id {query:?}: {e}")))?;
        let doc: DocId = doc.parse().map_err(|e| parse_err(format!("bad document id {doc:?}: {e}")))?;
        relevance.entry(query).or_default().insert(doc);
    }
    tracing::info!(path = %path.display(), num_queries = relevance.len(), "read relevance judgments");
    Ok(relevance)
}
