use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;
use vsm_core::ingest::{read_corpus, read_queries, read_relevance};
use vsm_core::{IdfScheme, Pipeline, PipelineConfig, RawCorpus, RawQueries, Relevance, Stopwords};

fn raw(entries: &[(u32, &str)]) -> RawCorpus {
    entries.iter().map(|(id, text)| (*id, text.to_string())).collect()
}

fn pipeline(idf: IdfScheme, cutoffs: Vec<usize>) -> Pipeline {
    let config = PipelineConfig { cutoffs, idf, ..PipelineConfig::default() };
    Pipeline::new(config, Stopwords::empty()).unwrap()
}

#[test]
fn shared_terms_rank_higher() {
    let docs = raw(&[(1, "cat sat mat"), (2, "dog sat log")]);
    let queries: RawQueries = raw(&[(1, "cat sat")]);

    let run = pipeline(IdfScheme::Smoothed, vec![10]).run(&docs, &queries, &Relevance::new());
    let list = run.ranked.get(1).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].doc_id, 1);
    assert_eq!(list[1].doc_id, 2);
    assert!(list[0].score > list[1].score);
    assert!(list[1].score > 0.0);
}

#[test]
fn standard_idf_zeroes_terms_found_everywhere() {
    let docs = raw(&[(1, "cat sat mat"), (2, "dog sat log")]);
    let queries: RawQueries = raw(&[(1, "cat sat")]);

    let run = pipeline(IdfScheme::Standard, vec![10]).run(&docs, &queries, &Relevance::new());
    let list = run.ranked.get(1).unwrap();
    // doc 2 only shares "sat", which occurs in every document
    assert_eq!(list.iter().map(|d| d.doc_id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(list[0].score > 0.0);
    assert_eq!(list[1].score, 0.0);
}

#[test]
fn precision_penalizes_short_rankings() {
    let docs = raw(&[
        (1, "wing flutter"),
        (2, "wing stall"),
        (3, "wing flutter stall"),
        (4, "boundary layer"),
        (5, "heat transfer"),
    ]);
    let queries = raw(&[(1, "wing")]);
    let mut relevance = Relevance::new();
    relevance.insert(1, BTreeSet::from([1, 3, 4]));

    let run = pipeline(IdfScheme::Standard, vec![10]).run(&docs, &queries, &relevance);
    let at10 = run.metrics.at(10).unwrap();
    let q = &at10.queries[&1];
    assert_eq!(q.retrieved.len(), 3);
    assert_eq!(q.relevant_retrieved.len(), 2);
    assert!((q.precision - 0.2).abs() < 1e-12);
    assert!((q.recall.unwrap() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn queries_without_judgments_stay_out_of_averages() {
    let docs = raw(&[(1, "wing flutter"), (2, "heat transfer"), (3, "shock wave")]);
    let queries = raw(&[(1, "wing"), (2, "heat")]);
    let mut relevance = Relevance::new();
    relevance.insert(1, BTreeSet::from([1]));

    let run = pipeline(IdfScheme::Standard, vec![1, 2]).run(&docs, &queries, &relevance);
    for cutoff in &run.metrics.cutoffs {
        assert_eq!(cutoff.averaged_queries, 1);
        assert_eq!(cutoff.average_recall, Some(1.0));
        assert_eq!(cutoff.queries[&2].recall, None);
    }
    assert_eq!(run.metrics.at(2).unwrap().average_precision, Some(0.5));
}

#[test]
fn runs_are_deterministic() {
    let docs = raw(&[
        (10, "supersonic flow over a flat plate with heat transfer"),
        (11, "boundary layer transition on a flat plate"),
        (12, "shock wave boundary layer interaction"),
        (13, "heat transfer in hypersonic flow"),
        (14, "wing flutter at transonic speeds"),
    ]);
    let queries = raw(&[(1, "flat plate heat transfer"), (2, "boundary layer shock"), (3, "the of and")]);
    let mut relevance = Relevance::new();
    relevance.insert(1, BTreeSet::from([10, 13]));
    relevance.insert(2, BTreeSet::from([12]));

    let first = Pipeline::new(PipelineConfig::default(), Stopwords::builtin()).unwrap().run(&docs, &queries, &relevance);
    let second = Pipeline::new(PipelineConfig::default(), Stopwords::builtin()).unwrap().run(&docs, &queries, &relevance);
    assert_eq!(serde_json::to_string(&first.metrics).unwrap(), serde_json::to_string(&second.metrics).unwrap());
    assert_eq!(first.ranked, second.ranked);
    // all-stopword query is still reported, with nothing retrieved
    assert_eq!(first.ranked.get(3), Some(&[][..]));
}

#[test]
fn reads_inputs_from_disk() {
    let dir = tempdir().unwrap();
    let docs_dir = dir.path().join("docs");
    fs::create_dir_all(&docs_dir).unwrap();
    fs::write(docs_dir.join("d1"), "<DOC>\n<DOCNO>\n1\n</DOCNO>\n<TITLE>\nwing flutter\n</TITLE>\n<TEXT>\nflutter of swept wings\n</TEXT>\n</DOC>\n").unwrap();
    fs::write(docs_dir.join("d2"), "<DOC>\n<DOCNO>\n2\n</DOCNO>\n<TITLE>\nheat transfer\n</TITLE>\n<TEXT>\nlaminar heating\n</TEXT>\n</DOC>\n").unwrap();
    fs::write(docs_dir.join("README"), "not a document").unwrap();
    let queries_path = dir.path().join("queries.txt");
    fs::write(&queries_path, "swept wing flutter\nlaminar heat transfer\n").unwrap();
    let qrels_path = dir.path().join("relevance.txt");
    fs::write(&qrels_path, "1 1\n2 2\n\n2 7 1\n").unwrap();

    let docs = read_corpus(&docs_dir).unwrap();
    let queries = read_queries(&queries_path).unwrap();
    let relevance = read_relevance(&qrels_path).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[&1], "wing flutter flutter of swept wings");
    assert_eq!(queries[&2], "laminar heat transfer");
    assert_eq!(relevance[&2], BTreeSet::from([2, 7]));

    let run = Pipeline::new(PipelineConfig::default(), Stopwords::builtin()).unwrap().run(&docs, &queries, &relevance);
    assert_eq!(run.ranked.pairs(), vec![(1, 1), (2, 2)]);
    let at10 = run.metrics.at(10).unwrap();
    assert_eq!(at10.queries[&1].recall, Some(1.0));
    assert_eq!(at10.queries[&2].recall, Some(0.5));
}

#[test]
fn malformed_relevance_line_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("relevance.txt");
    fs::write(&path, "1 4\n2\n").unwrap();
    let err = read_relevance(&path).unwrap_err();
    assert!(err.to_string().contains(":2:"));
}
