use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use vsm_core::{Metrics, PipelineConfig, RankedResults};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    config: &'a PipelineConfig,
    metrics: &'a Metrics,
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

pub fn write_text<W: Write>(out: &mut W, metrics: &Metrics) -> Result<()> {
    writeln!(out, "********************* RESULTS *******************")?;
    writeln!(out)?;
    for cutoff in &metrics.cutoffs {
        writeln!(out, "Top {} documents in rank list:", cutoff.cutoff)?;
        writeln!(out, "\t\tPrecision\tRecall")?;
        for (query_id, m) in &cutoff.queries {
            writeln!(out, "Query: {query_id}\t{:.4}\t\t{}", m.precision, fmt_metric(m.recall))?;
        }
        writeln!(out, "Average Precision: {}", fmt_metric(cutoff.average_precision))?;
        writeln!(out, "Average Recall: {}", fmt_metric(cutoff.average_recall))?;
        writeln!(out, "Queries averaged: {}", cutoff.averaged_queries)?;
        writeln!(out)?;
    }
    writeln!(out, "****************** END OF RESULTS ****************")?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, metrics: &Metrics, config: &PipelineConfig) -> Result<()> {
    let generated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("failed to format report timestamp")?;
    let report = JsonReport { generated_at, config, metrics };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// One `query_id doc_id rank score` line per retrieved pair, best first.
pub fn write_ranking(path: &Path, ranked: &RankedResults) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for (query_id, list) in ranked.iter() {
        for (rank, doc) in list.iter().enumerate() {
            writeln!(w, "{query_id} {} {} {:.6}", doc.doc_id, rank + 1, doc.score)?;
        }
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use vsm_core::{Evaluator, Relevance, ScoredDoc};

    fn sample() -> (RankedResults, Metrics) {
        let ranked: RankedResults = vec![
            (1, vec![ScoredDoc { doc_id: 4, score: 0.9 }, ScoredDoc { doc_id: 2, score: 0.5 }]),
            (2, vec![ScoredDoc { doc_id: 8, score: 0.25 }]),
        ]
        .into_iter()
        .collect();
        let mut relevance = Relevance::new();
        relevance.insert(1, BTreeSet::from([4]));
        let metrics = Evaluator::new(vec![1, 10]).unwrap().evaluate(&relevance, &ranked);
        (ranked, metrics)
    }

    #[test]
    fn text_report_lists_queries_and_averages() {
        let (_, metrics) = sample();
        let mut buf = Vec::new();
        write_text(&mut buf, &metrics).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Top 1 documents in rank list:"));
        assert!(text.contains("Query: 1\t1.0000\t\t1.0000"));
        assert!(text.contains("Query: 2\t0.0000\t\tn/a"));
        assert!(text.contains("Average Precision: 0.1000"));
    }

    #[test]
    fn json_report_carries_config_and_metrics() {
        let (_, metrics) = sample();
        let mut buf = Vec::new();
        write_json(&mut buf, &metrics, &PipelineConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["config"]["idf"], "standard");
        let generated_at = json["generated_at"].as_str().unwrap();
        assert!(generated_at.contains('T') && generated_at.ends_with('Z'), "{generated_at}");
        assert_eq!(json["metrics"]["cutoffs"][1]["cutoff"], 10);
        assert!(json["metrics"]["cutoffs"][0]["queries"]["2"]["recall"].is_null());
    }

    #[test]
    fn ranking_file_has_one_line_per_pair() {
        let (ranked, _) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.txt");
        write_ranking(&path, &ranked).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["1 4 1 0.900000", "1 2 2 0.500000", "2 8 1 0.250000"]);
    }
}
