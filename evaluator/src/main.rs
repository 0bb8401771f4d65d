use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use vsm_core::eval::DEFAULT_CUTOFFS;
use vsm_core::ingest::{read_corpus, read_queries, read_relevance};
use vsm_core::normalizer::DEFAULT_STEM_CACHE_CAPACITY;
use vsm_core::{IdfScheme, Pipeline, PipelineConfig, Stopwords};

mod prompt;
mod report;

#[derive(Parser)]
#[command(name = "vsm-eval")]
#[command(about = "Rank documents by TF-IDF cosine similarity and score the ranking against relevance judgments", long_about = None)]
struct Cli {
    /// Directory holding the document files (prompted for when omitted)
    #[arg(long)]
    docs: Option<PathBuf>,
    /// Query file, one query per line (prompted for when omitted)
    #[arg(long)]
    queries: Option<PathBuf>,
    /// Relevance file of `query_id doc_id` pairs (prompted for when omitted)
    #[arg(long)]
    relevance: Option<PathBuf>,
    /// Extra stopwords, one per line, merged with the built-in English list
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Rank cutoffs for precision and recall
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CUTOFFS)]
    cutoffs: Vec<usize>,
    /// Number of stems kept in the normalizer's memo
    #[arg(long, default_value_t = DEFAULT_STEM_CACHE_CAPACITY)]
    stem_cache_size: usize,
    /// Use smoothed IDF = log10(1 + N/df) instead of log10(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Also write the full ranking as `query_id doc_id rank score` lines
    #[arg(long)]
    ranking_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let docs_dir = match cli.docs {
        Some(p) if p.is_dir() => p,
        Some(p) => bail!("{} is not a directory", p.display()),
        None => prompt::directory("Enter path to the directory where the document(s) are stored")?,
    };
    let queries_path = match cli.queries {
        Some(p) if p.is_file() => p,
        Some(p) => bail!("{} is not a file", p.display()),
        None => prompt::file("Enter path to query file")?,
    };
    let relevance_path = match cli.relevance {
        Some(p) if p.is_file() => p,
        Some(p) => bail!("{} is not a file", p.display()),
        None => prompt::file("Enter path to the relevance file")?,
    };

    let stopwords = match &cli.stopwords {
        Some(path) => Stopwords::load(path)?,
        None => Stopwords::builtin(),
    };
    let config = PipelineConfig {
        cutoffs: cli.cutoffs,
        stem_cache_capacity: cli.stem_cache_size,
        idf: if cli.smoothed_idf { IdfScheme::Smoothed } else { IdfScheme::Standard },
    };
    let pipeline = Pipeline::new(config, stopwords).context("invalid configuration")?;

    let relevance = read_relevance(&relevance_path)?;
    let docs = read_corpus(&docs_dir)?;
    if docs.is_empty() {
        bail!("no documents found in {}", docs_dir.display());
    }
    let queries = read_queries(&queries_path)?;

    tracing::info!(num_docs = docs.len(), num_queries = queries.len(), "fetching results");
    let run = pipeline.run(&docs, &queries, &relevance);

    if let Some(path) = &cli.ranking_out {
        report::write_ranking(path, &run.ranked)?;
        tracing::info!(path = %path.display(), pairs = run.ranked.pairs().len(), "wrote ranking");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Text => report::write_text(&mut out, &run.metrics)?,
        Format::Json => report::write_json(&mut out, &run.metrics, pipeline.config())?,
    }
    out.flush()?;
    Ok(())
}
