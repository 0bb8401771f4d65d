use criterion::{criterion_group, criterion_main, Criterion};
use vsm_core::{Normalizer, Pipeline, PipelineConfig, RawCorpus, RawQueries, Relevance, Stopwords};

const VOCABULARY: &[&str] = &[
    "supersonic", "flows", "boundary", "layers", "heating", "transfer", "wings", "flutter",
    "shock", "waves", "plates", "pressure", "distribution", "laminar", "turbulent", "nozzles",
];

fn synthetic_text(seed: usize, words: usize) -> String {
    (0..words)
        .map(|i| VOCABULARY[(seed * 31 + i * 7 + i / 3) % VOCABULARY.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let text = synthetic_text(1, 2_000);
    c.bench_function("normalize_2k_words", |b| b.iter(|| normalizer.normalize(&text)));
}

fn bench_pipeline(c: &mut Criterion) {
    let docs: RawCorpus = (1..=500).map(|id| (id, synthetic_text(id as usize, 120))).collect();
    let queries: RawQueries = (1..=50).map(|id| (id, synthetic_text(id as usize * 13, 6))).collect();
    let relevance = Relevance::new();
    let pipeline = Pipeline::new(PipelineConfig::default(), Stopwords::builtin()).expect("valid config");
    c.bench_function("pipeline_500_docs_50_queries", |b| b.iter(|| pipeline.run(&docs, &queries, &relevance)));
}

criterion_group!(benches, bench_normalize, bench_pipeline);
criterion_main!(benches);
