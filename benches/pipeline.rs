use std::path::PathBuf;

use burn::backend::NdArray;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashtag_sentiment::{
    artifacts::JsonModelStore,
    pipelines::{InferencePipeline, RawText},
    text::TextNormalizer,
};

const SAMPLES: &[&str] = &[
    "I love the new #rust release, it is awesome! https://example.com/launch",
    "This is terrible, @someone broke everything again #fail",
    "Worst update ever for #rust, so many problems",
    "Amazing work by the #rust team this week, really impressed",
];

fn batch(size: usize) -> Vec<RawText> {
    SAMPLES
        .iter()
        .cycle()
        .take(size)
        .map(|&text| text.into())
        .collect()
}

fn normalize(c: &mut Criterion) {
    let normalizer = TextNormalizer::new();

    c.bench_function("normalize", |b| {
        b.iter(|| {
            for text in SAMPLES {
                black_box(normalizer.normalize(black_box(text)));
            }
        })
    });
}

fn classify_batch(c: &mut Criterion) {
    let store = JsonModelStore::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts"));
    let pipeline = InferencePipeline::<NdArray>::from_store(&store, &Default::default())
        .expect("artifacts load");

    let mut group = c.benchmark_group("classify_batch");

    for size in [1, 50, 100] {
        let texts = batch(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &texts, |b, texts| {
            b.iter(|| pipeline.classify_batch(black_box(texts)))
        });
    }

    group.finish();
}

criterion_group!(benches, normalize, classify_batch);
criterion_main!(benches);
