use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use postgrade_core::readability::{ReadabilityConfig, extract};
use postgrade_core::{Document, analyze_html, analyze_structure, preprocess_html};

const URL: &str = "https://crumbandcrust.example.com/sourdough-proofing";

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for name in ["wordpress_post.html", "ghost_post.html", "plain_page.html"] {
        let html = fixture(name);
        group.bench_with_input(BenchmarkId::new("document", name), &html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let html = fixture("wordpress_post.html");

    c.bench_function("analyze_html", |b| b.iter(|| analyze_html(black_box(&html), URL)));
}

fn bench_preprocess(c: &mut Criterion) {
    let html = fixture("plain_page.html");
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_readability(c: &mut Criterion) {
    let html = fixture("plain_page.html");
    let config = ReadabilityConfig::default();

    c.bench_function("readability_tier", |b| b.iter(|| extract(black_box(&html), None, &config)));
}

fn bench_analysis(c: &mut Criterion) {
    let document = analyze_html(&fixture("wordpress_post.html"), URL);

    c.bench_function("analyze_structure", |b| b.iter(|| analyze_structure(black_box(&document))));
}

criterion_group!(
    benches,
    bench_parse,
    bench_full_pipeline,
    bench_preprocess,
    bench_readability,
    bench_analysis
);
criterion_main!(benches);
