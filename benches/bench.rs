// Criterion benchmarks for Gram Seva

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gram_seva::core::{
    matcher::KeywordMatcher,
    scoring::{score_service, tokenize},
    suggestion::{build_prompt, resolve_suggestion},
};
use gram_seva::models::{KeywordWeights, ServiceRecord};

const CATEGORIES: [&str; 5] = ["Certificates", "Utilities", "Business", "Revenue", "Welfare"];

fn create_service(id: usize) -> ServiceRecord {
    ServiceRecord {
        id: format!("svc_{}", id),
        service_name: format!("Service {} {}", id, CATEGORIES[id % CATEGORIES.len()]),
        description: format!("Panchayat service number {} for residents", id),
        category: CATEGORIES[id % CATEGORIES.len()].to_string(),
        processing_time: "7 days".to_string(),
        fee: "Free".to_string(),
        documents_required: vec!["Aadhaar card".to_string()],
        eligibility: "Residents".to_string(),
        application_link: format!("/apply/{}", id),
        keywords: format!("keyword{} panchayat resident", id),
    }
}

fn create_catalog(size: usize) -> Vec<ServiceRecord> {
    (0..size).map(create_service).collect()
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box("I need a new drinking water connection for my house")));
    });
}

fn bench_score_service(c: &mut Criterion) {
    let service = create_service(42);
    let tokens = tokenize("panchayat welfare service for residents");
    let weights = KeywordWeights::default();

    c.bench_function("score_service", |b| {
        b.iter(|| score_service(black_box(&tokens), black_box(&service), black_box(&weights)));
    });
}

fn bench_best_match(c: &mut Criterion) {
    let matcher = KeywordMatcher::with_default_weights();

    let mut group = c.benchmark_group("best_match");

    for catalog_size in [10, 50, 100, 500, 1000].iter() {
        let catalog = create_catalog(*catalog_size);

        group.bench_with_input(
            BenchmarkId::new("keyword", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| matcher.best_match(black_box("welfare service keyword7"), black_box(&catalog)));
            },
        );
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let matcher = KeywordMatcher::with_default_weights();
    let catalog = create_catalog(500);

    c.bench_function("rank_500_services", |b| {
        b.iter(|| matcher.rank(black_box("panchayat welfare service for residents"), black_box(&catalog)));
    });
}

fn bench_ai_path_helpers(c: &mut Criterion) {
    let catalog = create_catalog(100);

    c.bench_function("build_prompt_100_services", |b| {
        b.iter(|| build_prompt(black_box("water connection"), black_box(&catalog)));
    });

    c.bench_function("resolve_suggestion_100_services", |b| {
        b.iter(|| resolve_suggestion(black_box("Service 99 Welfare"), black_box(&catalog)));
    });

    c.bench_function("resolve_suggestion_after_preamble", |b| {
        b.iter(|| {
            resolve_suggestion(
                black_box("The closest match for this request is:\nService 99 Welfare"),
                black_box(&catalog),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_score_service,
    bench_best_match,
    bench_rank,
    bench_ai_path_helpers
);

criterion_main!(benches);
