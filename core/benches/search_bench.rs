use boolsearch_core::{search, InvertedIndex};
use criterion::{criterion_group, criterion_main, Criterion};

fn synthetic_index() -> InvertedIndex {
    // term_k holds every doc id divisible by k
    let entries = (1..=50u32).map(|k| (format!("term_{k}"), (1..=10_000u32).filter(move |d| d % k == 0)));
    InvertedIndex::from_postings(entries)
}

fn bench_search(c: &mut Criterion) {
    let index = synthetic_index();
    c.bench_function("search_nested", |b| {
        b.iter(|| search("(term_2 OR term_3) AND NOT (term_5 OR term_7) AND term_11", &index))
    });
    c.bench_function("search_single_term", |b| b.iter(|| search("term_1", &index)));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
