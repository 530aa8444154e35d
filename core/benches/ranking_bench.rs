use criterion::{criterion_group, criterion_main, Criterion};
use docsearch_core::{DocumentStatus, ExecutionMode, SearchServer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const WORDS: &[&str] = &[
    "cat", "dog", "rat", "pet", "fluffy", "tail", "collar", "eyes", "white", "stylish", "fine", "big", "curly",
    "hair", "nasty", "funny", "sparrow", "city", "country", "space",
];

fn build_server(documents: usize) -> SearchServer {
    let mut server = SearchServer::new("and in on with the").unwrap();
    let mut rng = StdRng::seed_from_u64(0x2545_f491);
    for id in 0..documents {
        let words: Vec<&str> = (0..20).filter_map(|_| WORDS.choose(&mut rng).copied()).collect();
        let text = words.join(" ");
        server.add_document(id as i32, &text, DocumentStatus::Actual, &[(id % 10) as i32]).unwrap();
    }
    server
}

fn bench_ranking(c: &mut Criterion) {
    let server = build_server(10_000);
    let query = "fluffy curly cat dog sparrow city -nasty -space";
    c.bench_function("find_top_sequential", |b| {
        b.iter(|| server.find_top_documents_in(ExecutionMode::Sequential, query).unwrap())
    });
    c.bench_function("find_top_parallel", |b| {
        b.iter(|| server.find_top_documents_in(ExecutionMode::Parallel, query).unwrap())
    });
}

criterion_group!(benches, bench_ranking);
criterion_main!(benches);
