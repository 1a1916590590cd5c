//! Query latency: exact Chamfer vs. MUVERA.
//!
//! Exact search is O(N · |Q| · |D| · dim); MUVERA pays one query encoding plus
//! N dot products of length `d_final`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use muvera::benchmark::generate_multivector_dataset;
use muvera::{ExactChamferRetriever, MuveraRetriever, Retriever};

const DIM: usize = 64;
const VECTORS_PER_DOC: usize = 16;

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("top10_query");
    group.sample_size(20);

    for n_docs in [200, 1000].iter() {
        let ds = generate_multivector_dataset(*n_docs, VECTORS_PER_DOC, DIM, 7).unwrap();
        let query = ds.documents[0].clone();

        let mut exact = ExactChamferRetriever::new(DIM, *n_docs).unwrap();
        exact.index_dataset(&ds.documents, &ds.ids).unwrap();
        let mut muvera = MuveraRetriever::new(DIM, *n_docs, 16, 5120, 4, 20, 42).unwrap();
        muvera.index_dataset(&ds.documents, &ds.ids).unwrap();

        group.bench_with_input(BenchmarkId::new("exact", n_docs), n_docs, |bench, _| {
            bench.iter(|| exact.get_top_k(black_box(&query), 10).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("muvera", n_docs), n_docs, |bench, _| {
            bench.iter(|| muvera.get_top_k(black_box(&query), 10).unwrap());
        });
    }

    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_dataset");
    group.sample_size(10);

    let ds = generate_multivector_dataset(1000, VECTORS_PER_DOC, DIM, 8).unwrap();
    for r_reps in [5, 20].iter() {
        group.bench_with_input(BenchmarkId::new("muvera", r_reps), r_reps, |bench, &r| {
            let mut retriever = MuveraRetriever::new(DIM, 1000, 16, r * 16 * 16, 4, r, 42).unwrap();
            bench.iter(|| retriever.index_dataset(&ds.documents, &ds.ids).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query, bench_index);
criterion_main!(benches);
