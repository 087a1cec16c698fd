use criterion::{criterion_group, criterion_main, Criterion};
use rgx::{Engine, Rgx};

fn haystack() -> String {
    "lorem ipsum dolor sit amet 4711 consectetur adipiscing elit 0815 ".repeat(200)
}

fn match_benchmark(c: &mut Criterion) {
    let rgx = Rgx::new();
    let input = haystack();
    for engine in [Engine::Backtracking, Engine::Nfa, Engine::Dfa] {
        c.bench_function(&format!("find_all_words_{engine}"), |b| {
            b.iter(|| {
                let result = rgx.find_all("[a-z]+", &input, engine).unwrap();
                assert!(result.matched());
            });
        });
        c.bench_function(&format!("find_all_numbers_{engine}"), |b| {
            b.iter(|| {
                let result = rgx.find_all("[0-9]+", &input, engine).unwrap();
                assert!(result.matched());
            });
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = match_benchmark
}

criterion_main!(benches);
