use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fedmean::{mean_weights, ModelWeights};
use ndarray::{ArrayD, IxDyn};

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for &n_clients in &[2usize, 10, 50] {
        for &n_params in &[1_000usize, 100_000, 1_000_000] {
            // Four layers per model, parameters split evenly
            let layer = n_params / 4;
            let contributions: Vec<ModelWeights> = (0..n_clients)
                .map(|i| {
                    (0..4)
                        .map(|l| {
                            let array = ArrayD::from_shape_fn(IxDyn(&[layer]), |idx| {
                                ((i * n_params + l * layer + idx[0]) as f32).sin()
                            });
                            (format!("layer_{}", l), array)
                        })
                        .collect()
                })
                .collect();

            let id = format!("{}c_{}p", n_clients, n_params);

            group.bench_with_input(
                BenchmarkId::new("mean_weights", &id),
                &contributions,
                |b, contributions| b.iter(|| mean_weights(contributions).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
