//! Quickstart: average two clients' weights in one round

use fedmean::{Aggregator, FlContext, MeanAggregator, ModelWeights, PeerContext, Shareable};
use ndarray::array;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fedmean=debug")),
        )
        .init();

    println!("fedmean quickstart\n");

    let mut agg = MeanAggregator::default();

    let clients: Vec<(&str, ModelWeights)> = vec![
        (
            "site-1",
            vec![
                ("w1", array![1.0f32, 2.0].into_dyn()),
                ("w2", array![10.0f32].into_dyn()),
            ]
            .into_iter()
            .collect(),
        ),
        (
            "site-2",
            vec![
                ("w1", array![3.0f32, 4.0].into_dyn()),
                ("w2", array![20.0f32].into_dyn()),
            ]
            .into_iter()
            .collect(),
        ),
    ];

    for (name, weights) in clients {
        let ctx = FlContext::new()
            .with_round(0)
            .with_peer(PeerContext::new(name, Shareable::weights(weights)));
        let decision = agg.accept(&ctx).unwrap();
        println!("{} accepted={} ready={}", name, decision.accepted, decision.ready_to_aggregate);
    }

    let result = agg.aggregate(&FlContext::new().with_round(0)).unwrap();

    println!("\nAggregated weights:");
    for (name, array) in result.model_weights.iter() {
        println!("   {:<4} {}", name, array);
    }
    println!("Expected: w1 = [2, 3], w2 = [15]");
}
