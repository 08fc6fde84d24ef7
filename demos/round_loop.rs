//! Minimal host loop driving the aggregator over several rounds

use fedmean::{
    Aggregator, AggregatorConfig, FlContext, MeanAggregator, ModelWeights, PeerContext, Shareable,
};
use ndarray::{ArrayD, IxDyn};

const N_CLIENTS: usize = 4;
const N_ROUNDS: u64 = 3;

fn local_update(global: &ModelWeights, client: usize) -> ModelWeights {
    global
        .iter()
        .map(|(name, array)| (name, array + (client as f32 + 1.0) * 0.1))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fedmean=info")),
        )
        .init();

    let config = AggregatorConfig::from_toml_str("min_contributions = 4").unwrap();
    let mut agg = MeanAggregator::new(config);

    let mut global: ModelWeights = vec![
        ("conv/kernel", ArrayD::zeros(IxDyn(&[3, 3]))),
        ("conv/bias", ArrayD::zeros(IxDyn(&[3]))),
    ]
    .into_iter()
    .collect();

    for round in 0..N_ROUNDS {
        for client in 0..N_CLIENTS {
            let ctx = FlContext::new().with_round(round).with_peer(PeerContext::new(
                format!("site-{}", client),
                Shareable::weights(local_update(&global, client)),
            ));
            let decision = agg.accept(&ctx).unwrap();
            if !decision.ready_to_aggregate {
                continue;
            }

            let result = agg.aggregate(&FlContext::new().with_round(round)).unwrap();
            global = result.model_weights;
            let bias = global.get("conv/bias").unwrap();
            println!("round {} -> conv/bias = {}", round, bias);
        }
    }

    println!("\nAudit log:\n{}", agg.audit_log().to_json().unwrap());
}
