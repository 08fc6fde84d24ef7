//! Integration tests for the round aggregator

use fedmean::error::AggregatorError;
use fedmean::{
    Aggregator, AggregatorConfig, DataType, FlContext, MeanAggregator, ModelWeights, PeerContext,
    Shareable, ShareableType,
};
use ndarray::{array, ArrayD, IxDyn};

fn weights(vars: Vec<(&str, ArrayD<f32>)>) -> ModelWeights {
    vars.into_iter().collect()
}

fn peer(round: u64, client: &str, w: ModelWeights) -> FlContext {
    FlContext::new()
        .with_round(round)
        .with_peer(PeerContext::new(client, Shareable::weights(w)))
}

fn server(round: u64) -> FlContext {
    FlContext::new().with_round(round)
}

#[test]
fn test_two_client_round() {
    let mut agg = MeanAggregator::default();

    agg.accept(&peer(
        0,
        "site-1",
        weights(vec![
            ("w1", array![1.0, 2.0].into_dyn()),
            ("w2", array![10.0].into_dyn()),
        ]),
    ))
    .unwrap();
    agg.accept(&peer(
        0,
        "site-2",
        weights(vec![
            ("w1", array![3.0, 4.0].into_dyn()),
            ("w2", array![20.0].into_dyn()),
        ]),
    ))
    .unwrap();

    let result = agg.aggregate(&server(0)).unwrap();

    assert_eq!(result.kind, ShareableType::Weights);
    assert_eq!(result.data_type, DataType::Unencrypted);
    assert_eq!(
        result.model_weights,
        weights(vec![
            ("w1", array![2.0, 3.0].into_dyn()),
            ("w2", array![15.0].into_dyn()),
        ])
    );
}

#[test]
fn test_mean_of_many_clients() {
    let n_clients = 8;
    let mut agg = MeanAggregator::default();

    for i in 0..n_clients {
        let w = weights(vec![(
            "dense/kernel",
            ArrayD::from_elem(IxDyn(&[3, 4, 5]), i as f32),
        )]);
        agg.accept(&peer(2, &format!("site-{}", i), w)).unwrap();
    }

    let result = agg.aggregate(&server(2)).unwrap();
    let kernel = result.model_weights.get("dense/kernel").unwrap();

    // mean of 0..8 = 3.5
    assert_eq!(kernel.shape(), &[3, 4, 5]);
    assert!(kernel.iter().all(|&v| (v - 3.5).abs() < 1e-6));
}

#[test]
fn test_accept_never_ready_by_default() {
    let mut agg = MeanAggregator::default();

    let contents = vec![
        ModelWeights::new(),
        weights(vec![("w", array![f32::NAN].into_dyn())]),
        weights(vec![("w", ArrayD::zeros(IxDyn(&[100])))]),
    ];
    for (i, w) in contents.into_iter().enumerate() {
        let decision = agg.accept(&peer(0, &format!("c{}", i), w)).unwrap();
        assert!(decision.accepted);
        assert!(!decision.ready_to_aggregate);
    }
}

#[test]
fn test_buffer_empty_after_aggregate() {
    let mut agg = MeanAggregator::default();
    agg.accept(&peer(0, "a", weights(vec![("w", array![1.0].into_dyn())])))
        .unwrap();

    agg.aggregate(&server(0)).unwrap();
    assert!(agg.is_empty());

    let err = agg.aggregate(&server(0)).unwrap_err();
    assert!(matches!(err, AggregatorError::EmptyAggregation));
}

#[test]
fn test_aggregate_without_accept() {
    let mut agg = MeanAggregator::default();
    let err = agg.aggregate(&server(0)).unwrap_err();
    assert!(matches!(err, AggregatorError::EmptyAggregation));
    assert_eq!(agg.pending(), 0);
}

#[test]
fn test_order_independence() {
    let contribs = vec![
        weights(vec![
            ("b", array![1.0, 8.0].into_dyn()),
            ("a", array![[2.0]].into_dyn()),
        ]),
        weights(vec![
            ("a", array![[4.0]].into_dyn()),
            ("b", array![3.0, 0.0].into_dyn()),
        ]),
        weights(vec![
            ("b", array![5.0, 4.0].into_dyn()),
            ("a", array![[6.0]].into_dyn()),
        ]),
    ];

    let mut forward = MeanAggregator::default();
    for (i, w) in contribs.iter().enumerate() {
        forward.accept(&peer(0, &i.to_string(), w.clone())).unwrap();
    }
    let forward = forward.aggregate(&server(0)).unwrap().model_weights;

    let mut reverse = MeanAggregator::default();
    for (i, w) in contribs.iter().enumerate().rev() {
        reverse.accept(&peer(0, &i.to_string(), w.clone())).unwrap();
    }
    let reverse = reverse.aggregate(&server(0)).unwrap().model_weights;

    for name in ["a", "b"] {
        assert_eq!(forward.get(name), reverse.get(name));
    }
    assert_eq!(forward.get("a").unwrap(), &array![[4.0]].into_dyn());
    assert_eq!(forward.get("b").unwrap(), &array![3.0, 4.0].into_dyn());

    // Key order follows whichever contribution arrived first
    assert_eq!(forward.names().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(reverse.names().collect::<Vec<_>>(), vec!["b", "a"]);

    let mut second_first = MeanAggregator::default();
    second_first
        .accept(&peer(0, "1", contribs[1].clone()))
        .unwrap();
    second_first
        .accept(&peer(0, "0", contribs[0].clone()))
        .unwrap();
    let result = second_first.aggregate(&server(0)).unwrap().model_weights;
    assert_eq!(result.names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_missing_variable_in_later_contribution() {
    let mut agg = MeanAggregator::default();
    agg.accept(&peer(
        0,
        "a",
        weights(vec![
            ("a", array![1.0].into_dyn()),
            ("b", array![1.0].into_dyn()),
        ]),
    ))
    .unwrap();
    agg.accept(&peer(0, "b", weights(vec![("a", array![1.0].into_dyn())])))
        .unwrap();

    match agg.aggregate(&server(0)) {
        Err(AggregatorError::MissingVariable { variable, .. }) => assert_eq!(variable, "b"),
        other => panic!("expected MissingVariable, got {:?}", other),
    }
    assert!(agg.is_empty());
    assert!(agg.audit_log().is_empty());
}

#[test]
fn test_shape_mismatch() {
    let mut agg = MeanAggregator::default();
    agg.accept(&peer(0, "a", weights(vec![("w", array![1.0, 2.0].into_dyn())])))
        .unwrap();
    agg.accept(&peer(0, "b", weights(vec![("w", array![1.0].into_dyn())])))
        .unwrap();

    match agg.aggregate(&server(0)) {
        Err(AggregatorError::ShapeMismatch {
            variable,
            expected,
            actual,
        }) => {
            assert_eq!(variable, "w");
            assert_eq!(expected, vec![2]);
            assert_eq!(actual, vec![1]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_malformed_context_is_not_suppressed() {
    let mut agg = MeanAggregator::default();
    agg.accept(&peer(0, "a", weights(vec![("w", array![1.0].into_dyn())])))
        .unwrap();

    let err = agg.aggregate(&FlContext::new()).unwrap_err();
    assert!(matches!(err, AggregatorError::ContextIntegrity(_)));

    // The host can fix the context and retry
    let result = agg.aggregate(&server(0)).unwrap();
    assert_eq!(result.model_weights.get("w").unwrap()[0], 1.0);
}

#[test]
fn test_multi_round_workflow() {
    let config = AggregatorConfig::from_toml_str("min_contributions = 3").unwrap();
    let mut agg = MeanAggregator::new(config);

    for round in 0..3u64 {
        let mut ready = false;
        for client in 0..3 {
            let value = round as f32 + client as f32;
            let decision = agg
                .accept(&peer(
                    round,
                    &format!("site-{}", client),
                    weights(vec![("w", array![value].into_dyn())]),
                ))
                .unwrap();
            ready = decision.ready_to_aggregate;
        }
        assert!(ready, "round {} should be ready after 3 clients", round);

        let result = agg.aggregate(&server(round)).unwrap();
        // mean of round, round+1, round+2
        let expected = round as f32 + 1.0;
        assert!(
            (result.model_weights.get("w").unwrap()[0] - expected).abs() < 1e-6,
            "Round {}: expected {}",
            round,
            expected
        );
    }

    let log = agg.audit_log();
    assert_eq!(log.len(), 3);
    assert_eq!(
        log.entries().iter().map(|e| e.round).collect::<Vec<_>>(),
        vec![Some(0), Some(1), Some(2)]
    );
    assert!(log.entries().iter().all(|e| e.n_contributions == 3));
}

#[test]
fn test_aggregate_via_trait_object() {
    let mut agg: Box<dyn Aggregator> = Box::new(MeanAggregator::default());
    agg.accept(&peer(0, "a", weights(vec![("w", array![2.0].into_dyn())])))
        .unwrap();
    agg.accept(&peer(0, "b", weights(vec![("w", array![4.0].into_dyn())])))
        .unwrap();
    let result = agg.aggregate(&server(0)).unwrap();
    assert_eq!(result.model_weights.get("w").unwrap()[0], 3.0);
}

#[test]
fn test_result_payload_roundtrips_through_json() {
    let mut agg = MeanAggregator::default();
    agg.accept(&peer(0, "a", weights(vec![("w", array![[1.0, 2.0]].into_dyn())])))
        .unwrap();
    let result = agg.aggregate(&server(0)).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let restored: Shareable = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, result);
}
