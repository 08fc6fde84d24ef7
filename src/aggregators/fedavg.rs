//! FedAvg: element-wise arithmetic mean of client updates
//!
//! Standard federated averaging as described by McMahan et al. (2017),
//! unweighted: every contribution counts the same.

use ndarray::ArrayD;
use rayon::prelude::*;

use crate::error::AggregatorError;
use crate::weights::ModelWeights;

/// Element-wise mean of equally shaped arrays.
///
/// Fails with [`AggregatorError::EmptyAggregation`] on an empty slice and
/// [`AggregatorError::DimensionMismatch`] when shapes differ.
pub fn fedavg(updates: &[&ArrayD<f32>]) -> Result<ArrayD<f32>, AggregatorError> {
    let first = updates.first().ok_or(AggregatorError::EmptyAggregation)?;

    let shape = first.shape();
    for update in &updates[1..] {
        if update.shape() != shape {
            return Err(AggregatorError::DimensionMismatch {
                expected: shape.to_vec(),
                actual: update.shape().to_vec(),
            });
        }
    }

    let n = updates.len() as f32;
    let sum = updates
        .iter()
        .fold(ArrayD::<f32>::zeros(shape), |acc, &update| acc + update);
    Ok(sum / n)
}

/// Average named model weights across contributions.
///
/// The variable names of the first contribution, in their order, form the
/// result's keys; names that only appear in later contributions are ignored.
/// Contributions are validated in collection order, so the reported error is
/// always the first offending contribution for the first offending variable.
pub fn mean_weights(contributions: &[ModelWeights]) -> Result<ModelWeights, AggregatorError> {
    let first = contributions
        .first()
        .ok_or(AggregatorError::EmptyAggregation)?;

    let mut columns: Vec<(&str, Vec<&ArrayD<f32>>)> = Vec::with_capacity(first.len());
    for (name, reference) in first.iter() {
        let mut column = Vec::with_capacity(contributions.len());
        column.push(reference);
        for (idx, contribution) in contributions.iter().enumerate().skip(1) {
            let array = contribution
                .get(name)
                .ok_or_else(|| AggregatorError::MissingVariable {
                    variable: name.to_string(),
                    contribution: idx,
                })?;
            if array.shape() != reference.shape() {
                return Err(AggregatorError::ShapeMismatch {
                    variable: name.to_string(),
                    expected: reference.shape().to_vec(),
                    actual: array.shape().to_vec(),
                });
            }
            column.push(array);
        }
        columns.push((name, column));
    }

    let averaged: Vec<(&str, ArrayD<f32>)> = columns
        .par_iter()
        .map(|(name, column)| fedavg(column).map(|mean| (*name, mean)))
        .collect::<Result<_, _>>()?;

    Ok(averaged.into_iter().collect())
}
