//! Named model weights.
//!
//! A [`ModelWeights`] maps variable names to n-dimensional `f32` arrays and
//! remembers insertion order, so the key order of a client's update survives
//! aggregation.

use ndarray::{ArrayD, IxDyn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AggregatorError;

/// Insertion-ordered mapping from variable name to array.
///
/// Names are unique. Deserialization rejects payloads that repeat a name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModelWeights {
    vars: Vec<(String, ArrayD<f32>)>,
}

impl ModelWeights {
    /// Create an empty set of weights.
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Insert a variable. An existing name keeps its position and has its
    /// array replaced; the previous array is returned.
    pub fn insert(&mut self, name: impl Into<String>, array: ArrayD<f32>) -> Option<ArrayD<f32>> {
        let name = name.into();
        match self.vars.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, array)),
            None => {
                self.vars.push((name, array));
                None
            }
        }
    }

    /// Insert a variable from a shape and row-major flat data.
    ///
    /// Fails with [`AggregatorError::ShapeError`] when `data` does not fill
    /// `shape` exactly.
    pub fn insert_flat(
        &mut self,
        name: impl Into<String>,
        shape: &[usize],
        data: Vec<f32>,
    ) -> Result<(), AggregatorError> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)?;
        self.insert(name, array);
        Ok(())
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&ArrayD<f32>> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// Whether a variable is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate over `(name, array)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArrayD<f32>)> {
        self.vars.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether there are no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<'de> Deserialize<'de> for ModelWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let vars = Vec::<(String, ArrayD<f32>)>::deserialize(deserializer)?;
        let mut weights = ModelWeights::new();
        for (name, array) in vars {
            if weights.contains(&name) {
                return Err(D::Error::custom(format!("duplicate variable '{}'", name)));
            }
            weights.vars.push((name, array));
        }
        Ok(weights)
    }
}

impl<S: Into<String>> FromIterator<(S, ArrayD<f32>)> for ModelWeights {
    fn from_iter<I: IntoIterator<Item = (S, ArrayD<f32>)>>(iter: I) -> Self {
        let mut weights = ModelWeights::new();
        for (name, array) in iter {
            weights.insert(name, array);
        }
        weights
    }
}

impl IntoIterator for ModelWeights {
    type Item = (String, ArrayD<f32>);
    type IntoIter = std::vec::IntoIter<(String, ArrayD<f32>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}
