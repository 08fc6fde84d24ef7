//! Payload exchanged between clients and the coordinator.

use serde::{Deserialize, Serialize};

use crate::weights::ModelWeights;

/// What a [`Shareable`] carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareableType {
    /// Full model weights
    #[default]
    Weights,
}

/// Encryption marker for the payload data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Plain arrays
    #[default]
    Unencrypted,
    /// Arrays encrypted by the host; opaque to this crate
    Encrypted,
}

/// A client update or an aggregated result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shareable {
    /// Payload kind
    pub kind: ShareableType,
    /// Encryption marker
    pub data_type: DataType,
    /// Named model arrays
    pub model_weights: ModelWeights,
}

impl Shareable {
    /// Wrap plain model weights as an unencrypted weights payload.
    pub fn weights(model_weights: ModelWeights) -> Self {
        Self {
            kind: ShareableType::Weights,
            data_type: DataType::Unencrypted,
            model_weights,
        }
    }
}
