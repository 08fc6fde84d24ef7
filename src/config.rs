//! Aggregator configuration.
//!
//! Every field has a default, so an empty TOML document yields the
//! reference behaviour: never signal readiness, keep an audit log.
//!
//! ```toml
//! min_contributions = 3
//! audit = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AggregatorError;

/// Settings for [`MeanAggregator`](crate::MeanAggregator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Report `ready_to_aggregate` once this many contributions are buffered.
    /// `None` leaves the decision entirely to the host.
    #[serde(default)]
    pub min_contributions: Option<usize>,

    /// Record an audit entry for every successful aggregation.
    #[serde(default = "default_audit")]
    pub audit: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            min_contributions: None,
            audit: default_audit(),
        }
    }
}

fn default_audit() -> bool {
    true
}

impl AggregatorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, AggregatorError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AggregatorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AggregatorError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject settings that can never be satisfied meaningfully.
    pub fn validate(&self) -> Result<(), AggregatorError> {
        if self.min_contributions == Some(0) {
            return Err(AggregatorError::Config(
                "min_contributions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
