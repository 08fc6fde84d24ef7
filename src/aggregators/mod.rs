//! Round-scoped aggregation of client contributions.
//!
//! The host framework drives an [`Aggregator`] through two callbacks per
//! round: [`Aggregator::accept`] once per client, then
//! [`Aggregator::aggregate`] once the host decides the round is complete.
//! [`MeanAggregator`] averages the buffered model weights with [`fedavg`].

pub mod fedavg;

pub use fedavg::{fedavg, mean_weights};

use tracing::{debug, info, warn};

use crate::audit::{AuditLog, RoundAuditEntry};
use crate::config::AggregatorConfig;
use crate::context::{server_context_sanity_check, FlContext};
use crate::error::AggregatorError;
use crate::shareable::{DataType, Shareable};
use crate::weights::ModelWeights;

/// Outcome of an `accept` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptDecision {
    /// Whether the contribution was kept
    pub accepted: bool,
    /// Whether the aggregator asks the host to aggregate now
    pub ready_to_aggregate: bool,
}

/// One client's update for the current round.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    /// Sending client
    pub client_name: String,
    /// The client's model weights
    pub weights: ModelWeights,
}

impl Contribution {
    /// Create a contribution.
    pub fn new(client_name: impl Into<String>, weights: ModelWeights) -> Self {
        Self {
            client_name: client_name.into(),
            weights,
        }
    }
}

/// Callback interface the host framework invokes during a round.
pub trait Aggregator {
    /// Take the contribution carried by `ctx`'s peer context.
    fn accept(&mut self, ctx: &FlContext) -> Result<AcceptDecision, AggregatorError>;

    /// Combine everything accepted since the last call into one result.
    fn aggregate(&mut self, ctx: &FlContext) -> Result<Shareable, AggregatorError>;
}

/// Averages the model weights of every contribution in a round.
///
/// # Example
///
/// ```rust
/// use fedmean::{Contribution, MeanAggregator, ModelWeights};
/// use ndarray::array;
///
/// let mut agg = MeanAggregator::default();
///
/// let w1: ModelWeights = vec![("w", array![1.0f32, 2.0].into_dyn())].into_iter().collect();
/// let w2: ModelWeights = vec![("w", array![3.0f32, 4.0].into_dyn())].into_iter().collect();
/// agg.submit(Contribution::new("site-1", w1));
/// agg.submit(Contribution::new("site-2", w2));
///
/// let result = agg.reduce().unwrap();
/// assert_eq!(result.get("w").unwrap(), &array![2.0f32, 3.0].into_dyn());
/// assert!(agg.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MeanAggregator {
    config: AggregatorConfig,
    contributions: Vec<Contribution>,
    audit: AuditLog,
}

impl MeanAggregator {
    /// Create an aggregator with the given configuration.
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            contributions: Vec::new(),
            audit: AuditLog::new(),
        }
    }

    /// Buffer a contribution. Content is not validated until [`reduce`](Self::reduce).
    pub fn submit(&mut self, contribution: Contribution) -> AcceptDecision {
        self.contributions.push(contribution);
        AcceptDecision {
            accepted: true,
            ready_to_aggregate: self.is_ready(),
        }
    }

    /// Average the buffered contributions and empty the buffer.
    ///
    /// The buffer is emptied even when averaging fails, so a broken round
    /// cannot be aggregated twice. Hosts that expect a failed round to stay
    /// buffered for a retry must resubmit the contributions themselves.
    pub fn reduce(&mut self) -> Result<ModelWeights, AggregatorError> {
        let contributions = std::mem::take(&mut self.contributions);
        let weights: Vec<ModelWeights> = contributions.into_iter().map(|c| c.weights).collect();
        mean_weights(&weights)
    }

    /// Number of contributions buffered in the current round.
    pub fn pending(&self) -> usize {
        self.contributions.len()
    }

    /// Whether nothing has been accepted since the last aggregation.
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Drop all buffered contributions without aggregating.
    pub fn clear(&mut self) {
        self.contributions.clear();
    }

    /// Active configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Rounds aggregated so far (empty when auditing is disabled).
    ///
    /// The log grows by one entry per successful round until it is drained
    /// with [`take_audit_log`](Self::take_audit_log).
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Hand the recorded rounds to the caller and start a fresh log.
    pub fn take_audit_log(&mut self) -> AuditLog {
        std::mem::take(&mut self.audit)
    }

    fn is_ready(&self) -> bool {
        self.config
            .min_contributions
            .map_or(false, |min| self.contributions.len() >= min)
    }
}

impl Aggregator for MeanAggregator {
    /// Buffer the peer's model weights.
    ///
    /// Payloads marked [`DataType::Encrypted`] are buffered and averaged as
    /// plain numbers; the aggregated result is always labelled unencrypted.
    fn accept(&mut self, ctx: &FlContext) -> Result<AcceptDecision, AggregatorError> {
        let peer = ctx.peer_context()?;
        if peer.shareable.data_type == DataType::Encrypted {
            warn!(
                client = %peer.client_name,
                "encrypted contribution will be averaged as plain weights"
            );
        }
        let decision = self.submit(Contribution::new(
            peer.client_name.clone(),
            peer.shareable.model_weights.clone(),
        ));
        debug!(
            client = %peer.client_name,
            pending = self.contributions.len(),
            ready = decision.ready_to_aggregate,
            "accepted contribution"
        );
        Ok(decision)
    }

    fn aggregate(&mut self, ctx: &FlContext) -> Result<Shareable, AggregatorError> {
        server_context_sanity_check(ctx)?;
        let round = ctx.current_round;
        let n_contributions = self.pending();
        let clients: Vec<String> = if self.config.audit {
            self.contributions
                .iter()
                .map(|c| c.client_name.clone())
                .collect()
        } else {
            Vec::new()
        };

        let weights = self.reduce().map_err(|e| {
            warn!(round = ?round, contributions = n_contributions, error = %e, "aggregation failed");
            e
        })?;

        info!(
            round = ?round,
            contributions = n_contributions,
            variables = weights.len(),
            "aggregated round"
        );

        if self.config.audit {
            self.audit.push(RoundAuditEntry {
                round,
                n_contributions,
                variables: weights.names().map(str::to_string).collect(),
                clients,
            });
        }

        Ok(Shareable::weights(weights))
    }
}
