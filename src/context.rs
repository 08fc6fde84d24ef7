//! Typed round context handed over by the host framework.
//!
//! The host owns the round loop and fills in an [`FlContext`] before each
//! callback: the peer context for `accept`, the round number for `aggregate`.

use serde::{Deserialize, Serialize};

use crate::error::AggregatorError;
use crate::shareable::Shareable;

/// Context of the client that sent a contribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeerContext {
    /// Client identity as known to the host
    pub client_name: String,
    /// The client's payload
    pub shareable: Shareable,
}

impl PeerContext {
    /// Create a peer context.
    pub fn new(client_name: impl Into<String>, shareable: Shareable) -> Self {
        Self {
            client_name: client_name.into(),
            shareable,
        }
    }
}

/// Round context passed to every aggregator callback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlContext {
    /// Current round number, set by the host's round loop
    pub current_round: Option<u64>,
    /// Sender of the contribution, present for `accept` calls
    pub peer: Option<PeerContext>,
}

impl FlContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current round number.
    pub fn with_round(mut self, round: u64) -> Self {
        self.current_round = Some(round);
        self
    }

    /// Attach a peer context.
    pub fn with_peer(mut self, peer: PeerContext) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Peer context, or a context integrity error if the host omitted it.
    pub fn peer_context(&self) -> Result<&PeerContext, AggregatorError> {
        self.peer
            .as_ref()
            .ok_or_else(|| AggregatorError::ContextIntegrity("missing peer context".to_string()))
    }
}

/// Sanity check run on the server side before aggregation.
pub fn server_context_sanity_check(ctx: &FlContext) -> Result<(), AggregatorError> {
    if ctx.current_round.is_none() {
        return Err(AggregatorError::ContextIntegrity(
            "current round number is not set".to_string(),
        ));
    }
    Ok(())
}
