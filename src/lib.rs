//! # fedmean: round-scoped federated averaging
//!
//! An aggregator plugin for federated-learning coordinators. The host
//! framework owns the round loop and client transport; this crate buffers
//! each client's model weights as they arrive and, when the host asks,
//! returns their element-wise mean as a new global update.
//!
//! ## Building Blocks
//!
//! - [`MeanAggregator`] - buffers contributions and averages them per round
//! - [`Aggregator`] - the two-callback interface the host invokes
//! - [`fedavg()`] / [`mean_weights()`] - the averaging kernels
//! - [`FlContext`] - typed round context supplied by the host
//!
//! ## Round Lifecycle
//!
//! ```rust
//! use fedmean::{Aggregator, FlContext, MeanAggregator, ModelWeights, PeerContext, Shareable};
//! use ndarray::array;
//!
//! let mut agg = MeanAggregator::default();
//!
//! for (client, value) in [("site-1", 1.0f32), ("site-2", 3.0)] {
//!     let weights: ModelWeights = vec![("w", array![value].into_dyn())].into_iter().collect();
//!     let ctx = FlContext::new()
//!         .with_round(0)
//!         .with_peer(PeerContext::new(client, Shareable::weights(weights)));
//!     agg.accept(&ctx).unwrap();
//! }
//!
//! let result = agg.aggregate(&FlContext::new().with_round(0)).unwrap();
//! assert_eq!(result.model_weights.get("w").unwrap()[0], 2.0);
//! ```

#![deny(missing_docs)]

pub mod aggregators;
pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod shareable;
pub mod weights;

// Re-exports
pub use aggregators::{fedavg, mean_weights};
pub use aggregators::{AcceptDecision, Aggregator, Contribution, MeanAggregator};
pub use audit::{AuditLog, RoundAuditEntry};
pub use config::AggregatorConfig;
pub use context::{server_context_sanity_check, FlContext, PeerContext};
pub use error::AggregatorError;
pub use shareable::{DataType, Shareable, ShareableType};
pub use weights::ModelWeights;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
