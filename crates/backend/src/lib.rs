//! Analysis service contract and the process-wide stores fed by its pushes.
//!
//! The analysis backend itself is opaque: it answers point queries through
//! [`AnalysisService`] and pushes full diagnostic batches and busy-document
//! sets through [`BackendPush`]. [`AnalysisHub`] publishes those pushes into a
//! [`DiagnosticStore`] and a [`LivenessTracker`], which views read and
//! subscribe to through [`Subscription`] guards.

pub mod broadcast;
pub mod hub;
pub mod service;
pub mod store;

pub use broadcast::{Broadcast, Subscription, SubscriptionSet};
pub use hub::{AnalysisHub, BackendPush, BackendPushReceiver, BackendPushSender, push_channel};
pub use service::{AnalysisService, QueryError};
pub use store::{DiagnosticStore, LivenessTracker};
