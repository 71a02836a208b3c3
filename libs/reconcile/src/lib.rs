//! # tidepool-reconcile
//!
//! Reconciliation engine for node pools on managed clusters.
//!
//! The engine converges a declared pool configuration ([`DesiredPool`])
//! against the remote control plane:
//!
//! - [`validate()`] checks cross-field invariants before any network call,
//!   reporting every violation at once
//! - [`create_payload()`] translates a declaration into the remote creation
//!   shape, applying defaulting and omission rules
//! - [`update_payload()`] computes the minimal delta between the observed
//!   remote state and a new declaration
//! - [`observed_config()`] reflects remote responses back into the declared
//!   shape
//! - [`Reconciler`] orchestrates create/read/update/delete around those
//!   pieces, waiting on long-running remote operations under per-operation
//!   time budgets
//!
//! ## Invariants
//!
//! - Validation runs identically before every create and every update
//! - Update payloads only carry fields the caller actually changed
//! - Identity and creation-only fields never appear in update payloads
//! - Reading a pool whose cluster or self is gone is not an error; it
//!   means local state should be dropped

mod delta;
mod desired;
mod error;
mod reconciler;
mod reflect;
mod translate;
mod validate;

pub use delta::update_payload;
pub use desired::{Autoscaling, DesiredPool};
pub use error::{ReconcileError, ValidationError};
pub use reconciler::{ReconciledPool, Reconciler, ReconcilerConfig};
pub use reflect::observed_config;
pub use translate::create_payload;
pub use validate::validate;
