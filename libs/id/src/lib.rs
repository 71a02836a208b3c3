//! # tidepool-id
//!
//! Composite resource identifiers, parsing, and validation for tidepool.
//!
//! ## Design Principles
//!
//! - Identifiers are composite paths, not opaque tokens: every segment is
//!   meaningful and addressable on its own
//! - All identifiers have a canonical string representation with strict
//!   parsing
//! - Identifiers support roundtrip serialization (parse → format → parse)
//! - Identifiers are typed to prevent mixing a cluster with one of its pools
//!
//! ## Identifier Format
//!
//! A cluster is addressed by its scope and name; a node pool is addressed
//! through its parent cluster:
//!
//! - `/scopes/prod-east/clusters/main`
//! - `/scopes/prod-east/clusters/main/pools/workers`
//!
//! The pool segment must satisfy the pool naming rule: start with a
//! lowercase letter, contain only lowercase letters and digits, and be at
//! most 12 characters long.

mod error;
mod types;

pub use error::IdError;
pub use types::{validate_pool_name, ClusterId, NodePoolId};
