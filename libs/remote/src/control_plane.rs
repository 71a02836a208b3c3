//! Remote control-plane interface.
//!
//! Mutations on the remote side are asynchronous: a create-or-update or
//! delete call returns an [`Operation`] handle, and the caller waits for
//! the operation to reach a terminal state before reading the result back.

use async_trait::async_trait;
use tidepool_id::{ClusterId, NodePoolId};

use crate::error::ApiError;
use crate::types::{Cluster, NodePool};

/// Handle to an asynchronous remote mutation.
///
/// Callers bound the wait with their own deadline (for example
/// `tokio::time::timeout`). Dropping the wait future abandons the wait; it
/// does not cancel the remote-side operation.
#[async_trait]
pub trait Operation: Send {
    /// Waits until the operation reaches a terminal state.
    async fn wait(self: Box<Self>) -> Result<(), ApiError>;
}

/// The remote control plane that owns clusters and node pools.
///
/// Every call is independently atomic from the caller's point of view;
/// coordination between concurrent writers is the remote's concern.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetches a cluster.
    async fn get_cluster(&self, id: &ClusterId) -> Result<Cluster, ApiError>;

    /// Fetches a node pool.
    async fn get_pool(&self, id: &NodePoolId) -> Result<NodePool, ApiError>;

    /// Begins creating or updating a node pool.
    async fn create_or_update_pool(
        &self,
        id: &NodePoolId,
        pool: NodePool,
    ) -> Result<Box<dyn Operation>, ApiError>;

    /// Begins deleting a node pool.
    async fn delete_pool(&self, id: &NodePoolId) -> Result<Box<dyn Operation>, ApiError>;
}
