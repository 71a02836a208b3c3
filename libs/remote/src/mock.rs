//! In-memory control plane for testing and development.
//!
//! The mock keeps clusters and pools in maps keyed by their canonical
//! identifier strings, applies mutations at submission time, and hands out
//! operation handles that resolve after a configurable delay. Submitted
//! payloads are recorded so tests can assert on exactly what was sent.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use tidepool_id::{ClusterId, NodePoolId};

use crate::control_plane::{ControlPlane, Operation};
use crate::error::ApiError;
use crate::types::{Cluster, NodePool, PoolKind, PoolProfile};

#[derive(Default)]
struct MockState {
    clusters: HashMap<String, Cluster>,
    pools: HashMap<String, NodePool>,
    submissions: Vec<NodePool>,
}

/// Mock control plane for testing and development.
pub struct MockControlPlane {
    state: RwLock<MockState>,

    /// How long operation handles take to resolve.
    operation_delay: Duration,

    /// Whether operations should "fail" after their delay.
    fail_operations: bool,
}

impl MockControlPlane {
    /// Creates a mock whose operations resolve immediately and succeed.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState::default()),
            operation_delay: Duration::ZERO,
            fail_operations: false,
        }
    }

    /// Creates a mock whose operations resolve after `delay`.
    pub fn with_operation_delay(delay: Duration) -> Self {
        Self {
            operation_delay: delay,
            ..Self::new()
        }
    }

    /// Creates a mock whose operations all fail.
    pub fn failing_operations() -> Self {
        Self {
            fail_operations: true,
            ..Self::new()
        }
    }

    /// Seeds a cluster.
    pub async fn put_cluster(&self, id: &ClusterId, cluster: Cluster) {
        let mut state = self.state.write().await;
        state.clusters.insert(id.to_string(), cluster);
    }

    /// Seeds a cluster whose default pool is backed by the given kind.
    pub async fn put_cluster_backed_by(&self, id: &ClusterId, kind: PoolKind) {
        let cluster = Cluster {
            id: Some(id.to_string()),
            name: id.name().to_string(),
            pool_profiles: vec![PoolProfile {
                name: "default".to_string(),
                kind,
            }],
        };
        self.put_cluster(id, cluster).await;
    }

    /// Removes a cluster, simulating out-of-band deletion.
    pub async fn remove_cluster(&self, id: &ClusterId) {
        let mut state = self.state.write().await;
        state.clusters.remove(&id.to_string());
    }

    /// Seeds a pool.
    pub async fn put_pool(&self, id: &NodePoolId, pool: NodePool) {
        let mut state = self.state.write().await;
        state.pools.insert(id.to_string(), pool);
    }

    /// Returns the stored pool, if any.
    pub async fn pool(&self, id: &NodePoolId) -> Option<NodePool> {
        let state = self.state.read().await;
        state.pools.get(&id.to_string()).cloned()
    }

    /// Returns the most recently submitted mutation payload.
    pub async fn last_submission(&self) -> Option<NodePool> {
        let state = self.state.read().await;
        state.submissions.last().cloned()
    }

    fn operation(&self) -> Box<dyn Operation> {
        Box::new(MockOperation {
            delay: self.operation_delay,
            fail: self.fail_operations,
        })
    }
}

impl Default for MockControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlPlane for MockControlPlane {
    async fn get_cluster(&self, id: &ClusterId) -> Result<Cluster, ApiError> {
        let state = self.state.read().await;
        state
            .clusters
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("cluster {id}")))
    }

    async fn get_pool(&self, id: &NodePoolId) -> Result<NodePool, ApiError> {
        let state = self.state.read().await;
        state
            .pools
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("node pool {id}")))
    }

    async fn create_or_update_pool(
        &self,
        id: &NodePoolId,
        pool: NodePool,
    ) -> Result<Box<dyn Operation>, ApiError> {
        debug!(pool = %id, "[MOCK] Accepting create-or-update");

        let mut stored = pool.clone();
        stored.id = Some(id.to_string());

        let mut state = self.state.write().await;
        state.pools.insert(id.to_string(), stored);
        state.submissions.push(pool);

        Ok(self.operation())
    }

    async fn delete_pool(&self, id: &NodePoolId) -> Result<Box<dyn Operation>, ApiError> {
        debug!(pool = %id, "[MOCK] Accepting delete");

        let mut state = self.state.write().await;
        if state.pools.remove(&id.to_string()).is_none() {
            return Err(ApiError::not_found(format!("node pool {id}")));
        }

        Ok(self.operation())
    }
}

/// Operation handle handed out by [`MockControlPlane`].
pub struct MockOperation {
    delay: Duration,
    fail: bool,
}

#[async_trait]
impl Operation for MockOperation {
    async fn wait(self: Box<Self>) -> Result<(), ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(ApiError::Operation {
                code: "MockFailure".to_string(),
                message: "mock configured to fail operations".to_string(),
            });
        }

        Ok(())
    }
}
