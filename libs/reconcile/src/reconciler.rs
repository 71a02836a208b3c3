//! Reconciliation of declared node pools against the remote control plane.
//!
//! Each operation is a single request/response transaction scoped to one
//! pool: validate, translate or diff, submit, wait for the long-running
//! remote operation, re-read, reflect. No state is held between
//! operations, and concurrent operations on different pools never share
//! anything; serializing operations on the *same* pool is the caller's
//! responsibility.
//!
//! Every operation runs under its own time budget. Cancellation is
//! cooperative: dropping an operation's future abandons the wait promptly
//! without attempting to cancel the remote-side operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use tidepool_id::NodePoolId;
use tidepool_remote::{ControlPlane, NodePool};

use crate::delta;
use crate::desired::DesiredPool;
use crate::error::ReconcileError;
use crate::reflect;
use crate::translate;
use crate::validate;

/// Per-operation time budgets.
///
/// Mutations cover a long-running remote operation and get a long budget;
/// reads are bounded tightly.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub create_timeout: Duration,
    pub read_timeout: Duration,
    pub update_timeout: Duration,
    pub delete_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            create_timeout: Duration::from_secs(60 * 60),
            read_timeout: Duration::from_secs(5 * 60),
            update_timeout: Duration::from_secs(60 * 60),
            delete_timeout: Duration::from_secs(60 * 60),
        }
    }
}

/// Outcome of a reconciliation that observed remote state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledPool {
    /// Canonical identifier, as assigned by the remote.
    pub id: NodePoolId,

    /// The remote state reflected back into the declared shape.
    pub config: DesiredPool,
}

/// Drives node pool lifecycle against a remote control plane.
pub struct Reconciler {
    remote: Arc<dyn ControlPlane>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Creates a reconciler with the default time budgets.
    pub fn new(remote: Arc<dyn ControlPlane>) -> Self {
        Self::with_config(remote, ReconcilerConfig::default())
    }

    /// Creates a reconciler with explicit time budgets.
    pub fn with_config(remote: Arc<dyn ControlPlane>, config: ReconcilerConfig) -> Self {
        Self { remote, config }
    }

    /// Creates a declared pool.
    ///
    /// The parent cluster must exist and have a scale-set backed pool; a
    /// pre-existing pool with the same identity is an
    /// [`AlreadyExists`](ReconcileError::AlreadyExists) failure, never
    /// silently adopted.
    pub async fn create(&self, cfg: &DesiredPool) -> Result<ReconciledPool, ReconcileError> {
        validate::validate(cfg)?;
        let id = cfg.pool_id()?;

        self.bounded(
            "create",
            &id,
            self.config.create_timeout,
            self.create_inner(&id, cfg),
        )
        .await
    }

    async fn create_inner(
        &self,
        id: &NodePoolId,
        cfg: &DesiredPool,
    ) -> Result<ReconciledPool, ReconcileError> {
        debug!(cluster = %cfg.cluster, pool = %cfg.name, "Fetching parent cluster");
        let cluster = match self.remote.get_cluster(&cfg.cluster).await {
            Ok(cluster) => cluster,
            Err(err) if err.is_not_found() => {
                return Err(ReconcileError::NotFound {
                    resource: format!("cluster {}", cfg.cluster),
                })
            }
            Err(err) => return Err(ReconcileError::remote("create", id, err)),
        };

        if !cluster.has_scale_set_pools() {
            return Err(ReconcileError::IncompatibleParent {
                cluster: cfg.cluster.to_string(),
            });
        }

        match self.remote.get_pool(id).await {
            Ok(existing) => {
                if let Some(existing_id) = existing.id.filter(|s| !s.is_empty()) {
                    return Err(ReconcileError::AlreadyExists { id: existing_id });
                }
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(ReconcileError::remote("create", id, err)),
        }

        let payload = translate::create_payload(cfg);

        debug!(pool = %id, "Submitting node pool creation");
        let operation = self
            .remote
            .create_or_update_pool(id, payload)
            .await
            .map_err(|err| ReconcileError::remote("create", id, err))?;

        operation
            .wait()
            .await
            .map_err(|err| ReconcileError::remote("create", id, err))?;

        self.read_back("create", id).await
    }

    /// Reads a pool.
    ///
    /// A missing parent cluster or missing pool yields `Ok(None)`: the
    /// resource no longer exists and the caller should drop local state.
    pub async fn read(&self, id: &NodePoolId) -> Result<Option<ReconciledPool>, ReconcileError> {
        self.bounded("read", id, self.config.read_timeout, self.read_inner(id))
            .await
    }

    async fn read_inner(
        &self,
        id: &NodePoolId,
    ) -> Result<Option<ReconciledPool>, ReconcileError> {
        // If the parent cluster is gone, the pool is gone with it.
        match self.remote.get_cluster(id.cluster()).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                debug!(cluster = %id.cluster(), "Parent cluster no longer exists; dropping local state");
                return Ok(None);
            }
            Err(err) => return Err(ReconcileError::remote("read", id, err)),
        }

        let pool = match self.remote.get_pool(id).await {
            Ok(pool) => pool,
            Err(err) if err.is_not_found() => {
                debug!(pool = %id, "Node pool no longer exists; dropping local state");
                return Ok(None);
            }
            Err(err) => return Err(ReconcileError::remote("read", id, err)),
        };

        let props = pool
            .properties
            .as_ref()
            .ok_or_else(|| ReconcileError::MissingRemoteState {
                id: id.to_string(),
                field: "properties",
            })?;

        Ok(Some(ReconciledPool {
            id: id.clone(),
            config: reflect::observed_config(id, props),
        }))
    }

    /// Updates a pool to match a new declaration.
    ///
    /// Only fields that changed relative to the previously declared state
    /// are written; the target must already exist.
    pub async fn update(
        &self,
        id: &NodePoolId,
        cfg: &DesiredPool,
    ) -> Result<ReconciledPool, ReconcileError> {
        validate::validate(cfg)?;

        self.bounded(
            "update",
            id,
            self.config.update_timeout,
            self.update_inner(id, cfg),
        )
        .await
    }

    async fn update_inner(
        &self,
        id: &NodePoolId,
        cfg: &DesiredPool,
    ) -> Result<ReconciledPool, ReconcileError> {
        debug!(pool = %id, "Fetching current remote state");
        let existing = match self.remote.get_pool(id).await {
            Ok(pool) => pool,
            Err(err) if err.is_not_found() => {
                return Err(ReconcileError::NotFound {
                    resource: format!("node pool {id}"),
                })
            }
            Err(err) => return Err(ReconcileError::remote("update", id, err)),
        };

        let observed =
            existing
                .properties
                .as_ref()
                .ok_or_else(|| ReconcileError::MissingRemoteState {
                    id: id.to_string(),
                    field: "properties",
                })?;

        let merged = delta::update_payload(observed, cfg)?;

        debug!(pool = %id, "Submitting node pool update");
        let payload = NodePool {
            id: existing.id.clone(),
            name: existing.name.clone(),
            properties: Some(merged),
        };
        let operation = self
            .remote
            .create_or_update_pool(id, payload)
            .await
            .map_err(|err| ReconcileError::remote("update", id, err))?;

        operation
            .wait()
            .await
            .map_err(|err| ReconcileError::remote("update", id, err))?;

        self.read_back("update", id).await
    }

    /// Deletes a pool. The target must exist; a missing target means the
    /// caller's local state is stale.
    pub async fn delete(&self, id: &NodePoolId) -> Result<(), ReconcileError> {
        self.bounded(
            "delete",
            id,
            self.config.delete_timeout,
            self.delete_inner(id),
        )
        .await
    }

    async fn delete_inner(&self, id: &NodePoolId) -> Result<(), ReconcileError> {
        debug!(pool = %id, "Submitting node pool deletion");
        let operation = match self.remote.delete_pool(id).await {
            Ok(operation) => operation,
            Err(err) if err.is_not_found() => {
                return Err(ReconcileError::NotFound {
                    resource: format!("node pool {id}"),
                })
            }
            Err(err) => return Err(ReconcileError::remote("delete", id, err)),
        };

        operation
            .wait()
            .await
            .map_err(|err| ReconcileError::remote("delete", id, err))
    }

    /// Adopts a pool by raw identifier.
    ///
    /// The identifier must parse before the pool is treated as managed;
    /// the pool is then read like any other.
    pub async fn import(&self, raw_id: &str) -> Result<Option<ReconciledPool>, ReconcileError> {
        let id = NodePoolId::parse(raw_id)?;
        self.read(&id).await
    }

    /// Re-reads a pool after a mutation completed and reflects it.
    async fn read_back(
        &self,
        operation: &'static str,
        id: &NodePoolId,
    ) -> Result<ReconciledPool, ReconcileError> {
        let pool = self
            .remote
            .get_pool(id)
            .await
            .map_err(|err| ReconcileError::remote(operation, id, err))?;

        let remote_id = match pool.id.as_deref() {
            Some(s) if !s.is_empty() => NodePoolId::parse(s)?,
            _ => {
                return Err(ReconcileError::MissingRemoteState {
                    id: id.to_string(),
                    field: "id",
                })
            }
        };

        let props = pool
            .properties
            .as_ref()
            .ok_or_else(|| ReconcileError::MissingRemoteState {
                id: id.to_string(),
                field: "properties",
            })?;

        let config = reflect::observed_config(&remote_id, props);
        Ok(ReconciledPool {
            id: remote_id,
            config,
        })
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        id: &NodePoolId,
        budget: Duration,
        fut: impl Future<Output = Result<T, ReconcileError>>,
    ) -> Result<T, ReconcileError> {
        match tokio::time::timeout(budget, fut).await {
            Ok(result) => result,
            Err(_) => Err(ReconcileError::Timeout {
                operation,
                id: id.to_string(),
                elapsed: budget,
            }),
        }
    }
}
