//! Declared node pool configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tidepool_id::{ClusterId, IdError, NodePoolId};
use tidepool_remote::{EvictionPolicy, OsType, ScalePriority};

/// Autoscaling settings for a pool.
///
/// A bound of `0` means unset. The declared schema cannot express an
/// explicit zero bound, and zero is not a legal bound anyway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Autoscaling {
    pub enabled: bool,
    pub min_count: i32,
    pub max_count: i32,
}

/// Declared target state for a node pool.
///
/// `name`, `cluster`, `vm_size`, `os_type`, `max_pods`, `node_labels`,
/// `node_taints`, `os_disk_size_gb`, `vnet_subnet_id`, `priority`,
/// `eviction_policy`, and `max_bid_price` are fixed once the pool exists;
/// the remaining fields can change between reconciliations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredPool {
    pub name: String,

    pub cluster: ClusterId,

    pub vm_size: String,

    #[serde(default)]
    pub os_type: OsType,

    /// Desired node count; `0` = undeclared, which is only allowed when
    /// autoscaling is enabled.
    #[serde(default)]
    pub node_count: i32,

    #[serde(default)]
    pub autoscaling: Autoscaling,

    #[serde(default)]
    pub availability_zones: Vec<String>,

    #[serde(default)]
    pub node_public_ip: bool,

    /// Maximum pods per node; `0` = let the remote pick a default.
    #[serde(default)]
    pub max_pods: i32,

    #[serde(default)]
    pub node_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub node_taints: Vec<String>,

    /// OS disk size in GB; `0` = let the remote pick a default.
    #[serde(default)]
    pub os_disk_size_gb: i32,

    #[serde(default)]
    pub vnet_subnet_id: Option<String>,

    #[serde(default)]
    pub priority: ScalePriority,

    /// Only valid for spot pools.
    #[serde(default)]
    pub eviction_policy: Option<EvictionPolicy>,

    /// Maximum spot bid price; `0.0` = unset, `-1.0` = cap at the
    /// on-demand price. A genuine bid of exactly zero is not expressible.
    #[serde(default)]
    pub max_bid_price: f64,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl DesiredPool {
    /// Creates a minimal declaration; every optional field starts unset.
    pub fn new(
        cluster: ClusterId,
        name: impl Into<String>,
        vm_size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cluster,
            vm_size: vm_size.into(),
            os_type: OsType::default(),
            node_count: 0,
            autoscaling: Autoscaling::default(),
            availability_zones: Vec::new(),
            node_public_ip: false,
            max_pods: 0,
            node_labels: BTreeMap::new(),
            node_taints: Vec::new(),
            os_disk_size_gb: 0,
            vnet_subnet_id: None,
            priority: ScalePriority::default(),
            eviction_policy: None,
            max_bid_price: 0.0,
            tags: BTreeMap::new(),
        }
    }

    /// The pool identifier this declaration addresses.
    pub fn pool_id(&self) -> Result<NodePoolId, IdError> {
        NodePoolId::new(self.cluster.clone(), self.name.clone())
    }
}
