//! Wire types for the remote control plane.
//!
//! These mirror what the remote API sends and accepts. Optional fields are
//! genuinely three-state on the wire: absent, present-zero, and
//! present-nonzero mean different things for several of them (pod count,
//! disk size, bid price, eviction policy).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backing kind of a node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Pool backed by a virtual machine scale set.
    ScaleSet,

    /// Legacy pool backed by an availability set.
    AvailabilitySet,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolKind::ScaleSet => write!(f, "scale_set"),
            PoolKind::AvailabilitySet => write!(f, "availability_set"),
        }
    }
}

/// Operating system the pool's nodes run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsType {
    #[default]
    Linux,
    Windows,
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsType::Linux => write!(f, "linux"),
            OsType::Windows => write!(f, "windows"),
        }
    }
}

/// Pricing tier the pool's capacity is drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePriority {
    /// On-demand capacity.
    #[default]
    Regular,

    /// Preemptible spot capacity.
    Spot,
}

impl std::fmt::Display for ScalePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalePriority::Regular => write!(f, "regular"),
            ScalePriority::Spot => write!(f, "spot"),
        }
    }
}

/// What happens to spot nodes when they are evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Evicted nodes are deleted.
    Delete,

    /// Evicted nodes are stopped and their disks retained.
    Deallocate,
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvictionPolicy::Delete => write!(f, "delete"),
            EvictionPolicy::Deallocate => write!(f, "deallocate"),
        }
    }
}

/// Properties of a node pool as the remote API represents them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NodePoolProperties {
    /// Backing kind. New pools are always scale-set backed.
    #[serde(rename = "type")]
    pub kind: PoolKind,

    pub vm_size: String,

    #[serde(default)]
    pub os_type: OsType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_scaling: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_node_public_ip: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pods: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_labels: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_taints: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_disk_size_gb: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnet_subnet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_priority: Option<ScalePriority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eviction_policy: Option<EvictionPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_max_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl NodePoolProperties {
    /// Creates a property set with only the required fields; everything
    /// else starts unspecified.
    pub fn new(kind: PoolKind, vm_size: impl Into<String>) -> Self {
        Self {
            kind,
            vm_size: vm_size.into(),
            os_type: OsType::default(),
            count: None,
            enable_auto_scaling: None,
            min_count: None,
            max_count: None,
            availability_zones: None,
            enable_node_public_ip: None,
            max_pods: None,
            node_labels: None,
            node_taints: None,
            os_disk_size_gb: None,
            vnet_subnet_id: None,
            scale_priority: None,
            eviction_policy: None,
            spot_max_price: None,
            tags: None,
        }
    }
}

/// A node pool as returned by (and submitted to) the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NodePool {
    /// Remote-assigned identifier. Absent until the pool materializes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// The remote may omit properties; callers that need them must treat
    /// absence as an incomplete response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<NodePoolProperties>,
}

/// Summary of a pool embedded in its parent cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoolProfile {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: PoolKind,
}

/// A managed cluster as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub pool_profiles: Vec<PoolProfile>,
}

impl Cluster {
    /// Whether any of the cluster's pools is scale-set backed. Additional
    /// pools can only be attached to clusters that are.
    pub fn has_scale_set_pools(&self) -> bool {
        self.pool_profiles
            .iter()
            .any(|p| p.kind == PoolKind::ScaleSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_pool_deserialization() {
        let json = r#"{
            "id": "/scopes/prod/clusters/main/pools/workers",
            "name": "workers",
            "properties": {
                "type": "scale_set",
                "vm_size": "standard-d2",
                "os_type": "linux",
                "count": 3,
                "enable_auto_scaling": true,
                "min_count": 1,
                "max_count": 5,
                "tags": {"team": "infra"}
            }
        }"#;

        let pool: NodePool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.name, "workers");

        let props = pool.properties.unwrap();
        assert_eq!(props.kind, PoolKind::ScaleSet);
        assert_eq!(props.count, Some(3));
        assert_eq!(props.min_count, Some(1));
        assert_eq!(props.max_count, Some(5));
        assert_eq!(props.max_pods, None);
        assert_eq!(props.tags.unwrap()["team"], "infra");
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let pool = NodePool {
            id: None,
            name: "workers".to_string(),
            properties: Some(NodePoolProperties::new(PoolKind::ScaleSet, "standard-d2")),
        };

        let json = serde_json::to_string(&pool).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("max_pods"));
        assert!(!json.contains("spot_max_price"));
        assert!(json.contains("\"type\":\"scale_set\""));
    }

    #[test]
    fn test_cluster_scale_set_detection() {
        let mut cluster = Cluster {
            id: None,
            name: "main".to_string(),
            pool_profiles: vec![PoolProfile {
                name: "default".to_string(),
                kind: PoolKind::AvailabilitySet,
            }],
        };
        assert!(!cluster.has_scale_set_pools());

        cluster.pool_profiles.push(PoolProfile {
            name: "workers".to_string(),
            kind: PoolKind::ScaleSet,
        });
        assert!(cluster.has_scale_set_pools());
    }
}
