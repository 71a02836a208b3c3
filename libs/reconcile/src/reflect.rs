//! State reflection from remote responses back into the declared shape.

use tidepool_id::NodePoolId;
use tidepool_remote::NodePoolProperties;

use crate::desired::{Autoscaling, DesiredPool};

/// Maps observed remote properties back into the declared-configuration
/// shape.
///
/// Absent numeric, boolean, and collection fields map to their zero
/// values: the declared shape never carries an ambiguous null. The
/// absent-versus-zero distinction stays inside the delta builder, which
/// works on the wire shape directly.
pub fn observed_config(id: &NodePoolId, props: &NodePoolProperties) -> DesiredPool {
    DesiredPool {
        name: id.name().to_string(),
        cluster: id.cluster().clone(),
        vm_size: props.vm_size.clone(),
        os_type: props.os_type,
        node_count: props.count.unwrap_or(0),
        autoscaling: Autoscaling {
            enabled: props.enable_auto_scaling.unwrap_or(false),
            min_count: props.min_count.unwrap_or(0),
            max_count: props.max_count.unwrap_or(0),
        },
        availability_zones: props.availability_zones.clone().unwrap_or_default(),
        node_public_ip: props.enable_node_public_ip.unwrap_or(false),
        max_pods: props.max_pods.unwrap_or(0),
        node_labels: props.node_labels.clone().unwrap_or_default(),
        node_taints: props.node_taints.clone().unwrap_or_default(),
        os_disk_size_gb: props.os_disk_size_gb.unwrap_or(0),
        vnet_subnet_id: props.vnet_subnet_id.clone().filter(|s| !s.is_empty()),
        priority: props.scale_priority.unwrap_or_default(),
        eviction_policy: props.eviction_policy,
        max_bid_price: props.spot_max_price.unwrap_or(0.0),
        tags: props.tags.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use tidepool_id::ClusterId;
    use tidepool_remote::{EvictionPolicy, OsType, PoolKind, ScalePriority};

    use crate::translate::create_payload;

    fn pool_id() -> NodePoolId {
        NodePoolId::parse("/scopes/prod/clusters/main/pools/workers").unwrap()
    }

    #[test]
    fn test_absent_fields_map_to_zero_values() {
        let props = NodePoolProperties::new(PoolKind::ScaleSet, "standard-d2");
        let cfg = observed_config(&pool_id(), &props);

        assert_eq!(cfg.name, "workers");
        assert_eq!(cfg.cluster.to_string(), "/scopes/prod/clusters/main");
        assert_eq!(cfg.node_count, 0);
        assert!(!cfg.autoscaling.enabled);
        assert_eq!(cfg.autoscaling.min_count, 0);
        assert_eq!(cfg.autoscaling.max_count, 0);
        assert_eq!(cfg.max_pods, 0);
        assert_eq!(cfg.os_disk_size_gb, 0);
        assert_eq!(cfg.max_bid_price, 0.0);
        assert_eq!(cfg.priority, ScalePriority::Regular);
        assert_eq!(cfg.eviction_policy, None);
        assert_eq!(cfg.vnet_subnet_id, None);
        assert!(cfg.availability_zones.is_empty());
        assert!(cfg.node_labels.is_empty());
        assert!(cfg.node_taints.is_empty());
        assert!(cfg.tags.is_empty());
    }

    #[test]
    fn test_full_round_trip() {
        let cluster = ClusterId::new("prod", "main").unwrap();
        let mut cfg = DesiredPool::new(cluster, "workers", "standard-d2");
        cfg.os_type = OsType::Windows;
        cfg.node_count = 3;
        cfg.autoscaling = Autoscaling {
            enabled: true,
            min_count: 1,
            max_count: 5,
        };
        cfg.availability_zones = vec!["1".to_string(), "2".to_string()];
        cfg.node_public_ip = true;
        cfg.max_pods = 110;
        cfg.node_labels = BTreeMap::from([("role".to_string(), "worker".to_string())]);
        cfg.node_taints = vec!["dedicated=gpu:NoSchedule".to_string()];
        cfg.os_disk_size_gb = 64;
        cfg.vnet_subnet_id = Some("/scopes/prod/networks/main/subnets/pods".to_string());
        cfg.priority = ScalePriority::Spot;
        cfg.eviction_policy = Some(EvictionPolicy::Delete);
        cfg.max_bid_price = 0.25;
        cfg.tags = BTreeMap::from([("team".to_string(), "infra".to_string())]);

        let payload = create_payload(&cfg);
        let reflected = observed_config(&cfg.pool_id().unwrap(), payload.properties.as_ref().unwrap());

        assert_eq!(reflected, cfg);
    }

    prop_compose! {
        fn valid_config()(
            name in "[a-z][a-z0-9]{0,11}",
            autoscale in prop::option::of((1..=50i32, 0..=50i32)),
            declared_count in 1..=100i32,
            undeclared_count in any::<bool>(),
            public_ip in any::<bool>(),
            max_pods in prop_oneof![Just(0), 10..=250i32],
            disk in prop_oneof![Just(0), 30..=200i32],
            spot in any::<bool>(),
            bid in prop_oneof![Just(0.0), Just(-1.0), 0.01..10.0f64],
            zones in prop::collection::vec("[1-3]", 0..3),
        ) -> DesiredPool {
            let cluster = ClusterId::new("prod", "main").unwrap();
            let mut cfg = DesiredPool::new(cluster, name, "standard-d2");
            cfg.node_count = declared_count;
            if let Some((min, span)) = autoscale {
                cfg.autoscaling = Autoscaling {
                    enabled: true,
                    min_count: min,
                    max_count: (min + span).min(100),
                };
                if undeclared_count {
                    cfg.node_count = 0;
                }
            }
            cfg.node_public_ip = public_ip;
            cfg.max_pods = max_pods;
            cfg.os_disk_size_gb = disk;
            if spot {
                cfg.priority = ScalePriority::Spot;
                cfg.eviction_policy = Some(EvictionPolicy::Deallocate);
                cfg.max_bid_price = bid;
            }
            cfg.availability_zones = zones;
            cfg
        }
    }

    proptest! {
        #[test]
        fn prop_reflect_reverses_translate(cfg in valid_config()) {
            prop_assert!(crate::validate(&cfg).is_ok());

            let payload = create_payload(&cfg);
            let reflected =
                observed_config(&cfg.pool_id().unwrap(), payload.properties.as_ref().unwrap());

            // The only computed divergence: an undeclared count comes back
            // as the autoscaling floor the translator seeded it with.
            let mut expected = cfg.clone();
            if expected.node_count == 0 {
                expected.node_count = expected.autoscaling.min_count;
            }

            prop_assert_eq!(reflected, expected);
        }
    }
}
