//! Create-path translation from a declaration to the remote mutation shape.

use tidepool_remote::{NodePool, NodePoolProperties, PoolKind};

use crate::desired::DesiredPool;

/// Builds the full creation payload for a declared pool.
///
/// The declaration must already have passed [`validate`](crate::validate);
/// the translator only applies defaulting and omission rules:
///
/// - `count` is always sent. The remote requires a count at creation even
///   for autoscaled pools, so when autoscaling is enabled and no count was
///   declared, the autoscaling floor seeds the initial count.
/// - Unset optional fields are omitted entirely rather than sent as
///   zero/empty values; the remote treats "not specified" and "explicitly
///   zero" differently for several of them.
/// - New pools are always stamped scale-set backed. The legacy pool kind
///   is never produced.
pub fn create_payload(cfg: &DesiredPool) -> NodePool {
    let mut props = NodePoolProperties::new(PoolKind::ScaleSet, &cfg.vm_size);
    props.os_type = cfg.os_type;
    props.count = Some(cfg.node_count);
    props.enable_auto_scaling = Some(cfg.autoscaling.enabled);
    props.enable_node_public_ip = Some(cfg.node_public_ip);
    props.scale_priority = Some(cfg.priority);
    props.tags = Some(cfg.tags.clone());

    if !cfg.availability_zones.is_empty() {
        props.availability_zones = Some(cfg.availability_zones.clone());
    }

    if cfg.max_pods > 0 {
        props.max_pods = Some(cfg.max_pods);
    }

    if !cfg.node_labels.is_empty() {
        props.node_labels = Some(cfg.node_labels.clone());
    }

    if !cfg.node_taints.is_empty() {
        props.node_taints = Some(cfg.node_taints.clone());
    }

    if cfg.os_disk_size_gb > 0 {
        props.os_disk_size_gb = Some(cfg.os_disk_size_gb);
    }

    if let Some(subnet) = cfg.vnet_subnet_id.as_deref() {
        if !subnet.is_empty() {
            props.vnet_subnet_id = Some(subnet.to_string());
        }
    }

    props.eviction_policy = cfg.eviction_policy;

    if cfg.max_bid_price != 0.0 {
        props.spot_max_price = Some(cfg.max_bid_price);
    }

    if cfg.autoscaling.enabled {
        if cfg.node_count == 0 {
            props.count = Some(cfg.autoscaling.min_count);
        }
        props.min_count = Some(cfg.autoscaling.min_count);
        props.max_count = Some(cfg.autoscaling.max_count);
    }

    NodePool {
        id: None,
        name: cfg.name.clone(),
        properties: Some(props),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_id::ClusterId;
    use tidepool_remote::{EvictionPolicy, OsType, ScalePriority};

    fn base() -> DesiredPool {
        let cluster = ClusterId::new("prod", "main").unwrap();
        let mut cfg = DesiredPool::new(cluster, "workers", "standard-d2");
        cfg.node_count = 3;
        cfg
    }

    #[test]
    fn test_minimal_payload() {
        let payload = create_payload(&base());
        assert_eq!(payload.name, "workers");
        assert_eq!(payload.id, None);

        let props = payload.properties.unwrap();
        assert_eq!(props.kind, PoolKind::ScaleSet);
        assert_eq!(props.vm_size, "standard-d2");
        assert_eq!(props.os_type, OsType::Linux);
        assert_eq!(props.count, Some(3));
        assert_eq!(props.enable_auto_scaling, Some(false));
        assert_eq!(props.scale_priority, Some(ScalePriority::Regular));

        // Unset optionals are omitted, not sent as zero/empty.
        assert_eq!(props.max_pods, None);
        assert_eq!(props.os_disk_size_gb, None);
        assert_eq!(props.availability_zones, None);
        assert_eq!(props.node_labels, None);
        assert_eq!(props.node_taints, None);
        assert_eq!(props.vnet_subnet_id, None);
        assert_eq!(props.eviction_policy, None);
        assert_eq!(props.spot_max_price, None);
        assert_eq!(props.min_count, None);
        assert_eq!(props.max_count, None);
    }

    #[test]
    fn test_autoscaling_seeds_count_from_floor() {
        let mut cfg = base();
        cfg.node_count = 0;
        cfg.autoscaling = crate::Autoscaling {
            enabled: true,
            min_count: 2,
            max_count: 8,
        };

        let props = create_payload(&cfg).properties.unwrap();
        assert_eq!(props.count, Some(2));
        assert_eq!(props.min_count, Some(2));
        assert_eq!(props.max_count, Some(8));
        assert_eq!(props.enable_auto_scaling, Some(true));
    }

    #[test]
    fn test_declared_count_wins_over_floor() {
        let mut cfg = base();
        cfg.node_count = 4;
        cfg.autoscaling = crate::Autoscaling {
            enabled: true,
            min_count: 2,
            max_count: 8,
        };

        let props = create_payload(&cfg).properties.unwrap();
        assert_eq!(props.count, Some(4));
    }

    #[test]
    fn test_spot_fields_carried_when_set() {
        let mut cfg = base();
        cfg.priority = ScalePriority::Spot;
        cfg.eviction_policy = Some(EvictionPolicy::Deallocate);
        cfg.max_bid_price = 0.42;

        let props = create_payload(&cfg).properties.unwrap();
        assert_eq!(props.scale_priority, Some(ScalePriority::Spot));
        assert_eq!(props.eviction_policy, Some(EvictionPolicy::Deallocate));
        assert_eq!(props.spot_max_price, Some(0.42));
    }

    #[test]
    fn test_empty_subnet_is_omitted() {
        let mut cfg = base();
        cfg.vnet_subnet_id = Some(String::new());

        let props = create_payload(&cfg).properties.unwrap();
        assert_eq!(props.vnet_subnet_id, None);
    }
}
