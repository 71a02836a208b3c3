//! Update-path delta computation.

use tidepool_remote::NodePoolProperties;

use crate::desired::DesiredPool;
use crate::error::ValidationError;
use crate::validate::enabled_bounds_violations;

/// Builds the minimal update payload for a pool.
///
/// Change detection compares the new declaration against the previously
/// declared values (the zero-mapped reflection of the observed remote
/// state), not against the raw remote echo. Only fields the caller actually
/// changed are written into the merged payload; everything else keeps its
/// observed value so unrelated server-side state is never reverted.
/// Identity and creation-only fields are never touched.
///
/// After merging, the effective autoscaling triple is re-checked:
/// enabling autoscaling requires both bounds on the merged result, and
/// disabling it force-clears both bounds even when the observed state
/// still carries them. Leaving stale bounds behind would fail pre-flight
/// validation on the next reconciliation and diff forever.
pub fn update_payload(
    observed: &NodePoolProperties,
    cfg: &DesiredPool,
) -> Result<NodePoolProperties, ValidationError> {
    let mut merged = observed.clone();

    if cfg.availability_zones != observed.availability_zones.clone().unwrap_or_default() {
        merged.availability_zones = Some(cfg.availability_zones.clone());
    }

    let mut enabled = observed.enable_auto_scaling.unwrap_or(false);
    if cfg.autoscaling.enabled != enabled {
        enabled = cfg.autoscaling.enabled;
        merged.enable_auto_scaling = Some(enabled);
    }

    if cfg.node_public_ip != observed.enable_node_public_ip.unwrap_or(false) {
        merged.enable_node_public_ip = Some(cfg.node_public_ip);
    }

    if cfg.autoscaling.max_count != observed.max_count.unwrap_or(0) {
        merged.max_count = Some(cfg.autoscaling.max_count);
    }

    if cfg.autoscaling.min_count != observed.min_count.unwrap_or(0) {
        merged.min_count = Some(cfg.autoscaling.min_count);
    }

    // An undeclared count (zero) is not a request for zero nodes; the
    // observed count stands, e.g. where the autoscaler owns it.
    if cfg.node_count != 0 && cfg.node_count != observed.count.unwrap_or(0) {
        merged.count = Some(cfg.node_count);
    }

    if cfg.tags != observed.tags.clone().unwrap_or_default() {
        merged.tags = Some(cfg.tags.clone());
    }

    reconcile_autoscaling(enabled, &mut merged)?;

    Ok(merged)
}

/// Re-checks the effective autoscaling triple on the merged payload.
fn reconcile_autoscaling(
    enabled: bool,
    merged: &mut NodePoolProperties,
) -> Result<(), ValidationError> {
    if enabled {
        let min = merged.min_count.unwrap_or(0);
        let max = merged.max_count.unwrap_or(0);

        let mut violations = Vec::new();
        enabled_bounds_violations(min, max, &mut violations);
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }
    } else {
        merged.min_count = None;
        merged.max_count = None;
    }

    Ok(())
}
