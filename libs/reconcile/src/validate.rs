//! Cross-field invariant checks for declared configurations.
//!
//! The validator is pure: no I/O, no side effects. It runs pre-flight on
//! the raw declaration before every mutating call, and its autoscaling
//! rules run a second time inside the delta builder against the merged
//! update, so stale values echoed back by the remote can never sneak past
//! it. All applicable violations are accumulated into one combined error.

use tidepool_id::validate_pool_name;
use tidepool_remote::ScalePriority;

use crate::desired::DesiredPool;
use crate::error::ValidationError;

const COUNT_MIN: i32 = 1;
const COUNT_MAX: i32 = 100;

/// Checks a declared configuration against every invariant.
pub fn validate(cfg: &DesiredPool) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    check_autoscaling(cfg, &mut violations);
    check_spot_fields(cfg, &mut violations);
    check_identity(cfg, &mut violations);
    check_ranges(cfg, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

/// Bound checks that apply whenever autoscaling is enabled. Shared with
/// the delta builder, which re-runs them on the merged update payload.
pub(crate) fn enabled_bounds_violations(min: i32, max: i32, violations: &mut Vec<String>) {
    if max <= 0 {
        violations.push("`max_count` must be set when autoscaling is enabled".to_string());
    }
    if min <= 0 {
        violations.push("`min_count` must be set when autoscaling is enabled".to_string());
    }
    if min > 0 && max > 0 && min > max {
        violations.push("`max_count` must be greater than or equal to `min_count`".to_string());
    }
}

fn check_autoscaling(cfg: &DesiredPool, violations: &mut Vec<String>) {
    let autoscaling = cfg.autoscaling;

    if autoscaling.enabled {
        enabled_bounds_violations(autoscaling.min_count, autoscaling.max_count, violations);
    } else if autoscaling.min_count != 0 || autoscaling.max_count != 0 {
        violations.push(
            "`min_count` and `max_count` must be unset when autoscaling is disabled".to_string(),
        );
    }
}

fn check_spot_fields(cfg: &DesiredPool, violations: &mut Vec<String>) {
    if cfg.priority != ScalePriority::Regular {
        return;
    }

    if cfg.max_bid_price != 0.0 {
        violations
            .push("`priority` must be `spot` when `max_bid_price` is set".to_string());
    }
    if cfg.eviction_policy.is_some() {
        violations
            .push("`priority` must be `spot` when `eviction_policy` is set".to_string());
    }
}

fn check_identity(cfg: &DesiredPool, violations: &mut Vec<String>) {
    if let Err(err) = validate_pool_name(&cfg.name) {
        violations.push(err.to_string());
    }
    if cfg.vm_size.is_empty() {
        violations.push("`vm_size` must not be empty".to_string());
    }
}

fn check_ranges(cfg: &DesiredPool, violations: &mut Vec<String>) {
    for (field, value) in [
        ("node_count", cfg.node_count),
        ("min_count", cfg.autoscaling.min_count),
        ("max_count", cfg.autoscaling.max_count),
    ] {
        if value != 0 && !(COUNT_MIN..=COUNT_MAX).contains(&value) {
            violations.push(format!(
                "`{field}` must be between {COUNT_MIN} and {COUNT_MAX}"
            ));
        }
    }

    if cfg.os_disk_size_gb != 0 && cfg.os_disk_size_gb < 1 {
        violations.push("`os_disk_size_gb` must be at least 1".to_string());
    }

    if cfg.max_bid_price != 0.0 && cfg.max_bid_price != -1.0 && cfg.max_bid_price <= 0.0 {
        violations.push("`max_bid_price` must be -1 or greater than 0".to_string());
    }
}
