//! Partial updates of existing lifecycle rules
//!
//! The patch is computed on a copy of the stored rule and validated before it
//! is handed back, so a failed edit never leaves a half-updated rule behind.

use crate::error::{Error, Result};

use super::builder::EXPIRATION_GROUP_CONFLICT;
use super::filter::patch_filter;
use super::options::{LifecycleOptions, normalize_storage_class};
use super::trigger::{TriggerKind, resolve_trigger};
use super::types::{Expiration, LifecycleRule, RuleStatus, Transition};
use super::validate::validate_rule;

/// Overwrite the expiration group; engaging one member clears the other two
fn patch_expiration(dest: &mut Expiration, opts: &LifecycleOptions) -> Result<()> {
    if opts.expiration_members() > 1 {
        return Err(Error::Conflict(EXPIRATION_GROUP_CONFLICT.to_string()));
    }

    let trigger = resolve_trigger(
        TriggerKind::Expiry,
        opts.expiry_date.as_deref(),
        opts.expiry_days.as_deref(),
    )?;

    if let Some(trigger) = trigger {
        (dest.date, dest.days) = trigger.into_fields();
        dest.expired_object_delete_marker = false;
    } else if opts.delete_marker_engaged() {
        dest.date = None;
        dest.days = None;
        dest.expired_object_delete_marker = true;
    } else if opts.expired_object_delete_marker == Some(false) {
        dest.expired_object_delete_marker = false;
    }

    if let Some(all) = opts.expire_all_versions {
        dest.delete_all_versions = all;
    }

    Ok(())
}

fn patch_transition(dest: &mut Transition, opts: &LifecycleOptions) -> Result<()> {
    let trigger = resolve_trigger(
        TriggerKind::Transition,
        opts.transition_date.as_deref(),
        opts.transition_days.as_deref(),
    )?;

    if let Some(trigger) = trigger {
        (dest.date, dest.days) = trigger.into_fields();
    }

    if let Some(class) = opts.storage_class.as_deref() {
        dest.storage_class = Some(normalize_storage_class(class));
    }

    Ok(())
}

/// Apply the explicitly set options onto a copy of `rule`
///
/// Fields whose option is unset are left untouched. The returned rule has
/// passed validation; `rule` itself is never modified.
pub fn apply_options(rule: &LifecycleRule, opts: &LifecycleOptions) -> Result<LifecycleRule> {
    if opts.is_empty() {
        return Ok(rule.clone());
    }

    let mut candidate = rule.clone();

    candidate.filter = patch_filter(&rule.filter, opts)?;
    patch_expiration(&mut candidate.expiration, opts)?;
    patch_transition(&mut candidate.transition, opts)?;

    let nc_exp = &mut candidate.noncurrent_version_expiration;
    if let Some(days) = opts.noncurrent_expiration_days {
        nc_exp.noncurrent_days = Some(days);
    }
    if let Some(versions) = opts.newer_noncurrent_expiration_versions {
        nc_exp.newer_noncurrent_versions = Some(versions);
    }

    let nc_tr = &mut candidate.noncurrent_version_transition;
    if let Some(days) = opts.noncurrent_transition_days {
        nc_tr.noncurrent_days = Some(days);
    }
    if let Some(versions) = opts.newer_noncurrent_transition_versions {
        nc_tr.newer_noncurrent_versions = Some(versions);
    }
    if let Some(class) = opts.noncurrent_transition_storage_class.as_deref() {
        nc_tr.storage_class = Some(normalize_storage_class(class));
    }

    if let Some(enabled) = opts.status {
        candidate.status = RuleStatus::from(enabled);
    }

    validate_rule(&candidate)?;
    tracing::debug!(rule_id = %candidate.id, "patched lifecycle rule");

    Ok(candidate)
}
