//! Structural validation of lifecycle rules
//!
//! Checks run in a fixed order and stop at the first violation. Nothing is
//! corrected here; callers either accept the rule as-is or reject it.

use crate::error::{Error, Result};

use super::types::{Filter, LifecycleRule};

/// Maximum rule id length accepted by S3-compatible servers
pub const MAX_RULE_ID_LEN: usize = 255;

fn invalid(rule: &LifecycleRule, message: impl std::fmt::Display) -> Error {
    if rule.id.is_empty() {
        Error::Validation(message.to_string())
    } else {
        Error::Validation(format!("rule '{}': {message}", rule.id))
    }
}

fn check_filter(rule: &LifecycleRule) -> Result<()> {
    let predicates = rule.filter.predicates();
    let count = predicates.count();

    match &rule.filter {
        Filter::Simple(_) if count > 1 => {
            return Err(invalid(
                rule,
                format!("simple filter carries {count} predicates, at most one is allowed"),
            ));
        }
        Filter::And(_) if count < 2 => {
            return Err(invalid(
                rule,
                format!("'and' filter needs at least two predicates, found {count}"),
            ));
        }
        _ => {}
    }

    for (i, tag) in predicates.tags.iter().enumerate() {
        if tag.key.is_empty() {
            return Err(invalid(rule, "filter tag with an empty key"));
        }
        if predicates.tags[..i].iter().any(|t| t.key == tag.key) {
            return Err(invalid(rule, format!("duplicate filter tag key '{}'", tag.key)));
        }
    }

    if let Some(gt) = predicates.size_greater_than
        && gt < 0
    {
        return Err(invalid(rule, "object size greater than must not be negative"));
    }
    if let Some(lt) = predicates.size_less_than
        && lt < 0
    {
        return Err(invalid(rule, "object size less than must not be negative"));
    }
    if let (Some(gt), Some(lt)) = (predicates.size_greater_than, predicates.size_less_than)
        && gt >= lt
    {
        return Err(invalid(
            rule,
            format!("object size range is empty: greater than {gt} and less than {lt}"),
        ));
    }

    Ok(())
}

fn check_expiration(rule: &LifecycleRule) -> Result<()> {
    if rule.expiration.trigger_count() > 1 {
        return Err(invalid(
            rule,
            "only one of expiration date, expiration days and expired object delete marker may be set",
        ));
    }
    Ok(())
}

fn check_transition(rule: &LifecycleRule) -> Result<()> {
    let transition = &rule.transition;
    let has_class = transition
        .storage_class
        .as_deref()
        .is_some_and(|c| !c.is_empty());

    match transition.trigger_count() {
        0 if has_class => Err(invalid(
            rule,
            "transition storage class is set without a transition date or days",
        )),
        0 => Ok(()),
        1 if !has_class => Err(invalid(rule, "transition requires a storage class")),
        1 => Ok(()),
        _ => Err(invalid(
            rule,
            "only one of transition date and transition days may be set",
        )),
    }
}

fn check_noncurrent(rule: &LifecycleRule) -> Result<()> {
    let transition = &rule.noncurrent_version_transition;
    if transition.storage_class.is_some() && transition.noncurrent_days.is_none() {
        return Err(invalid(
            rule,
            "noncurrent version transition storage class requires noncurrent transition days",
        ));
    }
    Ok(())
}

fn check_id(rule: &LifecycleRule) -> Result<()> {
    if rule.id.is_empty() {
        return Err(invalid(rule, "rule id must not be empty"));
    }
    if rule.id.len() > MAX_RULE_ID_LEN {
        return Err(invalid(
            rule,
            format!("rule id is longer than {MAX_RULE_ID_LEN} characters"),
        ));
    }
    Ok(())
}

/// A transition scheduled on or after the expiration of the same objects never fires
fn check_ordering(rule: &LifecycleRule) -> Result<()> {
    let (exp, tr) = (&rule.expiration, &rule.transition);

    if let (Some(tr_days), Some(exp_days)) = (tr.days, exp.days)
        && tr_days >= exp_days
    {
        return Err(invalid(
            rule,
            format!("transition days ({tr_days}) must be less than expiry days ({exp_days})"),
        ));
    }
    if let (Some(tr_date), Some(exp_date)) = (tr.date, exp.date)
        && tr_date >= exp_date
    {
        return Err(invalid(
            rule,
            format!("transition date ({tr_date}) must be before expiry date ({exp_date})"),
        ));
    }
    Ok(())
}

/// Validate one rule
///
/// Identifier uniqueness is a policy-level property and is checked on insertion.
pub fn validate_rule(rule: &LifecycleRule) -> Result<()> {
    check_filter(rule)?;
    check_expiration(rule)?;
    check_transition(rule)?;
    check_noncurrent(rule)?;
    check_id(rule)?;
    check_ordering(rule)?;
    Ok(())
}
