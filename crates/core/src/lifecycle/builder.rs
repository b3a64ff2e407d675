//! Construction of new lifecycle rules from options

use crate::error::{Error, Result};

use super::filter::compose_filter;
use super::options::{LifecycleOptions, normalize_storage_class};
use super::trigger::{TriggerKind, resolve_trigger};
use super::types::{
    Expiration, LifecycleRule, NoncurrentVersionExpiration, NoncurrentVersionTransition,
    RuleStatus, Transition,
};
use super::validate::validate_rule;

pub(crate) const EXPIRATION_GROUP_CONFLICT: &str = "only one of expiry-date, expiry-days and expired-object-delete-marker can be used in a single rule. Try adding multiple rules to achieve the desired effect";

/// Generate an opaque, globally unique rule id
pub fn generate_rule_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Build the expiration action for a new rule
fn build_expiration(opts: &LifecycleOptions) -> Result<Expiration> {
    if opts.expiration_members() > 1 {
        return Err(Error::Conflict(EXPIRATION_GROUP_CONFLICT.to_string()));
    }

    let (date, days) = resolve_trigger(
        TriggerKind::Expiry,
        opts.expiry_date.as_deref(),
        opts.expiry_days.as_deref(),
    )?
    .map(|t| t.into_fields())
    .unwrap_or_default();

    Ok(Expiration {
        date,
        days,
        expired_object_delete_marker: opts.delete_marker_engaged(),
        delete_all_versions: opts.expire_all_versions.unwrap_or(false),
    })
}

/// Build the transition action for a new rule
fn build_transition(opts: &LifecycleOptions) -> Result<Transition> {
    let trigger = resolve_trigger(
        TriggerKind::Transition,
        opts.transition_date.as_deref(),
        opts.transition_days.as_deref(),
    )?;

    let storage_class = opts.storage_class.as_deref().map(normalize_storage_class);

    let Some(trigger) = trigger else {
        if storage_class.is_some() {
            return Err(Error::Conflict(
                "transition-date or transition-days must be set".to_string(),
            ));
        }
        return Ok(Transition::default());
    };

    let (date, days) = trigger.into_fields();
    Ok(Transition {
        date,
        days,
        storage_class,
    })
}

fn build_noncurrent(
    opts: &LifecycleOptions,
) -> Result<(NoncurrentVersionExpiration, NoncurrentVersionTransition)> {
    if opts.noncurrent_transition_storage_class.is_some()
        && opts.noncurrent_transition_days.is_none()
    {
        return Err(Error::Conflict(
            "noncurrentversion-transition-days must be set".to_string(),
        ));
    }

    let expiration = NoncurrentVersionExpiration {
        noncurrent_days: opts.noncurrent_expiration_days,
        newer_noncurrent_versions: opts.newer_noncurrent_expiration_versions,
    };
    let transition = NoncurrentVersionTransition {
        noncurrent_days: opts.noncurrent_transition_days,
        newer_noncurrent_versions: opts.newer_noncurrent_transition_versions,
        storage_class: opts
            .noncurrent_transition_storage_class
            .as_deref()
            .map(normalize_storage_class),
    };

    Ok((expiration, transition))
}

/// Build a new rule from the options of an `add` invocation
///
/// The rule is validated before it is returned; on any error nothing is produced.
pub fn build_rule(opts: &LifecycleOptions) -> Result<LifecycleRule> {
    let id = match opts.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_rule_id(),
    };

    // Only an explicit --disable creates a disabled rule
    let status = opts.status.map(RuleStatus::from).unwrap_or_default();

    let filter = compose_filter(opts)?;
    let expiration = build_expiration(opts)?;
    let transition = build_transition(opts)?;
    let (noncurrent_version_expiration, noncurrent_version_transition) = build_noncurrent(opts)?;

    let rule = LifecycleRule {
        id,
        status,
        filter,
        expiration,
        transition,
        noncurrent_version_expiration,
        noncurrent_version_transition,
    };

    validate_rule(&rule)?;
    tracing::debug!(rule_id = %rule.id, "built lifecycle rule");

    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::types::{AndFilter, Filter, SimpleFilter, Tag};
    use jiff::civil::date;

    fn opts() -> LifecycleOptions {
        LifecycleOptions {
            id: Some("rule-1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_prefix_with_expiry_days() {
        let rule = build_rule(&LifecycleOptions {
            prefix: Some("logs/".into()),
            expiry_days: Some("30".into()),
            ..opts()
        })
        .unwrap();

        assert_eq!(rule.id, "rule-1");
        assert_eq!(rule.status, RuleStatus::Enabled);
        assert_eq!(
            rule.filter,
            Filter::Simple(SimpleFilter {
                prefix: Some("logs/".into()),
                ..Default::default()
            })
        );
        assert_eq!(rule.expiration.days, Some(30));
        assert_eq!(rule.expiration.date, None);
        assert!(!rule.expiration.expired_object_delete_marker);
    }

    #[test]
    fn test_tags_and_size_filter() {
        let rule = build_rule(&LifecycleOptions {
            tags: Some("a=1,b=2".into()),
            size_gt: Some("1MB".into()),
            ..opts()
        })
        .unwrap();

        assert_eq!(
            rule.filter,
            Filter::And(AndFilter {
                prefix: None,
                tags: vec![Tag::new("a", "1"), Tag::new("b", "2")],
                object_size_greater_than: Some(1_048_576),
                object_size_less_than: None,
            })
        );
    }

    #[test]
    fn test_expiry_date_with_delete_marker_conflicts() {
        let err = build_rule(&LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            expired_object_delete_marker: Some(true),
            ..opts()
        })
        .unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
        let msg = err.to_string();
        assert!(msg.contains("expiry-date"));
        assert!(msg.contains("expiry-days"));
        assert!(msg.contains("expired-object-delete-marker"));
    }

    #[test]
    fn test_expiry_date_with_days_conflicts() {
        let err = build_rule(&LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            expiry_days: Some("10".into()),
            ..opts()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_expiry_date_only() {
        let rule = build_rule(&LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            ..opts()
        })
        .unwrap();
        assert_eq!(rule.expiration.date, Some(date(2030, 1, 1)));
        assert_eq!(rule.expiration.days, None);
    }

    #[test]
    fn test_delete_marker_false_does_not_conflict() {
        let rule = build_rule(&LifecycleOptions {
            expiry_days: Some("7".into()),
            expired_object_delete_marker: Some(false),
            ..opts()
        })
        .unwrap();
        assert_eq!(rule.expiration.days, Some(7));
        assert!(!rule.expiration.expired_object_delete_marker);
    }

    #[test]
    fn test_delete_all_versions_accompanies_days() {
        let rule = build_rule(&LifecycleOptions {
            expiry_days: Some("7".into()),
            expire_all_versions: Some(true),
            ..opts()
        })
        .unwrap();
        assert!(rule.expiration.delete_all_versions);
    }

    #[test]
    fn test_storage_class_without_trigger_conflicts() {
        let err = build_rule(&LifecycleOptions {
            storage_class: Some("WARM".into()),
            ..opts()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("transition-days"));
    }

    #[test]
    fn test_transition_days_with_storage_class() {
        let rule = build_rule(&LifecycleOptions {
            transition_days: Some("0".into()),
            storage_class: Some("warm".into()),
            ..opts()
        })
        .unwrap();
        assert_eq!(rule.transition.days, Some(0));
        assert_eq!(rule.transition.storage_class.as_deref(), Some("WARM"));
    }

    #[test]
    fn test_transition_without_storage_class_invalid() {
        let err = build_rule(&LifecycleOptions {
            transition_days: Some("10".into()),
            ..opts()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_noncurrent_storage_class_requires_days() {
        let err = build_rule(&LifecycleOptions {
            noncurrent_transition_storage_class: Some("COLD".into()),
            ..opts()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_noncurrent_actions() {
        let rule = build_rule(&LifecycleOptions {
            noncurrent_expiration_days: Some(90),
            newer_noncurrent_expiration_versions: Some(3),
            noncurrent_transition_days: Some(30),
            noncurrent_transition_storage_class: Some("cold".into()),
            ..opts()
        })
        .unwrap();
        assert_eq!(rule.noncurrent_version_expiration.noncurrent_days, Some(90));
        assert_eq!(
            rule.noncurrent_version_expiration.newer_noncurrent_versions,
            Some(3)
        );
        assert_eq!(rule.noncurrent_version_transition.noncurrent_days, Some(30));
        assert_eq!(
            rule.noncurrent_version_transition.storage_class.as_deref(),
            Some("COLD")
        );
    }

    #[test]
    fn test_generated_id_when_absent() {
        let a = build_rule(&LifecycleOptions::default()).unwrap();
        let b = build_rule(&LifecycleOptions::default()).unwrap();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_disable_status() {
        let rule = build_rule(&LifecycleOptions {
            status: Some(false),
            ..opts()
        })
        .unwrap();
        assert_eq!(rule.status, RuleStatus::Disabled);
    }

    #[test]
    fn test_malformed_tags_abort() {
        let err = build_rule(&LifecycleOptions {
            tags: Some("a".into()),
            expiry_days: Some("1".into()),
            ..opts()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
