//! Conversion between ilm-core lifecycle types and the aws-sdk-s3 model
//!
//! The SDK model uses zero-or-more lists (`transitions`) and raw `i32`
//! counters. Rules carry at most one transition of each kind, so only the
//! first list element is read back.

use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, ExpirationStatus, LifecycleExpiration, LifecycleRuleAndOperator,
    LifecycleRuleFilter, NoncurrentVersionExpiration as SdkNoncurrentExpiration,
    NoncurrentVersionTransition as SdkNoncurrentTransition, Tag as SdkTag,
    Transition as SdkTransition, TransitionStorageClass,
};
use aws_smithy_types::DateTime;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use ilm_core::lifecycle::{
    AndFilter, Expiration, Filter, NoncurrentVersionExpiration, NoncurrentVersionTransition,
    RuleStatus, SimpleFilter, Tag, Transition,
};
use ilm_core::{Error, LifecyclePolicy, LifecycleRule, Result};

/// Convert a policy into the SDK request body
pub fn policy_to_sdk(policy: &LifecyclePolicy) -> Result<BucketLifecycleConfiguration> {
    let rules = policy
        .rules
        .iter()
        .map(rule_to_sdk)
        .collect::<Result<Vec<_>>>()?;

    BucketLifecycleConfiguration::builder()
        .set_rules(Some(rules))
        .build()
        .map_err(|e| Error::General(e.to_string()))
}

/// Convert the rules returned by the server into a policy
pub fn policy_from_sdk(rules: &[aws_sdk_s3::types::LifecycleRule]) -> Result<LifecyclePolicy> {
    let rules = rules
        .iter()
        .map(rule_from_sdk)
        .collect::<Result<Vec<_>>>()?;
    Ok(LifecyclePolicy::new(rules))
}

pub fn rule_to_sdk(rule: &LifecycleRule) -> Result<aws_sdk_s3::types::LifecycleRule> {
    if rule.expiration.delete_all_versions {
        return Err(Error::UnsupportedFeature(format!(
            "rule '{}' expires all object versions, which the S3 lifecycle API cannot carry; \
             clear it with --expire-all-object-versions=false or remove the rule",
            rule.id
        )));
    }

    let status = if rule.status.is_enabled() {
        ExpirationStatus::Enabled
    } else {
        ExpirationStatus::Disabled
    };

    let mut builder = aws_sdk_s3::types::LifecycleRule::builder()
        .id(&rule.id)
        .status(status)
        .filter(filter_to_sdk(&rule.filter)?);

    if !rule.expiration.is_empty() {
        let exp = &rule.expiration;
        let mut expiration = LifecycleExpiration::builder();
        if let Some(date) = exp.date {
            expiration = expiration.date(date_to_sdk(date)?);
        }
        if let Some(days) = exp.days {
            expiration = expiration.days(days_to_sdk(days)?);
        }
        if exp.expired_object_delete_marker {
            expiration = expiration.expired_object_delete_marker(true);
        }
        builder = builder.expiration(expiration.build());
    }

    if !rule.transition.is_empty() {
        let tr = &rule.transition;
        let mut transition = SdkTransition::builder();
        if let Some(date) = tr.date {
            transition = transition.date(date_to_sdk(date)?);
        }
        if let Some(days) = tr.days {
            transition = transition.days(days_to_sdk(days)?);
        }
        if let Some(class) = &tr.storage_class {
            transition = transition.storage_class(TransitionStorageClass::from(class.as_str()));
        }
        builder = builder.transitions(transition.build());
    }

    let nve = &rule.noncurrent_version_expiration;
    if !nve.is_empty() {
        let mut expiration = SdkNoncurrentExpiration::builder();
        if let Some(days) = nve.noncurrent_days {
            expiration = expiration.noncurrent_days(days_to_sdk(days)?);
        }
        if let Some(versions) = nve.newer_noncurrent_versions {
            expiration = expiration.newer_noncurrent_versions(days_to_sdk(versions)?);
        }
        builder = builder.noncurrent_version_expiration(expiration.build());
    }

    let nvt = &rule.noncurrent_version_transition;
    if !nvt.is_empty() {
        let mut transition = SdkNoncurrentTransition::builder();
        if let Some(days) = nvt.noncurrent_days {
            transition = transition.noncurrent_days(days_to_sdk(days)?);
        }
        if let Some(versions) = nvt.newer_noncurrent_versions {
            transition = transition.newer_noncurrent_versions(days_to_sdk(versions)?);
        }
        if let Some(class) = &nvt.storage_class {
            transition = transition.storage_class(TransitionStorageClass::from(class.as_str()));
        }
        builder = builder.noncurrent_version_transitions(transition.build());
    }

    builder.build().map_err(|e| Error::General(e.to_string()))
}

#[allow(deprecated)]
pub fn rule_from_sdk(rule: &aws_sdk_s3::types::LifecycleRule) -> Result<LifecycleRule> {
    let mut out = LifecycleRule::new(rule.id().unwrap_or_default());
    out.status = RuleStatus::from(matches!(rule.status(), ExpirationStatus::Enabled));

    out.filter = match rule.filter() {
        Some(filter) => filter_from_sdk(filter),
        // Rules written before filters existed carry a top-level prefix
        None => Filter::Simple(SimpleFilter {
            prefix: rule.prefix().filter(|p| !p.is_empty()).map(str::to_string),
            ..Default::default()
        }),
    };

    if let Some(exp) = rule.expiration() {
        out.expiration = Expiration {
            date: exp.date().map(date_from_sdk).transpose()?,
            days: exp.days().map(count_from_sdk).transpose()?,
            expired_object_delete_marker: exp.expired_object_delete_marker().unwrap_or(false),
            delete_all_versions: false,
        };
    }

    if let Some(tr) = rule.transitions().first() {
        out.transition = Transition {
            date: tr.date().map(date_from_sdk).transpose()?,
            days: tr.days().map(count_from_sdk).transpose()?,
            storage_class: tr.storage_class().map(|c| c.as_str().to_string()),
        };
    }

    if let Some(nve) = rule.noncurrent_version_expiration() {
        out.noncurrent_version_expiration = NoncurrentVersionExpiration {
            noncurrent_days: nve.noncurrent_days().map(count_from_sdk).transpose()?,
            newer_noncurrent_versions: nve
                .newer_noncurrent_versions()
                .map(count_from_sdk)
                .transpose()?,
        };
    }

    if let Some(nvt) = rule.noncurrent_version_transitions().first() {
        out.noncurrent_version_transition = NoncurrentVersionTransition {
            noncurrent_days: nvt.noncurrent_days().map(count_from_sdk).transpose()?,
            newer_noncurrent_versions: nvt
                .newer_noncurrent_versions()
                .map(count_from_sdk)
                .transpose()?,
            storage_class: nvt.storage_class().map(|c| c.as_str().to_string()),
        };
    }

    Ok(out)
}

fn filter_to_sdk(filter: &Filter) -> Result<LifecycleRuleFilter> {
    let built = match filter {
        Filter::Simple(f) => {
            let mut builder = LifecycleRuleFilter::builder()
                .set_object_size_greater_than(f.object_size_greater_than)
                .set_object_size_less_than(f.object_size_less_than);
            if let Some(tag) = &f.tag {
                builder = builder.tag(tag_to_sdk(tag)?);
            }
            // An empty prefix matches every object
            if f.prefix.is_some() || filter.predicates().count() == 0 {
                builder = builder.prefix(f.prefix.clone().unwrap_or_default());
            }
            builder.build()
        }
        Filter::And(f) => {
            let tags = f.tags.iter().map(tag_to_sdk).collect::<Result<Vec<_>>>()?;
            let and = LifecycleRuleAndOperator::builder()
                .set_prefix(f.prefix.clone())
                .set_tags(if tags.is_empty() { None } else { Some(tags) })
                .set_object_size_greater_than(f.object_size_greater_than)
                .set_object_size_less_than(f.object_size_less_than)
                .build();
            LifecycleRuleFilter::builder().and(and).build()
        }
    };
    Ok(built)
}

/// Decode a server filter, reshaping it by its predicate count
///
/// An empty prefix inside `And` is an explicit predicate and is kept; an
/// `And` carrying fewer than two predicates comes back as a simple filter.
fn filter_from_sdk(filter: &LifecycleRuleFilter) -> Filter {
    let decoded = match filter.and() {
        Some(and) => Filter::And(AndFilter {
            prefix: and.prefix().map(str::to_string),
            tags: and.tags().iter().map(tag_from_sdk).collect(),
            object_size_greater_than: and.object_size_greater_than(),
            object_size_less_than: and.object_size_less_than(),
        }),
        None => Filter::Simple(SimpleFilter {
            prefix: non_empty(filter.prefix()),
            tag: filter.tag().map(tag_from_sdk),
            object_size_greater_than: filter.object_size_greater_than(),
            object_size_less_than: filter.object_size_less_than(),
        }),
    };
    decoded.predicates().compose()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn tag_to_sdk(tag: &Tag) -> Result<SdkTag> {
    SdkTag::builder()
        .key(&tag.key)
        .value(&tag.value)
        .build()
        .map_err(|e| Error::General(e.to_string()))
}

fn tag_from_sdk(tag: &SdkTag) -> Tag {
    Tag::new(tag.key(), tag.value())
}

fn date_to_sdk(date: Date) -> Result<DateTime> {
    let zoned = date
        .to_zoned(TimeZone::UTC)
        .map_err(|e| Error::General(format!("date {date}: {e}")))?;
    Ok(DateTime::from_secs(zoned.timestamp().as_second()))
}

fn date_from_sdk(value: &DateTime) -> Result<Date> {
    let ts = jiff::Timestamp::from_second(value.secs())
        .map_err(|e| Error::General(format!("invalid date from server: {e}")))?;
    Ok(ts.to_zoned(TimeZone::UTC).date())
}

fn days_to_sdk(value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::Validation(format!("{value} is out of range")))
}

fn count_from_sdk(value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::General(format!("negative counter {value} from server")))
}
