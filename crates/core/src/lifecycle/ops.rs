//! Read-modify-write workflows against a [`LifecycleApi`]
//!
//! Each function reads the full policy, applies one change locally and
//! writes the full policy back. Input errors are detected before the first
//! server call wherever the change does not depend on the stored policy.

use crate::error::Result;
use crate::traits::LifecycleApi;

use super::builder::build_rule;
use super::options::LifecycleOptions;
use super::types::{LifecyclePolicy, LifecycleRule};

/// Build a rule from `opts` and append it to the bucket policy
pub async fn add_rule<A>(api: &A, bucket: &str, opts: &LifecycleOptions) -> Result<LifecycleRule>
where
    A: LifecycleApi + ?Sized,
{
    let rule = build_rule(opts)?;

    let mut policy = api.get_lifecycle(bucket).await?;
    tracing::debug!(bucket, rules = policy.len(), "fetched lifecycle configuration");

    policy.insert(rule.clone())?;
    api.set_lifecycle(bucket, &policy).await?;
    tracing::debug!(bucket, rule_id = %rule.id, "added lifecycle rule");

    Ok(rule)
}

/// Patch the rule `id` of the bucket policy with the explicitly set options
pub async fn edit_rule<A>(
    api: &A,
    bucket: &str,
    id: &str,
    opts: &LifecycleOptions,
) -> Result<LifecycleRule>
where
    A: LifecycleApi + ?Sized,
{
    let mut policy = api.get_lifecycle(bucket).await?;
    let rule = policy.edit(id, opts)?.clone();

    api.set_lifecycle(bucket, &policy).await?;
    tracing::debug!(bucket, rule_id = id, "updated lifecycle rule");

    Ok(rule)
}

/// Remove the rule `id` from the bucket policy
pub async fn remove_rule<A>(api: &A, bucket: &str, id: &str) -> Result<LifecycleRule>
where
    A: LifecycleApi + ?Sized,
{
    let mut policy = api.get_lifecycle(bucket).await?;
    let removed = policy.remove(id)?;

    api.set_lifecycle(bucket, &policy).await?;
    tracing::debug!(bucket, rule_id = id, remaining = policy.len(), "removed lifecycle rule");

    Ok(removed)
}

/// Remove every rule of the bucket policy, returning the removed rules
pub async fn remove_all_rules<A>(api: &A, bucket: &str) -> Result<Vec<LifecycleRule>>
where
    A: LifecycleApi + ?Sized,
{
    let mut policy = api.get_lifecycle(bucket).await?;
    let removed = policy.clear();

    if !removed.is_empty() {
        api.set_lifecycle(bucket, &policy).await?;
    }
    tracing::debug!(bucket, removed = removed.len(), "removed all lifecycle rules");

    Ok(removed)
}

/// Replace the bucket policy with an imported one after validating it
pub async fn import_policy<A>(api: &A, bucket: &str, policy: &LifecyclePolicy) -> Result<()>
where
    A: LifecycleApi + ?Sized,
{
    policy.validate()?;
    api.set_lifecycle(bucket, policy).await?;
    tracing::debug!(bucket, rules = policy.len(), "imported lifecycle configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::traits::MockLifecycleApi;

    fn days_rule(id: &str, days: u32) -> LifecycleRule {
        let mut rule = LifecycleRule::new(id);
        rule.expiration.days = Some(days);
        rule
    }

    fn api_with(policy: LifecyclePolicy) -> MockLifecycleApi {
        let mut api = MockLifecycleApi::new();
        api.expect_get_lifecycle()
            .withf(|bucket| bucket == "photos")
            .returning(move |_| Ok(policy.clone()));
        api
    }

    #[tokio::test]
    async fn test_add_rule_writes_full_policy() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("old", 3)]));
        api.expect_set_lifecycle()
            .withf(|bucket, policy| {
                bucket == "photos"
                    && policy.len() == 2
                    && policy.rules[0].id == "old"
                    && policy.rules[1].id == "new"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let opts = LifecycleOptions {
            id: Some("new".into()),
            prefix: Some("logs/".into()),
            expiry_days: Some("30".into()),
            ..Default::default()
        };
        let rule = add_rule(&api, "photos", &opts).await.unwrap();
        assert_eq!(rule.id, "new");
        assert_eq!(rule.expiration.days, Some(30));
    }

    #[tokio::test]
    async fn test_add_rule_conflict_never_reaches_server() {
        let api = MockLifecycleApi::new();
        let opts = LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            expired_object_delete_marker: Some(true),
            ..Default::default()
        };
        let err = add_rule(&api, "photos", &opts).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_add_rule_duplicate_id() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("dup", 3)]));
        api.expect_set_lifecycle().never();

        let opts = LifecycleOptions {
            id: Some("dup".into()),
            expiry_days: Some("1".into()),
            ..Default::default()
        };
        let err = add_rule(&api, "photos", &opts).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_edit_rule_switches_trigger() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("r1", 10)]));
        api.expect_set_lifecycle()
            .withf(|_, policy| {
                let exp = &policy.rules[0].expiration;
                exp.days.is_none() && exp.date.is_some()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let opts = LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            ..Default::default()
        };
        let rule = edit_rule(&api, "photos", "r1", &opts).await.unwrap();
        assert_eq!(rule.expiration.days, None);
    }

    #[tokio::test]
    async fn test_edit_rule_validation_failure_skips_write() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("r1", 10)]));
        api.expect_set_lifecycle().never();

        let opts = LifecycleOptions {
            storage_class: Some("WARM".into()),
            ..Default::default()
        };
        let err = edit_rule(&api, "photos", "r1", &opts).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_rule() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("r1", 10)]));
        api.expect_set_lifecycle().never();

        let err = remove_rule(&api, "photos", "missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_rule() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("r1", 1), days_rule("r2", 2)]));
        api.expect_set_lifecycle()
            .withf(|_, policy| policy.len() == 1 && policy.rules[0].id == "r2")
            .times(1)
            .returning(|_, _| Ok(()));

        let removed = remove_rule(&api, "photos", "r1").await.unwrap();
        assert_eq!(removed.id, "r1");
    }

    #[tokio::test]
    async fn test_remove_all_rules() {
        let mut api = api_with(LifecyclePolicy::new(vec![days_rule("r1", 1), days_rule("r2", 2)]));
        api.expect_set_lifecycle()
            .withf(|_, policy| policy.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let removed = remove_all_rules(&api, "photos").await.unwrap();
        assert_eq!(removed.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_all_on_empty_policy_skips_write() {
        let mut api = api_with(LifecyclePolicy::default());
        api.expect_set_lifecycle().never();

        assert!(remove_all_rules(&api, "photos").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        let mut api = MockLifecycleApi::new();
        api.expect_get_lifecycle()
            .returning(|_| Err(Error::Network("connection reset".into())));

        let err = remove_rule(&api, "photos", "r1").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_policy() {
        let mut api = MockLifecycleApi::new();
        api.expect_set_lifecycle().never();

        let policy = LifecyclePolicy::new(vec![days_rule("a", 1), days_rule("a", 2)]);
        let err = import_policy(&api, "photos", &policy).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
