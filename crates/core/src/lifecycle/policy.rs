//! Rule-level operations on a bucket lifecycle policy
//!
//! The policy is owned by the caller for the span of one invocation, between
//! reading it from the server and writing it back.

use crate::error::{Error, Result};

use super::options::LifecycleOptions;
use super::patch::apply_options;
use super::types::{LifecyclePolicy, LifecycleRule};
use super::validate::validate_rule;

impl LifecyclePolicy {
    /// Append a new rule
    ///
    /// The rule is validated and its id must not already exist in the policy.
    pub fn insert(&mut self, rule: LifecycleRule) -> Result<()> {
        validate_rule(&rule)?;
        if self.get(&rule.id).is_some() {
            return Err(Error::Validation(format!(
                "a rule with id '{}' already exists",
                rule.id
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Patch the rule with the given id
    ///
    /// The patched copy replaces the stored rule only once it is valid;
    /// on error the policy is unchanged.
    pub fn edit(&mut self, id: &str, opts: &LifecycleOptions) -> Result<&LifecycleRule> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("lifecycle rule for id '{id}' not found")))?;

        let candidate = apply_options(&self.rules[index], opts)?;
        self.rules[index] = candidate;
        Ok(&self.rules[index])
    }

    /// Remove the rule with the given id
    pub fn remove(&mut self, id: &str) -> Result<LifecycleRule> {
        if self.rules.is_empty() {
            return Err(Error::NotFound("lifecycle configuration not set".to_string()));
        }

        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("lifecycle rule for id '{id}' not found")))?;

        Ok(self.rules.remove(index))
    }

    /// Drop every rule, returning the removed rules in order
    pub fn clear(&mut self) -> Vec<LifecycleRule> {
        std::mem::take(&mut self.rules)
    }

    /// Validate every rule and the uniqueness of their ids
    pub fn validate(&self) -> Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            validate_rule(rule)?;
            if self.rules[..i].iter().any(|r| r.id == rule.id) {
                return Err(Error::Validation(format!(
                    "duplicate rule id '{}' in lifecycle configuration",
                    rule.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::builder::build_rule;

    fn days_rule(id: &str, days: u32) -> LifecycleRule {
        let mut rule = LifecycleRule::new(id);
        rule.expiration.days = Some(days);
        rule
    }

    #[test]
    fn test_insert_and_duplicate() {
        let mut policy = LifecyclePolicy::default();
        policy.insert(days_rule("a", 1)).unwrap();

        let err = policy.insert(days_rule("a", 2)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.rules[0].expiration.days, Some(1));
    }

    #[test]
    fn test_insert_invalid_rule() {
        let mut policy = LifecyclePolicy::default();
        let mut rule = LifecycleRule::new("a");
        rule.transition.storage_class = Some("WARM".into());
        assert!(policy.insert(rule).is_err());
        assert!(policy.is_empty());
    }

    #[test]
    fn test_edit_commits_on_success() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 10), days_rule("b", 5)]);
        let opts = LifecycleOptions {
            expiry_date: Some("2030-01-01".into()),
            ..Default::default()
        };

        let edited = policy.edit("b", &opts).unwrap();
        assert_eq!(edited.expiration.days, None);
        assert!(edited.expiration.date.is_some());
        assert_eq!(policy.rules[0], days_rule("a", 10));
    }

    #[test]
    fn test_edit_failure_leaves_policy_unchanged() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 10)]);
        let before = policy.clone();
        let opts = LifecycleOptions {
            storage_class: Some("WARM".into()),
            ..Default::default()
        };

        assert!(matches!(policy.edit("a", &opts), Err(Error::Validation(_))));
        assert_eq!(policy, before);
    }

    #[test]
    fn test_edit_missing_rule() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 10)]);
        let err = policy.edit("zzz", &LifecycleOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_remove() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 1), days_rule("b", 2)]);
        let removed = policy.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.rules[0].id, "b");
    }

    #[test]
    fn test_remove_missing_leaves_policy_unchanged() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 1)]);
        let before = policy.clone();

        let err = policy.remove("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(policy, before);
    }

    #[test]
    fn test_remove_from_empty_policy() {
        let mut policy = LifecyclePolicy::default();
        let err = policy.remove("a").unwrap_err();
        assert!(err.to_string().contains("lifecycle configuration not set"));
    }

    #[test]
    fn test_clear() {
        let mut policy = LifecyclePolicy::new(vec![days_rule("a", 1), days_rule("b", 2)]);
        let removed = policy.clear();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].id, "a");
        assert!(policy.is_empty());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let policy = LifecyclePolicy::new(vec![days_rule("a", 1), days_rule("a", 2)]);
        assert!(matches!(policy.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_builder_json_round_trip() {
        let rule = build_rule(&LifecycleOptions {
            id: Some("archive".into()),
            prefix: Some("logs/".into()),
            tags: Some("a=1".into()),
            size_lt: Some("1GB".into()),
            transition_days: Some("30".into()),
            storage_class: Some("warm".into()),
            expiry_days: Some("365".into()),
            expire_all_versions: Some(true),
            noncurrent_expiration_days: Some(7),
            newer_noncurrent_expiration_versions: Some(2),
            ..Default::default()
        })
        .unwrap();
        let policy = LifecyclePolicy::new(vec![rule]);

        let json = serde_json::to_string(&policy).unwrap();
        let decoded: LifecyclePolicy = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, policy);
        decoded.validate().unwrap();
    }

    #[test]
    fn test_rule_json_snapshot() {
        let rule = build_rule(&LifecycleOptions {
            id: Some("logs-expiry".into()),
            prefix: Some("logs/".into()),
            expiry_days: Some("30".into()),
            ..Default::default()
        })
        .unwrap();

        insta::assert_json_snapshot!(rule, @r#"
        {
          "id": "logs-expiry",
          "status": "Enabled",
          "filter": {
            "simple": {
              "prefix": "logs/"
            }
          },
          "expiration": {
            "days": 30
          }
        }
        "#);
    }
}
