//! Lifecycle configuration type definitions
//!
//! These types mirror the bucket lifecycle configuration shape of the
//! S3 API closely enough that the adapter can convert field by field, while
//! using `Option` wherever the wire format relies on zero values to mean
//! "not set".

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Enabled/disabled state of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RuleStatus {
    #[default]
    Enabled,
    Disabled,
}

impl RuleStatus {
    pub fn is_enabled(self) -> bool {
        matches!(self, RuleStatus::Enabled)
    }
}

impl From<bool> for RuleStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            RuleStatus::Enabled
        } else {
            RuleStatus::Disabled
        }
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleStatus::Enabled => write!(f, "Enabled"),
            RuleStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Object tag predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Filter carrying at most one predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimpleFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_size_greater_than: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_size_less_than: Option<i64>,
}

/// Conjunction of two or more predicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AndFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_size_greater_than: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_size_less_than: Option<i64>,
}

/// Object match predicate of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    Simple(SimpleFilter),
    And(AndFilter),
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Simple(SimpleFilter::default())
    }
}

/// Flattened predicates of a filter, regardless of its shape
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPredicates {
    pub prefix: Option<String>,
    pub tags: Vec<Tag>,
    pub size_greater_than: Option<i64>,
    pub size_less_than: Option<i64>,
}

impl FilterPredicates {
    /// Number of predicates; each tag counts individually
    pub fn count(&self) -> usize {
        self.tags.len()
            + usize::from(self.prefix.is_some())
            + usize::from(self.size_greater_than.is_some())
            + usize::from(self.size_less_than.is_some())
    }

    /// Build the filter shape matching the predicate count
    pub fn compose(self) -> Filter {
        if self.count() >= 2 {
            Filter::And(AndFilter {
                prefix: self.prefix,
                tags: self.tags,
                object_size_greater_than: self.size_greater_than,
                object_size_less_than: self.size_less_than,
            })
        } else {
            Filter::Simple(SimpleFilter {
                prefix: self.prefix,
                tag: self.tags.into_iter().next(),
                object_size_greater_than: self.size_greater_than,
                object_size_less_than: self.size_less_than,
            })
        }
    }
}

impl Filter {
    /// Decompose into the flat predicate view
    pub fn predicates(&self) -> FilterPredicates {
        match self {
            Filter::Simple(f) => FilterPredicates {
                prefix: f.prefix.clone(),
                tags: f.tag.iter().cloned().collect(),
                size_greater_than: f.object_size_greater_than,
                size_less_than: f.object_size_less_than,
            },
            Filter::And(f) => FilterPredicates {
                prefix: f.prefix.clone(),
                tags: f.tags.clone(),
                size_greater_than: f.object_size_greater_than,
                size_less_than: f.object_size_less_than,
            },
        }
    }

    /// Prefix predicate, if any
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Filter::Simple(f) => f.prefix.as_deref(),
            Filter::And(f) => f.prefix.as_deref(),
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Filter::And(_))
    }
}

/// Current-version expiration action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expired_object_delete_marker: bool,

    /// Delete every version of a matching object, not just the current one
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub delete_all_versions: bool,
}

impl Expiration {
    /// Number of active expiration triggers
    pub fn trigger_count(&self) -> usize {
        usize::from(self.date.is_some())
            + usize::from(self.days.is_some())
            + usize::from(self.expired_object_delete_marker)
    }

    pub fn is_empty(&self) -> bool {
        self.trigger_count() == 0 && !self.delete_all_versions
    }
}

/// Current-version transition action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl Transition {
    pub fn trigger_count(&self) -> usize {
        usize::from(self.date.is_some()) + usize::from(self.days.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.trigger_count() == 0 && self.storage_class.is_none()
    }
}

/// Expiration of superseded object versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoncurrentVersionExpiration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noncurrent_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newer_noncurrent_versions: Option<u32>,
}

impl NoncurrentVersionExpiration {
    pub fn is_empty(&self) -> bool {
        self.noncurrent_days.is_none() && self.newer_noncurrent_versions.is_none()
    }
}

/// Transition of superseded object versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoncurrentVersionTransition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noncurrent_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newer_noncurrent_versions: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl NoncurrentVersionTransition {
    pub fn is_empty(&self) -> bool {
        self.noncurrent_days.is_none()
            && self.newer_noncurrent_versions.is_none()
            && self.storage_class.is_none()
    }
}

/// A single lifecycle rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRule {
    pub id: String,

    #[serde(default)]
    pub status: RuleStatus,

    #[serde(default)]
    pub filter: Filter,

    #[serde(default, skip_serializing_if = "Expiration::is_empty")]
    pub expiration: Expiration,

    #[serde(default, skip_serializing_if = "Transition::is_empty")]
    pub transition: Transition,

    #[serde(default, skip_serializing_if = "NoncurrentVersionExpiration::is_empty")]
    pub noncurrent_version_expiration: NoncurrentVersionExpiration,

    #[serde(default, skip_serializing_if = "NoncurrentVersionTransition::is_empty")]
    pub noncurrent_version_transition: NoncurrentVersionTransition,
}

impl LifecycleRule {
    /// Create an enabled rule that matches every object and has no actions
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RuleStatus::Enabled,
            filter: Filter::default(),
            expiration: Expiration::default(),
            transition: Transition::default(),
            noncurrent_version_expiration: NoncurrentVersionExpiration::default(),
            noncurrent_version_transition: NoncurrentVersionTransition::default(),
        }
    }

    pub fn has_noncurrent_actions(&self) -> bool {
        !self.noncurrent_version_expiration.is_empty()
            || !self.noncurrent_version_transition.is_empty()
    }
}

/// Ordered set of lifecycle rules attached to a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LifecyclePolicy {
    #[serde(default)]
    pub rules: Vec<LifecycleRule>,
}

impl LifecyclePolicy {
    pub fn new(rules: Vec<LifecycleRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&LifecycleRule> {
        self.rules.iter().find(|r| r.id == id)
    }
}
