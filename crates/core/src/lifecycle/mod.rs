//! Lifecycle rule composition
//!
//! This module turns command-line lifecycle options into validated rules
//! (the add path), merges options into existing rules (the edit path) and
//! applies either to a bucket policy.

mod builder;
mod filter;
mod options;
mod ops;
mod patch;
mod policy;
mod trigger;
mod types;
mod validate;

pub use builder::{build_rule, generate_rule_id};
pub use filter::{compose_filter, parse_size, parse_tags, patch_filter};
pub use options::LifecycleOptions;
pub use ops::{add_rule, edit_rule, import_policy, remove_all_rules, remove_rule};
pub use patch::apply_options;
pub use trigger::{DATE_FORMAT, Trigger, TriggerKind, parse_date, parse_days, resolve_trigger};
pub use types::{
    AndFilter, Expiration, Filter, FilterPredicates, LifecyclePolicy, LifecycleRule,
    NoncurrentVersionExpiration, NoncurrentVersionTransition, RuleStatus, SimpleFilter, Tag,
    Transition,
};
pub use validate::{MAX_RULE_ID_LEN, validate_rule};
