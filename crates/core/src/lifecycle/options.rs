//! Lifecycle options collected from the command line
//!
//! Every field is three-valued: `None` means the flag was not passed,
//! `Some(_)` carries the explicit value, including zero and `false`.
//! Raw strings are kept for values whose parsing belongs to the filter
//! composer and the trigger resolver, so that their errors carry the
//! flag name.

/// Partially populated input for building or patching one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleOptions {
    pub id: Option<String>,
    /// `Some(true)` for `--enable`, `Some(false)` for `--disable`
    pub status: Option<bool>,

    pub prefix: Option<String>,
    pub tags: Option<String>,
    pub size_lt: Option<String>,
    pub size_gt: Option<String>,

    pub expiry_date: Option<String>,
    pub expiry_days: Option<String>,
    pub expired_object_delete_marker: Option<bool>,
    pub expire_all_versions: Option<bool>,

    pub transition_date: Option<String>,
    pub transition_days: Option<String>,
    pub storage_class: Option<String>,

    pub noncurrent_expiration_days: Option<u32>,
    pub newer_noncurrent_expiration_versions: Option<u32>,
    pub noncurrent_transition_days: Option<u32>,
    pub newer_noncurrent_transition_versions: Option<u32>,
    pub noncurrent_transition_storage_class: Option<String>,
}

impl LifecycleOptions {
    /// True when no field other than the rule id is set
    pub fn is_empty(&self) -> bool {
        let rest = Self {
            id: None,
            ..self.clone()
        };
        rest == Self::default()
    }

    /// Whether the delete-marker member of the expiration group is engaged.
    /// An explicit `false` only clears the flag and does not compete with
    /// date or day triggers.
    pub(crate) fn delete_marker_engaged(&self) -> bool {
        self.expired_object_delete_marker == Some(true)
    }

    /// Members of the expiration group engaged by these options
    pub(crate) fn expiration_members(&self) -> usize {
        usize::from(self.expiry_date.is_some())
            + usize::from(self.expiry_days.is_some())
            + usize::from(self.delete_marker_engaged())
    }

    pub(crate) fn filter_touched(&self) -> bool {
        self.prefix.is_some()
            || self.tags.is_some()
            || self.size_lt.is_some()
            || self.size_gt.is_some()
    }

    /// Any flag that sets up noncurrent-version actions
    pub fn has_noncurrent_options(&self) -> bool {
        self.noncurrent_expiration_days.is_some()
            || self.newer_noncurrent_expiration_versions.is_some()
            || self.noncurrent_transition_days.is_some()
            || self.newer_noncurrent_transition_versions.is_some()
            || self.noncurrent_transition_storage_class.is_some()
    }
}

/// Normalize a storage class name the way the server labels tiers
pub(crate) fn normalize_storage_class(class: &str) -> String {
    class.trim().to_uppercase()
}
