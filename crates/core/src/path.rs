//! Target path parsing
//!
//! Lifecycle commands address a bucket as `alias/bucket`. An optional
//! trailing component (`alias/bucket/prefix`) is kept for the deprecated
//! form of passing a rule prefix through the path.

use crate::error::{Error, Result};

/// A parsed `alias/bucket[/prefix]` target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTarget {
    /// Alias name
    pub alias: String,
    /// Bucket name
    pub bucket: String,
    /// Prefix embedded in the path, if any
    pub prefix: Option<String>,
}

impl BucketTarget {
    pub fn new(alias: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            bucket: bucket.into(),
            prefix: None,
        }
    }
}

impl std::fmt::Display for BucketTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.alias, self.bucket)
    }
}

/// Parse a target of the form `alias/bucket[/prefix]`
pub fn parse_target(path: &str) -> Result<BucketTarget> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let mut parts = path.splitn(3, '/');
    let alias = parts.next().unwrap_or_default();
    let bucket = parts.next().unwrap_or_default();
    let prefix = parts.next().filter(|p| !p.is_empty());

    if !is_valid_alias_name(alias) {
        return Err(Error::InvalidPath(format!(
            "'{alias}' is not a valid alias name. Use format: alias/bucket"
        )));
    }
    if bucket.is_empty() {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' is incomplete. Use format: alias/bucket"
        )));
    }
    if bucket.len() < 3 || bucket.len() > 63 {
        return Err(Error::InvalidPath(
            "Bucket name must be between 3 and 63 characters".into(),
        ));
    }

    Ok(BucketTarget {
        alias: alias.to_string(),
        bucket: bucket.to_string(),
        prefix: prefix.map(str::to_string),
    })
}

/// Check if a string is a valid alias name
fn is_valid_alias_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_target() {
        let target = parse_target("minio/photos").unwrap();
        assert_eq!(target, BucketTarget::new("minio", "photos"));
        assert_eq!(target.to_string(), "minio/photos");
    }

    #[test]
    fn test_parse_trailing_slash() {
        let target = parse_target("minio/photos/").unwrap();
        assert_eq!(target.prefix, None);
    }

    #[test]
    fn test_parse_embedded_prefix() {
        let target = parse_target("minio/photos/2024/raw/").unwrap();
        assert_eq!(target.bucket, "photos");
        assert_eq!(target.prefix.as_deref(), Some("2024/raw/"));
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(matches!(parse_target(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_parse_alias_only() {
        assert!(matches!(parse_target("minio"), Err(Error::InvalidPath(_))));
        assert!(matches!(parse_target("minio/"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_parse_invalid_alias() {
        assert!(parse_target("./local/bucket").is_err());
        assert!(parse_target("/abs/bucket").is_err());
    }

    #[test]
    fn test_parse_short_bucket() {
        assert!(parse_target("minio/ab").is_err());
    }
}
