//! Bucket capability probes
//!
//! Noncurrent-version actions only take effect on versioned buckets. The
//! versioning state is probed so the CLI can warn before writing such rules.

use aws_sdk_s3::types::BucketVersioningStatus;

/// Versioning state of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningState {
    /// Versioning has never been enabled
    Unversioned,
    Enabled,
    Suspended,
}

impl VersioningState {
    /// Map the status field of a GetBucketVersioning response
    pub fn from_status(status: Option<&BucketVersioningStatus>) -> Self {
        match status {
            Some(BucketVersioningStatus::Enabled) => VersioningState::Enabled,
            Some(BucketVersioningStatus::Suspended) => VersioningState::Suspended,
            _ => VersioningState::Unversioned,
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, VersioningState::Enabled)
    }
}

/// Probe the versioning state of a bucket
pub async fn detect_versioning(
    client: &aws_sdk_s3::Client,
    bucket: &str,
) -> ilm_core::Result<VersioningState> {
    let response = client
        .get_bucket_versioning()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| crate::client::map_sdk_error(e, bucket))?;

    let state = VersioningState::from_status(response.status());
    tracing::debug!(bucket, ?state, "probed bucket versioning");
    Ok(state)
}
