//! LifecycleApi trait definition
//!
//! This trait defines the server operations the lifecycle workflow needs.
//! It allows the CLI to be decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::lifecycle::LifecyclePolicy;

/// Trait for reading and writing bucket lifecycle configuration
///
/// There is no partial-update call: callers read the whole policy, change it
/// locally and write the whole policy back.
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleApi: Send + Sync {
    /// Get the lifecycle policy of a bucket
    ///
    /// A bucket without lifecycle configuration yields an empty policy.
    async fn get_lifecycle(&self, bucket: &str) -> Result<LifecyclePolicy>;

    /// Replace the lifecycle policy of a bucket
    ///
    /// Writing an empty policy removes the bucket's lifecycle configuration.
    async fn set_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<()>;

    /// Whether versioning is enabled on a bucket
    async fn versioning_enabled(&self, bucket: &str) -> Result<bool>;
}
