//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the LifecycleApi trait from ilm-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use ilm_core::{Alias, Error, LifecycleApi, LifecyclePolicy, Result};

use crate::capability::detect_versioning;
use crate::expire_all::{ExpireAllScan, mark_expire_all};
use crate::lifecycle::{policy_from_sdk, policy_to_sdk};

/// Error code returned when a bucket has no lifecycle configuration
const NO_LIFECYCLE_CODE: &str = "NoSuchLifecycleConfiguration";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from an alias configuration
    pub async fn new(alias: Alias) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            alias.access_key.clone(),
            alias.secret_key.clone(),
            None, // session token
            None, // expiry
            "ilm-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(alias.region.clone()))
            .endpoint_url(&alias.endpoint)
            .load()
            .await;

        // Path-style addressing unless the alias asks for virtual hosts
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(alias.bucket_lookup != "dns")
            .build();

        tracing::debug!(alias = %alias.name, endpoint = %alias.endpoint, "created S3 client");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl LifecycleApi for S3Client {
    async fn get_lifecycle(&self, bucket: &str) -> Result<LifecyclePolicy> {
        let scan = ExpireAllScan::default();
        let response = match self
            .inner
            .get_bucket_lifecycle_configuration()
            .bucket(bucket)
            .customize()
            .interceptor(scan.clone())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.code() == Some(NO_LIFECYCLE_CODE) => {
                tracing::debug!(bucket, "bucket has no lifecycle configuration");
                return Ok(LifecyclePolicy::default());
            }
            Err(e) => return Err(map_sdk_error(e, bucket)),
        };

        let mut policy = policy_from_sdk(response.rules())?;
        let expire_all = scan.take();
        if !expire_all.is_empty() {
            tracing::debug!(bucket, rules = ?expire_all, "rules expire all object versions");
            mark_expire_all(&mut policy, &expire_all);
        }
        Ok(policy)
    }

    async fn set_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<()> {
        if policy.is_empty() {
            self.inner
                .delete_bucket_lifecycle()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, bucket))?;
            tracing::debug!(bucket, "deleted lifecycle configuration");
            return Ok(());
        }

        let configuration = policy_to_sdk(policy)?;
        self.inner
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        tracing::debug!(bucket, rules = policy.len(), "stored lifecycle configuration");
        Ok(())
    }

    async fn versioning_enabled(&self, bucket: &str) -> Result<bool> {
        Ok(detect_versioning(&self.inner, bucket).await?.is_enabled())
    }
}

/// Map an SDK failure onto the ilm error taxonomy
pub(crate) fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    classify_error(code.as_deref(), message, bucket)
}

fn classify_error(code: Option<&str>, message: String, bucket: &str) -> Error {
    match code {
        Some("NoSuchBucket") => Error::NotFound(format!("Bucket not found: {bucket}")),
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => {
            Error::Auth(message)
        }
        Some("NotImplemented") => Error::UnsupportedFeature(message),
        Some("MalformedXML" | "InvalidArgument" | "InvalidRequest") => Error::Validation(message),
        _ => Error::Network(message),
    }
}
