//! ilm-s3: S3 SDK adapter for the ilm CLI
//!
//! This crate implements the LifecycleApi trait using the aws-sdk-s3
//! crate. It is the only crate that directly depends on the AWS SDK.

pub mod capability;
pub mod client;
mod expire_all;
pub mod lifecycle;

pub use capability::VersioningState;
pub use client::S3Client;
