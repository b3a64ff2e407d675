//! ilm-core: Core library for the ilm lifecycle CLI
//!
//! This crate provides the core functionality for the ilm CLI, including:
//! - Configuration and alias resolution
//! - Bucket target parsing
//! - Lifecycle rule composition, patching and validation
//! - LifecycleApi trait for the server operations
//!
//! This crate is independent of any specific S3 SDK, so the whole
//! composition engine can be tested without a server.

pub mod alias;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod path;
pub mod traits;

pub use alias::{Alias, AliasManager};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use lifecycle::{LifecycleOptions, LifecyclePolicy, LifecycleRule};
pub use path::{BucketTarget, parse_target};
pub use traits::LifecycleApi;
