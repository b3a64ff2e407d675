//! Lifecycle rule commands
//!
//! Every subcommand addresses one bucket (`alias/bucket`) and performs a
//! single read-modify-write of its lifecycle configuration.

mod add;
mod edit;
mod export;
mod import;
mod ls;
mod rm;

use clap::{Args, Subcommand};

use ilm_core::{AliasManager, BucketTarget, Error, LifecycleApi, LifecycleOptions, parse_target};
use ilm_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Lifecycle rule subcommands
#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Add a lifecycle rule to a bucket
    Add(add::AddArgs),

    /// Modify an existing lifecycle rule
    Edit(edit::EditArgs),

    /// List the lifecycle rules of a bucket
    Ls(ls::LsArgs),

    /// Remove one or all lifecycle rules
    Rm(rm::RmArgs),

    /// Print the lifecycle configuration as JSON
    Export(export::ExportArgs),

    /// Replace the lifecycle configuration with JSON from stdin or a file
    Import(import::ImportArgs),
}

/// Execute a rule subcommand
pub async fn execute(cmd: RuleCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match cmd {
        RuleCommands::Add(args) => add::execute(args, &formatter).await,
        RuleCommands::Edit(args) => edit::execute(args, &formatter).await,
        RuleCommands::Ls(args) => ls::execute(args, &formatter).await,
        RuleCommands::Rm(args) => rm::execute(args, &formatter).await,
        RuleCommands::Export(args) => export::execute(args, &formatter).await,
        RuleCommands::Import(args) => import::execute(args, &formatter).await,
    }
}

/// Flags shared by `rule add` and `rule edit`
///
/// Flags that are not passed stay `None`, so an edit only touches the
/// fields the user named.
#[derive(Args, Debug, Default)]
pub struct LifecycleFlags {
    /// Enable the rule
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable the rule
    #[arg(long)]
    pub disable: bool,

    /// Object key prefix the rule applies to
    #[arg(long)]
    pub prefix: Option<String>,

    /// Object tags the rule applies to, as "key1=value1,key2=value2"
    #[arg(long)]
    pub tags: Option<String>,

    /// Apply to objects smaller than this size (e.g. 64MiB)
    #[arg(long)]
    pub size_lt: Option<String>,

    /// Apply to objects larger than this size (e.g. 1GiB)
    #[arg(long)]
    pub size_gt: Option<String>,

    /// Expire objects on this date (YYYY-MM-DD)
    #[arg(long)]
    pub expiry_date: Option<String>,

    /// Expire objects this many days after creation
    #[arg(long)]
    pub expiry_days: Option<String>,

    /// Remove delete markers with no noncurrent versions
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub expired_object_delete_marker: Option<bool>,

    /// Expire every version of matching objects
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub expire_all_object_versions: Option<bool>,

    /// Transition objects on this date (YYYY-MM-DD)
    #[arg(long)]
    pub transition_date: Option<String>,

    /// Transition objects this many days after creation
    #[arg(long)]
    pub transition_days: Option<String>,

    /// Storage class to transition objects to
    #[arg(long)]
    pub storage_class: Option<String>,

    /// Days after which noncurrent versions expire
    #[arg(long = "noncurrentversion-expiration-days")]
    pub noncurrent_expiration_days: Option<u32>,

    /// Number of newer noncurrent versions to retain
    #[arg(long = "newer-noncurrentversions-expiration")]
    pub newer_noncurrent_expiration_versions: Option<u32>,

    /// Days after which noncurrent versions transition
    #[arg(long = "noncurrentversion-transition-days")]
    pub noncurrent_transition_days: Option<u32>,

    /// Number of newer noncurrent versions to keep before transitioning
    #[arg(long = "newer-noncurrentversions-transition")]
    pub newer_noncurrent_transition_versions: Option<u32>,

    /// Storage class to transition noncurrent versions to
    #[arg(long = "noncurrentversion-transition-storage-class")]
    pub noncurrent_transition_storage_class: Option<String>,
}

impl LifecycleFlags {
    /// Convert parsed flags into lifecycle options for rule `id`
    pub fn into_options(self, id: Option<String>) -> LifecycleOptions {
        let status = match (self.enable, self.disable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        LifecycleOptions {
            id,
            status,
            prefix: self.prefix,
            tags: self.tags,
            size_lt: self.size_lt,
            size_gt: self.size_gt,
            expiry_date: self.expiry_date,
            expiry_days: self.expiry_days,
            expired_object_delete_marker: self.expired_object_delete_marker,
            expire_all_versions: self.expire_all_object_versions,
            transition_date: self.transition_date,
            transition_days: self.transition_days,
            storage_class: self.storage_class,
            noncurrent_expiration_days: self.noncurrent_expiration_days,
            newer_noncurrent_expiration_versions: self.newer_noncurrent_expiration_versions,
            noncurrent_transition_days: self.noncurrent_transition_days,
            newer_noncurrent_transition_versions: self.newer_noncurrent_transition_versions,
            noncurrent_transition_storage_class: self.noncurrent_transition_storage_class,
        }
    }
}

/// Use a prefix embedded in the target path when `--prefix` is absent
pub(crate) fn apply_path_prefix(
    opts: &mut LifecycleOptions,
    path_prefix: Option<&str>,
    formatter: &Formatter,
) {
    let Some(prefix) = path_prefix else {
        return;
    };
    if opts.prefix.is_some() {
        formatter.warning(&format!(
            "Ignoring prefix '{prefix}' in the target path; --prefix takes precedence"
        ));
        return;
    }

    formatter.warning("Passing a prefix in the target path is deprecated, use --prefix instead");
    opts.prefix = Some(prefix.to_string());
}

/// Print an error and map it to its exit code
pub(crate) fn report_error(formatter: &Formatter, err: &Error) -> ExitCode {
    formatter.error(&err.to_string());
    ExitCode::from(err)
}

/// Parse a bucket target, reporting failures as usage errors
pub(crate) fn parse_bucket_target(
    path: &str,
    formatter: &Formatter,
) -> Result<BucketTarget, ExitCode> {
    parse_target(path).map_err(|e| report_error(formatter, &e))
}

/// Resolve the alias of `target` and create a client for it
pub(crate) async fn connect(
    target: &BucketTarget,
    formatter: &Formatter,
) -> Result<S3Client, ExitCode> {
    let alias_manager = AliasManager::new().map_err(|e| report_error(formatter, &e))?;

    let alias = match alias_manager.get(&target.alias) {
        Ok(a) => a,
        Err(Error::AliasNotFound(_)) => {
            formatter.error(&format!("Alias '{}' not found", target.alias));
            return Err(ExitCode::NotFound);
        }
        Err(e) => return Err(report_error(formatter, &e)),
    };

    S3Client::new(alias)
        .await
        .map_err(|e| report_error(formatter, &e))
}

/// Warn when noncurrent-version actions target a bucket without versioning
pub(crate) async fn warn_if_unversioned<A>(api: &A, bucket: &str, formatter: &Formatter)
where
    A: LifecycleApi + ?Sized,
{
    match api.versioning_enabled(bucket).await {
        Ok(true) => {}
        Ok(false) => formatter.warning(&format!(
            "Versioning is not enabled on '{bucket}'; noncurrent version actions will have no effect"
        )),
        Err(e) => tracing::debug!(bucket, error = %e, "could not probe bucket versioning"),
    }
}
