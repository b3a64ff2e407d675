//! rule edit command - Modify an existing lifecycle rule
//!
//! Only the flags passed on the command line change the stored rule.

use clap::Args;
use serde::Serialize;

use ilm_core::lifecycle::edit_rule;
use ilm_core::{LifecycleOptions, LifecycleRule};

use super::{
    LifecycleFlags, apply_path_prefix, connect, parse_bucket_target, report_error,
    warn_if_unversioned,
};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Modify an existing lifecycle rule
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Target bucket (alias/bucket)
    pub target: String,

    /// Id of the rule to modify
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub flags: LifecycleFlags,
}

#[derive(Debug, Serialize)]
struct EditOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    rule: &'a LifecycleRule,
}

/// Execute the rule edit command
pub async fn execute(args: EditArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let id = args.id;
    let opts = edit_options(args.flags, &id, target.prefix.as_deref(), formatter);
    if opts.is_empty() {
        formatter.warning("No changes requested; the rule is left as is");
    }

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Updating lifecycle configuration...");
    let result = edit_rule(&client, &target.bucket, &id, &opts).await;
    spinner.finish();

    let rule = match result {
        Ok(rule) => rule,
        Err(e) => return report_error(formatter, &e),
    };

    if opts.has_noncurrent_options() {
        warn_if_unversioned(&client, &target.bucket, formatter).await;
    }

    if formatter.is_json() {
        formatter.json(&EditOutput {
            status: "success",
            bucket: &target.bucket,
            rule: &rule,
        });
    } else {
        formatter.success(&format!(
            "Lifecycle rule {} updated on '{target}'.",
            formatter.style_id(&rule.id)
        ));
    }
    ExitCode::Success
}

fn edit_options(
    flags: LifecycleFlags,
    id: &str,
    path_prefix: Option<&str>,
    formatter: &Formatter,
) -> LifecycleOptions {
    let mut opts = flags.into_options(Some(id.to_string()));
    apply_path_prefix(&mut opts, path_prefix, formatter);
    opts
}
