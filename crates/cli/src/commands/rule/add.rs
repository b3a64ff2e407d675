//! rule add command - Add a lifecycle rule
//!
//! Builds a rule from the given flags and appends it to the bucket's
//! lifecycle configuration.

use clap::Args;
use serde::Serialize;

use ilm_core::LifecycleRule;
use ilm_core::lifecycle::add_rule;

use super::{
    LifecycleFlags, apply_path_prefix, connect, parse_bucket_target, report_error,
    warn_if_unversioned,
};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Add a lifecycle rule to a bucket
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Target bucket (alias/bucket)
    pub target: String,

    /// Rule id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub flags: LifecycleFlags,
}

#[derive(Debug, Serialize)]
struct AddOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    rule: &'a LifecycleRule,
}

/// Execute the rule add command
pub async fn execute(args: AddArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let mut opts = args.flags.into_options(args.id);
    apply_path_prefix(&mut opts, target.prefix.as_deref(), formatter);

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Updating lifecycle configuration...");
    let result = add_rule(&client, &target.bucket, &opts).await;
    spinner.finish();

    let rule = match result {
        Ok(rule) => rule,
        Err(e) => return report_error(formatter, &e),
    };

    if rule.has_noncurrent_actions() {
        warn_if_unversioned(&client, &target.bucket, formatter).await;
    }

    if formatter.is_json() {
        formatter.json(&AddOutput {
            status: "success",
            bucket: &target.bucket,
            rule: &rule,
        });
    } else {
        formatter.success(&format!(
            "Lifecycle rule {} added to '{target}'.",
            formatter.style_id(&rule.id)
        ));
    }
    ExitCode::Success
}
