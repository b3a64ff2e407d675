//! rule rm command - Remove lifecycle rules
//!
//! Removes a single rule by id, or every rule of the bucket with
//! `--all --force`.

use clap::Args;
use serde::Serialize;

use ilm_core::lifecycle::{remove_all_rules, remove_rule};

use super::{connect, parse_bucket_target, report_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Remove one or all lifecycle rules
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Target bucket (alias/bucket)
    pub target: String,

    /// Id of the rule to remove
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub id: Option<String>,

    /// Remove every rule of the bucket
    #[arg(long, requires = "force")]
    pub all: bool,

    /// Confirm removal of all rules
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    removed: Vec<String>,
}

/// Execute the rule rm command
pub async fn execute(args: RmArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Updating lifecycle configuration...");
    let result = match &args.id {
        Some(id) => remove_rule(&client, &target.bucket, id)
            .await
            .map(|rule| vec![rule]),
        None => remove_all_rules(&client, &target.bucket).await,
    };
    spinner.finish();

    let removed: Vec<String> = match result {
        Ok(rules) => rules.into_iter().map(|r| r.id).collect(),
        Err(e) => return report_error(formatter, &e),
    };

    if formatter.is_json() {
        formatter.json(&RmOutput {
            status: "success",
            bucket: &target.bucket,
            removed,
        });
    } else if let Some(id) = &args.id {
        formatter.success(&format!(
            "Lifecycle rule {} removed from '{target}'.",
            formatter.style_id(id)
        ));
    } else if removed.is_empty() {
        formatter.println(&format!("No lifecycle rules configured on '{target}'."));
    } else {
        formatter.success(&format!(
            "Removed {} lifecycle rule(s) from '{target}'.",
            removed.len()
        ));
    }
    ExitCode::Success
}
