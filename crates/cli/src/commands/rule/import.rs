//! rule import command - Replace the lifecycle configuration
//!
//! Reads a JSON document (as printed by `rule export`) from a file or stdin,
//! validates every rule and writes it as the bucket's whole configuration.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use ilm_core::lifecycle::import_policy;
use ilm_core::{Error, LifecyclePolicy, Result};

use super::{connect, parse_bucket_target, report_error, warn_if_unversioned};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Replace the lifecycle configuration with JSON read from stdin
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Target bucket (alias/bucket)
    pub target: String,

    /// Read the configuration from a file instead of stdin
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ImportOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    rules: usize,
}

/// Execute the rule import command
pub async fn execute(args: ImportArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let policy = match read_policy(args.file.as_ref()).and_then(|p| p.validate().map(|()| p)) {
        Ok(p) => p,
        Err(e) => return report_error(formatter, &e),
    };

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Updating lifecycle configuration...");
    let result = import_policy(&client, &target.bucket, &policy).await;
    spinner.finish();

    if let Err(e) = result {
        return report_error(formatter, &e);
    }

    if policy.rules.iter().any(|r| r.has_noncurrent_actions()) {
        warn_if_unversioned(&client, &target.bucket, formatter).await;
    }

    if formatter.is_json() {
        formatter.json(&ImportOutput {
            status: "success",
            bucket: &target.bucket,
            rules: policy.len(),
        });
    } else {
        formatter.success(&format!(
            "Imported {} lifecycle rule(s) into '{target}'.",
            policy.len()
        ));
    }
    ExitCode::Success
}

fn read_policy(file: Option<&PathBuf>) -> Result<LifecyclePolicy> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    parse_policy(&input)
}

fn parse_policy(input: &str) -> Result<LifecyclePolicy> {
    serde_json::from_str(input).map_err(|e| Error::Parse(format!("lifecycle configuration: {e}")))
}
