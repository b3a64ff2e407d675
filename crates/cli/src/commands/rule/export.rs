//! rule export command - Print the lifecycle configuration as JSON
//!
//! The output is the same document `rule import` accepts.

use clap::Args;

use ilm_core::LifecycleApi as _;

use super::{connect, parse_bucket_target, report_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// Print the lifecycle configuration as JSON
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Target bucket (alias/bucket)
    pub target: String,
}

/// Execute the rule export command
pub async fn execute(args: ExportArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Fetching lifecycle configuration...");
    let result = client.get_lifecycle(&target.bucket).await;
    spinner.finish();

    match result {
        Ok(policy) => {
            formatter.json(&policy);
            ExitCode::Success
        }
        Err(e) => report_error(formatter, &e),
    }
}
