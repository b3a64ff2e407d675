//! rule ls command - List lifecycle rules
//!
//! Renders the bucket's rules as a table, optionally narrowed to the
//! expiration or transition side of each rule.

use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use ilm_core::lifecycle::{Filter, LifecycleRule};
use ilm_core::LifecycleApi as _;

use super::{connect, parse_bucket_target, report_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, Spinner};

/// List the lifecycle rules of a bucket
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Target bucket (alias/bucket)
    pub target: String,

    /// Only show expiration actions
    #[arg(long, conflicts_with = "transition")]
    pub expiry: bool,

    /// Only show transition actions
    #[arg(long)]
    pub transition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    All,
    Expiry,
    Transition,
}

impl View {
    fn from_args(args: &LsArgs) -> Self {
        if args.expiry {
            View::Expiry
        } else if args.transition {
            View::Transition
        } else {
            View::All
        }
    }

    fn includes(self, rule: &LifecycleRule) -> bool {
        match self {
            View::All => true,
            View::Expiry => {
                !rule.expiration.is_empty() || !rule.noncurrent_version_expiration.is_empty()
            }
            View::Transition => {
                !rule.transition.is_empty() || !rule.noncurrent_version_transition.is_empty()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct LsOutput<'a> {
    bucket: &'a str,
    rules: Vec<&'a LifecycleRule>,
}

/// Execute the rule ls command
pub async fn execute(args: LsArgs, formatter: &Formatter) -> ExitCode {
    let target = match parse_bucket_target(&args.target, formatter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let view = View::from_args(&args);

    let client = match connect(&target, formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), "Fetching lifecycle configuration...");
    let result = client.get_lifecycle(&target.bucket).await;
    spinner.finish();

    let policy = match result {
        Ok(p) => p,
        Err(e) => return report_error(formatter, &e),
    };

    let rules: Vec<&LifecycleRule> = policy.rules.iter().filter(|r| view.includes(r)).collect();

    if formatter.is_json() {
        formatter.json(&LsOutput {
            bucket: &target.bucket,
            rules,
        });
    } else if rules.is_empty() {
        formatter.println(&format!("No lifecycle rules configured on '{target}'."));
    } else {
        formatter.println(&render_table(&rules, view).to_string());
    }
    ExitCode::Success
}

fn render_table(rules: &[&LifecycleRule], view: View) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["ID", "STATUS", "FILTER"];
    match view {
        View::All => header.extend(["EXPIRY", "TRANSITION", "NONCURRENT"]),
        View::Expiry => header.extend(["EXPIRY", "NONCURRENT EXPIRY"]),
        View::Transition => header.extend(["TRANSITION", "NONCURRENT TRANSITION"]),
    }
    table.set_header(header);

    for rule in rules {
        let mut row = vec![
            rule.id.clone(),
            rule.status.to_string(),
            describe_filter(&rule.filter),
        ];
        match view {
            View::All => row.extend([
                describe_expiry(rule),
                describe_transition(rule),
                [describe_noncurrent_expiry(rule), describe_noncurrent_transition(rule)]
                    .into_iter()
                    .filter(|s| s != "-")
                    .collect::<Vec<_>>()
                    .join("\n"),
            ]),
            View::Expiry => row.extend([describe_expiry(rule), describe_noncurrent_expiry(rule)]),
            View::Transition => row.extend([
                describe_transition(rule),
                describe_noncurrent_transition(rule),
            ]),
        }
        for cell in row.iter_mut().filter(|c| c.is_empty()) {
            *cell = "-".to_string();
        }
        table.add_row(row);
    }

    table
}

fn human_size(bytes: i64) -> String {
    humansize::format_size(u64::try_from(bytes).unwrap_or_default(), humansize::BINARY)
}

fn describe_filter(filter: &Filter) -> String {
    let predicates = filter.predicates();
    let mut parts = Vec::new();

    if let Some(prefix) = &predicates.prefix {
        parts.push(format!("prefix={prefix}"));
    }
    for tag in &predicates.tags {
        parts.push(format!("tag:{tag}"));
    }
    if let Some(size) = predicates.size_greater_than {
        parts.push(format!("size>{}", human_size(size)));
    }
    if let Some(size) = predicates.size_less_than {
        parts.push(format!("size<{}", human_size(size)));
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("\n")
    }
}

fn describe_expiry(rule: &LifecycleRule) -> String {
    let exp = &rule.expiration;
    let mut parts = Vec::new();
    if let Some(date) = exp.date {
        parts.push(format!("on {date}"));
    }
    if let Some(days) = exp.days {
        parts.push(format!("after {days}d"));
    }
    if exp.expired_object_delete_marker {
        parts.push("delete markers".to_string());
    }
    if exp.delete_all_versions {
        parts.push("all versions".to_string());
    }
    dash_if_empty(parts)
}

fn describe_transition(rule: &LifecycleRule) -> String {
    let tr = &rule.transition;
    let when = match (tr.date, tr.days) {
        (Some(date), _) => format!("on {date}"),
        (None, Some(days)) => format!("after {days}d"),
        (None, None) => return "-".to_string(),
    };
    match &tr.storage_class {
        Some(class) => format!("{when} → {class}"),
        None => when,
    }
}

fn describe_noncurrent_expiry(rule: &LifecycleRule) -> String {
    let nve = &rule.noncurrent_version_expiration;
    let mut parts = Vec::new();
    if let Some(days) = nve.noncurrent_days {
        parts.push(format!("expire after {days}d"));
    }
    if let Some(keep) = nve.newer_noncurrent_versions {
        parts.push(format!("keep {keep} newer"));
    }
    dash_if_empty(parts)
}

fn describe_noncurrent_transition(rule: &LifecycleRule) -> String {
    let nvt = &rule.noncurrent_version_transition;
    let mut parts = Vec::new();
    if let Some(days) = nvt.noncurrent_days {
        let class = nvt.storage_class.as_deref().unwrap_or("?");
        parts.push(format!("after {days}d → {class}"));
    }
    if let Some(keep) = nvt.newer_noncurrent_versions {
        parts.push(format!("keep {keep} newer"));
    }
    dash_if_empty(parts)
}

fn dash_if_empty(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
