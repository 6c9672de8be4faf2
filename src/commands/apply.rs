use clap::Args;
use serde::Serialize;

use korgi::defaults::{self, Defaults};
use korgi::deploy::{self, AppGroupDeployResult, DeployConfig};
use korgi::paths;

use super::CmdResult;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// App group to deploy (only the first one is used)
    #[arg(required = true, num_args = 1..)]
    pub groups: Vec<String>,

    /// Target namespace
    #[arg(short = 'n', long)]
    pub namespace: String,

    /// Lint each app before templating it
    #[arg(short = 'l', long)]
    pub lint: bool,

    /// Template apps without deploying them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Restrict templating and deploy to a single app
    #[arg(long, value_name = "APP")]
    pub filter: Option<String>,

    /// Root of the timestamped rendering tree (defaults to the configured working_dir)
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyOutput {
    pub command: String,
    #[serde(flatten)]
    pub result: AppGroupDeployResult,
}

pub fn run(args: ApplyArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ApplyOutput> {
    run_with_defaults(args, global, &defaults::load_defaults())
}

fn run_with_defaults(
    args: ApplyArgs,
    global: &crate::commands::GlobalArgs,
    defaults: &Defaults,
) -> CmdResult<ApplyOutput> {
    let config = build_config(args, global, defaults)?;
    let result = deploy::run(&config, defaults)?;

    Ok((
        ApplyOutput {
            command: "apply".to_string(),
            result,
        },
        0,
    ))
}

fn build_config(
    args: ApplyArgs,
    global: &crate::commands::GlobalArgs,
    defaults: &Defaults,
) -> korgi::Result<DeployConfig> {
    let mut groups = args.groups.into_iter();
    let group = groups.next().ok_or_else(|| {
        korgi::Error::validation_invalid_argument("group", "An app group is required", None)
    })?;
    let ignored: Vec<String> = groups.collect();
    if !ignored.is_empty() {
        korgi::log_status!("apply", "Ignoring extra groups: {}", ignored.join(", "));
    }

    let working_dir = args
        .working_dir
        .as_deref()
        .unwrap_or(&defaults.working_dir);

    Ok(DeployConfig {
        group,
        namespace: args.namespace,
        namespaces_dir: paths::expand(&defaults.namespaces_dir)?,
        working_dir: paths::expand(working_dir)?,
        filter: args.filter,
        lint: args.lint,
        dry_run: args.dry_run,
        started_at: global.started_at,
        preconditions: defaults.preconditions.clone(),
    })
}
