use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults::Defaults;
use crate::engine::{self, ApplyEngine, TemplateEngine};
use crate::error::{Error, Result};
use crate::paths::{self, APP_GROUP_FILE};
use crate::render;
use crate::utils::io;

/// Existence checks run before anything is written.
///
/// Only the namespace directory is checked by default; a missing group
/// directory then simply lists no apps and the run succeeds without
/// templating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    NamespaceDirExists,
    GroupDirExists,
}

/// Inputs for one app-group deployment.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub group: String,
    pub namespace: String,
    pub namespaces_dir: PathBuf,
    pub working_dir: PathBuf,
    pub filter: Option<String>,
    pub lint: bool,
    pub dry_run: bool,
    /// Invocation time; names the working directory.
    pub started_at: NaiveDateTime,
    pub preconditions: Vec<Precondition>,
}

impl DeployConfig {
    /// Filter value, treating an empty string as unset.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }
}

/// One app rendered during the run.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatedApp {
    pub name: String,
    pub source: String,
    pub output_dir: String,
}

/// What was handed to the apply engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplyTarget {
    App { name: String, dir: String },
    Group { name: String, dir: String },
}

/// Result of an app-group deployment.
#[derive(Debug, Clone, Serialize)]
pub struct AppGroupDeployResult {
    pub namespace: String,
    pub group: String,
    pub working_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub lint: bool,
    pub dry_run: bool,
    pub apps: Vec<TemplatedApp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<ApplyTarget>,
}

/// High-level entry point. Builds the configured engines and deploys.
pub fn run(config: &DeployConfig, defaults: &Defaults) -> Result<AppGroupDeployResult> {
    let (templater, applier) = engine::from_defaults(defaults);
    deploy_app_group(config, &templater, &applier)
}

/// Template every app of a group into a fresh working directory, then apply.
///
/// Apps are processed in file-name order and the first templating error
/// aborts the run; apps after it are not attempted. With `dry_run` the apply
/// engine is never called.
pub fn deploy_app_group(
    config: &DeployConfig,
    templater: &dyn TemplateEngine,
    applier: &dyn ApplyEngine,
) -> Result<AppGroupDeployResult> {
    let namespace_dir = paths::namespace_dir(&config.namespaces_dir, &config.namespace);
    let app_group_dir = paths::concat_dirs(&namespace_dir, &[config.group.as_str()]);

    check_preconditions(config, &namespace_dir, &app_group_dir)?;

    let target_app_group_dir = paths::working_group_dir(
        &config.working_dir,
        &config.started_at,
        &config.namespace,
        &config.group,
    );
    io::ensure_dir(&target_app_group_dir, "creating group directory")?;

    log_status!(
        "apply",
        "Rendering {}/{} into {}",
        config.namespace,
        config.group,
        target_app_group_dir.display()
    );

    let filter = config.filter();
    let mut apps = Vec::new();

    for app_file in list_app_files(&app_group_dir)? {
        let file_name = match app_file.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if file_name == APP_GROUP_FILE {
            continue;
        }

        let app = paths::sanitize_app_name(&file_name);
        if filter.is_some_and(|f| f != app) {
            continue;
        }

        let output_dir =
            render::template_app(templater, &app, &app_file, &target_app_group_dir, config.lint)
                .map_err(|e| e.wrap("templating app"))?;

        apps.push(TemplatedApp {
            name: app,
            source: app_file.display().to_string(),
            output_dir: output_dir.display().to_string(),
        });
    }

    let mut result = AppGroupDeployResult {
        namespace: config.namespace.clone(),
        group: config.group.clone(),
        working_dir: target_app_group_dir.display().to_string(),
        filter: filter.map(str::to_string),
        lint: config.lint,
        dry_run: config.dry_run,
        apps,
        applied: None,
    };

    if config.dry_run {
        log_status!(
            "apply",
            "Dry run: {} app(s) rendered, nothing deployed",
            result.apps.len()
        );
        return Ok(result);
    }

    let target = match filter {
        Some(filter) => {
            if result.apps.is_empty() {
                log_status!(
                    "apply",
                    "No app named '{}' in {}; deploying its path anyway",
                    filter,
                    app_group_dir.display()
                );
            }
            let name = format!("{}-{}", config.group, filter);
            let dir = paths::concat_dirs(&target_app_group_dir, &[filter]);
            applier
                .deploy_app(&name, &dir, &config.namespace)
                .map_err(|e| e.wrap("running deploy with filter"))?;
            ApplyTarget::App {
                name,
                dir: dir.display().to_string(),
            }
        }
        None => {
            applier
                .deploy_group(&config.group, &target_app_group_dir, &config.namespace)
                .map_err(|e| e.wrap("running deploy"))?;
            ApplyTarget::Group {
                name: config.group.clone(),
                dir: target_app_group_dir.display().to_string(),
            }
        }
    };

    result.applied = Some(target);
    Ok(result)
}

fn check_preconditions(
    config: &DeployConfig,
    namespace_dir: &Path,
    app_group_dir: &Path,
) -> Result<()> {
    for precondition in &config.preconditions {
        match precondition {
            Precondition::NamespaceDirExists => {
                if !namespace_dir.exists() {
                    return Err(Error::namespace_not_found(
                        &config.namespace,
                        namespace_dir.display().to_string(),
                    ));
                }
            }
            Precondition::GroupDirExists => {
                if !app_group_dir.is_dir() {
                    return Err(Error::group_not_found(
                        &config.group,
                        app_group_dir.display().to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Entries directly inside `dir`, sorted by file name.
///
/// A directory that does not exist yields no entries.
fn list_app_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*", glob::Pattern::escape(&dir.display().to_string()));

    let mut entries = glob::glob(&pattern)
        .map_err(|e| listing_error(&e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| listing_error(&e))?;

    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn listing_error(e: &dyn std::fmt::Display) -> Error {
    Error::internal_io(e.to_string(), Some("listing group directory".to_string()))
}
