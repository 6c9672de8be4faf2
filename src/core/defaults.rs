use serde::{Deserialize, Serialize};
use std::fs;

use crate::deploy::Precondition;
use crate::paths;
use crate::utils::io;

/// Root configuration structure for korgi.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KorgiConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via korgi.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Directory holding one subdirectory per namespace.
    #[serde(default = "default_namespaces_dir")]
    pub namespaces_dir: String,

    /// Root of the timestamped rendering tree (overridden by `--working-dir`).
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    #[serde(default = "default_preconditions")]
    pub preconditions: Vec<Precondition>,

    #[serde(default = "default_template")]
    pub template: EngineConfig,

    #[serde(default = "default_apply")]
    pub apply: EngineConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            namespaces_dir: default_namespaces_dir(),
            working_dir: default_working_dir(),
            preconditions: default_preconditions(),
            template: default_template(),
            apply: default_apply(),
        }
    }
}

/// External engine invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub program: String,

    /// Appended to every invocation of `program`.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

// =============================================================================
// Built-in defaults
// =============================================================================

fn default_namespaces_dir() -> String {
    "namespaces".to_string()
}

fn default_working_dir() -> String {
    std::env::temp_dir().join("korgi").display().to_string()
}

fn default_preconditions() -> Vec<Precondition> {
    vec![Precondition::NamespaceDirExists]
}

fn default_template() -> EngineConfig {
    EngineConfig {
        program: "helmfile".to_string(),
        extra_args: Vec::new(),
    }
}

fn default_apply() -> EngineConfig {
    EngineConfig {
        program: "kapp".to_string(),
        extra_args: Vec::new(),
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If korgi.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full korgi.json config, falling back to defaults on any error.
pub fn load_config() -> KorgiConfig {
    paths::korgi_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Load config from an explicit file path.
pub fn load_config_from(path: &std::path::Path) -> crate::Result<KorgiConfig> {
    if !path.exists() {
        return Err(crate::Error::other(format!("{} not found", path.display())));
    }

    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let config: KorgiConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    validate(&config.defaults)?;

    Ok(config)
}

fn validate(defaults: &Defaults) -> crate::Result<()> {
    let engines = [
        ("template.program", &defaults.template),
        ("apply.program", &defaults.apply),
    ];
    for (key, engine) in engines {
        if engine.program.trim().is_empty() {
            return Err(crate::Error::config_invalid_value(
                key,
                Some(engine.program.clone()),
                "program cannot be empty",
            ));
        }
    }
    Ok(())
}

/// Delete korgi.json, returning whether a file was removed.
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::korgi_json()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
    })?;

    Ok(true)
}

/// Check if korgi.json file exists
pub fn config_exists() -> bool {
    paths::korgi_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

pub fn config_path() -> crate::Result<String> {
    Ok(paths::korgi_json()?.display().to_string())
}

/// Built-in defaults, ignoring any korgi.json on disk.
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
