use std::path::Path;

use super::ApplyEngine;
use crate::error::{Error, Result};
use crate::utils::command;

/// `kapp deploy` invoked as a child process with inherited stdio.
#[derive(Debug, Clone)]
pub struct KappEngine {
    program: String,
    extra_args: Vec<String>,
}

impl KappEngine {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub(crate) fn deploy_args(&self, app: &str, dir: &Path, namespace: &str) -> Vec<String> {
        let mut args = vec![
            "deploy".to_string(),
            "--app".to_string(),
            app.to_string(),
            "--namespace".to_string(),
            namespace.to_string(),
            "--file".to_string(),
            dir.display().to_string(),
            "--yes".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn deploy(&self, app: &str, dir: &Path, namespace: &str) -> Result<()> {
        let args = self.deploy_args(app, dir, namespace);
        let outcome = command::run_inherited(&self.program, &args)?;
        if !outcome.success() {
            return Err(Error::apply_failed(app, outcome.failure_details()));
        }
        Ok(())
    }
}

impl ApplyEngine for KappEngine {
    fn deploy_app(&self, name: &str, dir: &Path, namespace: &str) -> Result<()> {
        log_status!("deploy", "Deploying app {} to {}", name, namespace);
        self.deploy(name, dir, namespace)
    }

    fn deploy_group(&self, group: &str, dir: &Path, namespace: &str) -> Result<()> {
        log_status!("deploy", "Deploying group {} to {}", group, namespace);
        // kapp reads the rendered app subdirectories recursively from the group dir
        self.deploy(group, dir, namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_args_name_app_namespace_and_dir() {
        let engine = KappEngine::new("kapp", Vec::new());
        assert_eq!(
            engine.deploy_args("core-api", Path::new("/w/core/api"), "dev"),
            vec![
                "deploy",
                "--app",
                "core-api",
                "--namespace",
                "dev",
                "--file",
                "/w/core/api",
                "--yes"
            ]
        );
    }

    #[test]
    fn non_zero_exit_is_apply_failure() {
        let engine = KappEngine::new("false", Vec::new());
        let err = engine
            .deploy_group("core", Path::new("/w/core"), "dev")
            .unwrap_err();
        assert_eq!(err.code.as_str(), "apply.failed");
        assert!(err.message.contains("core"));
    }
}
