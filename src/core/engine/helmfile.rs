use std::path::Path;

use super::TemplateEngine;
use crate::error::{Error, Result};
use crate::utils::command;

/// `helmfile` invoked as a child process, one app definition at a time.
#[derive(Debug, Clone)]
pub struct HelmfileEngine {
    program: String,
    extra_args: Vec<String>,
}

impl HelmfileEngine {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn base_args(&self, input_file: &Path) -> Vec<String> {
        let mut args = vec!["--file".to_string(), input_file.display().to_string()];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub(crate) fn lint_args(&self, input_file: &Path) -> Vec<String> {
        let mut args = self.base_args(input_file);
        args.push("lint".to_string());
        args
    }

    pub(crate) fn template_args(&self, input_file: &Path, out_dir: &Path) -> Vec<String> {
        let mut args = self.base_args(input_file);
        args.extend([
            "template".to_string(),
            "--output-dir".to_string(),
            out_dir.display().to_string(),
        ]);
        args
    }
}

impl TemplateEngine for HelmfileEngine {
    fn lint(&self, app: &str, input_file: &Path) -> Result<()> {
        log_status!("lint", "Linting {}", app);
        let outcome = command::run_captured(&self.program, &self.lint_args(input_file))?;
        if !outcome.success() {
            let err = Error::template_lint_failed(app, outcome.failure_details());
            let text = command::error_text(&outcome.output);
            return Err(if text.is_empty() { err } else { err.with_hint(text) });
        }
        Ok(())
    }

    fn template(&self, app: &str, input_file: &Path, out_dir: &Path) -> Result<()> {
        log_status!("template", "Rendering {} into {}", app, out_dir.display());
        let args = self.template_args(input_file, out_dir);
        let outcome = command::run_captured(&self.program, &args)?;
        if !outcome.success() {
            let err = Error::template_render_failed(app, outcome.failure_details());
            let text = command::error_text(&outcome.output);
            return Err(if text.is_empty() { err } else { err.with_hint(text) });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_args_place_file_before_subcommand() {
        let engine = HelmfileEngine::new("helmfile", vec!["--quiet".to_string()]);
        assert_eq!(
            engine.lint_args(Path::new("ns/core/api.yaml")),
            vec!["--file", "ns/core/api.yaml", "--quiet", "lint"]
        );
    }

    #[test]
    fn template_args_target_output_dir() {
        let engine = HelmfileEngine::new("helmfile", Vec::new());
        assert_eq!(
            engine.template_args(Path::new("api.yaml"), Path::new("/w/core/api")),
            vec!["--file", "api.yaml", "template", "--output-dir", "/w/core/api"]
        );
    }

    #[test]
    fn failing_program_maps_to_lint_error() {
        // `false` ignores its arguments and exits 1
        let engine = HelmfileEngine::new("false", Vec::new());
        let err = engine.lint("api", Path::new("api.yaml")).unwrap_err();
        assert_eq!(err.code.as_str(), "template.lint_failed");
        assert_eq!(err.details["exitCode"], 1);
    }

    #[test]
    fn failing_program_maps_to_render_error() {
        let engine = HelmfileEngine::new("false", Vec::new());
        let err = engine
            .template("api", Path::new("api.yaml"), Path::new("/tmp"))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "template.render_failed");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let engine = HelmfileEngine::new("korgi-no-such-helmfile", Vec::new());
        let err = engine.lint("api", Path::new("api.yaml")).unwrap_err();
        assert_eq!(err.code.as_str(), "engine.spawn_failed");
    }
}
