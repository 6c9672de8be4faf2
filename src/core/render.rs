use std::path::{Path, PathBuf};

use crate::engine::TemplateEngine;
use crate::error::Result;
use crate::paths;
use crate::utils::io;

/// Render one app into `<app_group_dir>/<app>`, linting first when asked.
///
/// Returns the directory the app was rendered into. A lint failure stops
/// before the engine renders anything.
pub fn template_app(
    engine: &dyn TemplateEngine,
    app: &str,
    input_file: &Path,
    app_group_dir: &Path,
    lint: bool,
) -> Result<PathBuf> {
    let target_app_dir = paths::concat_dirs(app_group_dir, &[app]);

    io::ensure_dir(&target_app_dir, "creating app dir")?;

    if lint {
        engine.lint(app, input_file)?;
    }

    engine.template(app, input_file, &target_app_dir)?;

    Ok(target_app_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineCommandFailedDetails, Error};
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail_lint: bool,
    }

    impl TemplateEngine for Recorder {
        fn lint(&self, app: &str, _input_file: &Path) -> Result<()> {
            self.calls.borrow_mut().push(format!("lint {}", app));
            if self.fail_lint {
                return Err(Error::template_lint_failed(
                    app,
                    EngineCommandFailedDetails {
                        command: "helmfile lint".to_string(),
                        exit_code: 1,
                        stdout: String::new(),
                        stderr: String::new(),
                    },
                ));
            }
            Ok(())
        }

        fn template(&self, app: &str, _input_file: &Path, out_dir: &Path) -> Result<()> {
            assert!(out_dir.is_dir(), "output dir must exist before rendering");
            self.calls.borrow_mut().push(format!("template {}", app));
            Ok(())
        }
    }

    #[test]
    fn renders_into_app_subdirectory() {
        let dir = tempdir().unwrap();
        let engine = Recorder::default();

        let out = template_app(&engine, "api", Path::new("api.yaml"), dir.path(), false).unwrap();

        assert_eq!(out, dir.path().join("api"));
        assert!(out.is_dir());
        assert_eq!(*engine.calls.borrow(), vec!["template api"]);
    }

    #[test]
    fn lints_before_rendering() {
        let dir = tempdir().unwrap();
        let engine = Recorder::default();

        template_app(&engine, "api", Path::new("api.yaml"), dir.path(), true).unwrap();

        assert_eq!(*engine.calls.borrow(), vec!["lint api", "template api"]);
    }

    #[test]
    fn lint_failure_skips_rendering() {
        let dir = tempdir().unwrap();
        let engine = Recorder {
            fail_lint: true,
            ..Default::default()
        };

        let err =
            template_app(&engine, "api", Path::new("api.yaml"), dir.path(), true).unwrap_err();

        assert_eq!(err.code.as_str(), "template.lint_failed");
        assert_eq!(*engine.calls.borrow(), vec!["lint api"]);
    }

    #[test]
    fn unwritable_group_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("group");
        std::fs::write(&blocker, "not a directory").unwrap();
        let engine = Recorder::default();

        let err = template_app(&engine, "api", Path::new("api.yaml"), &blocker, true).unwrap_err();

        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.starts_with("creating app dir"));
        assert!(engine.calls.borrow().is_empty());
    }
}
