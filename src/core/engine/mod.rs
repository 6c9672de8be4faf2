//! External engines driven by the deploy pipeline.
//!
//! - `helmfile` - renders and lints a single app definition
//! - `kapp` - applies rendered manifests to the cluster
//!
//! The pipeline only talks to the `TemplateEngine` and `ApplyEngine` traits,
//! so tests can substitute recording fakes for the real binaries.

use std::path::Path;

use crate::defaults::Defaults;
use crate::error::Result;

pub mod helmfile;
pub mod kapp;

pub use helmfile::HelmfileEngine;
pub use kapp::KappEngine;

/// Renders (and optionally lints) one app's manifests.
pub trait TemplateEngine {
    fn lint(&self, app: &str, input_file: &Path) -> Result<()>;

    fn template(&self, app: &str, input_file: &Path, out_dir: &Path) -> Result<()>;
}

/// Deploys rendered manifests into a namespace.
pub trait ApplyEngine {
    /// Deploy a single app from its rendered directory.
    fn deploy_app(&self, name: &str, dir: &Path, namespace: &str) -> Result<()>;

    /// Deploy every rendered app below `dir` as one group.
    fn deploy_group(&self, group: &str, dir: &Path, namespace: &str) -> Result<()>;
}

/// Build the process-backed engines from configured defaults.
pub fn from_defaults(defaults: &Defaults) -> (HelmfileEngine, KappEngine) {
    (
        HelmfileEngine::new(&defaults.template.program, defaults.template.extra_args.clone()),
        KappEngine::new(&defaults.apply.program, defaults.apply.extra_args.clone()),
    )
}
