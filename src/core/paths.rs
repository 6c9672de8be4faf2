use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::env;
use std::path::{Path, PathBuf};

/// Reserved per-group metadata file. Never templated as an app.
pub const APP_GROUP_FILE: &str = "_app_group.yaml";

/// Date segment of a run's working directory.
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Time segment of a run's working directory (second resolution).
pub const RUN_TIME_FORMAT: &str = "%H-%M:%S";

/// Manifest suffixes stripped from app definition filenames.
const APP_FILE_EXTENSIONS: &[&str] = &[".gotmpl", ".tpl", ".yaml", ".yml"];

/// Base korgi config directory (universal ~/.config/korgi/ on all platforms)
pub fn korgi() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("korgi"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("korgi"))
    }
}

/// Global korgi.json config file path
pub fn korgi_json() -> Result<PathBuf> {
    Ok(korgi()?.join("korgi.json"))
}

/// Join path segments onto a base. No existence check.
pub fn concat_dirs(base: &Path, parts: &[&str]) -> PathBuf {
    parts
        .iter()
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

/// Directory holding one subdirectory per app group of `namespace`.
pub fn namespace_dir(namespaces_dir: &Path, namespace: &str) -> PathBuf {
    concat_dirs(namespaces_dir, &[namespace])
}

/// Working directory for one run:
/// `<working_dir>/<YYYY-MM-DD>/<HH-MM:SS>/<namespace>/<group>`.
///
/// Two runs started within the same second for the same namespace and group
/// resolve to the same directory.
pub fn working_group_dir(
    working_dir: &Path,
    started_at: &NaiveDateTime,
    namespace: &str,
    group: &str,
) -> PathBuf {
    let date = started_at.format(RUN_DATE_FORMAT).to_string();
    let time = started_at.format(RUN_TIME_FORMAT).to_string();
    concat_dirs(working_dir, &[date.as_str(), time.as_str(), namespace, group])
}

/// Derive the app name from a definition filename.
///
/// Drops any leading directories and every trailing manifest suffix, so
/// `apps/redis.yaml.gotmpl` becomes `redis`. Names that would end up empty
/// (e.g. `.yaml`) are returned unchanged.
pub fn sanitize_app_name(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let mut name = base.as_str();
    while let Some(stripped) = APP_FILE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .filter(|stripped| !stripped.is_empty())
    {
        name = stripped;
    }

    name.to_string()
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand(raw: &str) -> Result<PathBuf> {
    shellexpand::full(raw)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| {
            Error::validation_invalid_argument(
                "path",
                format!("Cannot expand '{}': {}", raw, e),
                Some(raw.to_string()),
            )
        })
}
