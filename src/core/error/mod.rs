use serde::Serialize;
use serde_json::Value;

mod codes;

pub use codes::all_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    NamespaceNotFound,
    GroupNotFound,

    TemplateLintFailed,
    TemplateRenderFailed,
    ApplyFailed,
    EngineSpawnFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::NamespaceNotFound => "namespace.not_found",
            ErrorCode::GroupNotFound => "group.not_found",

            ErrorCode::TemplateLintFailed => "template.lint_failed",
            ErrorCode::TemplateRenderFailed => "template.render_failed",
            ErrorCode::ApplyFailed => "apply.failed",
            ErrorCode::EngineSpawnFailed => "engine.spawn_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNotFoundDetails {
    pub id: String,
    pub path: String,
}

/// Failure of an external engine process (helmfile, kapp, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    /// The namespace directory is missing on disk.
    ///
    /// The message keeps the `<dir> directory does not exist` shape users
    /// grep for in CI logs.
    pub fn namespace_not_found(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::NamespaceNotFound,
            format!("{} directory does not exist", path),
            to_details(DirectoryNotFoundDetails {
                id: namespace.into(),
                path,
            }),
        )
        .with_hint(
            "Namespaces are read from the `namespaces_dir` setting (see 'korgi config show')",
        )
    }

    pub fn group_not_found(group: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::GroupNotFound,
            format!("{} directory does not exist", path),
            to_details(DirectoryNotFoundDetails {
                id: group.into(),
                path,
            }),
        )
    }

    pub fn template_lint_failed(app: &str, details: EngineCommandFailedDetails) -> Self {
        Self::new(
            ErrorCode::TemplateLintFailed,
            format!("lint failed for {} (exit code {})", app, details.exit_code),
            to_details(details),
        )
    }

    pub fn template_render_failed(app: &str, details: EngineCommandFailedDetails) -> Self {
        Self::new(
            ErrorCode::TemplateRenderFailed,
            format!("template failed for {} (exit code {})", app, details.exit_code),
            to_details(details),
        )
    }

    pub fn apply_failed(name: &str, details: EngineCommandFailedDetails) -> Self {
        Self::new(
            ErrorCode::ApplyFailed,
            format!("deploy failed for {} (exit code {})", name, details.exit_code),
            to_details(details),
        )
    }

    pub fn engine_spawn_failed(program: &str, error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::EngineSpawnFailed,
            format!("failed to start {}: {}", program, error.into()),
            serde_json::json!({ "program": program }),
        )
        .with_hint(format!("Check that '{}' is installed and on PATH", program))
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.clone(),
        };
        let details = to_details(InternalIoErrorDetails { error, context });

        Self::new(ErrorCode::InternalIoError, message, details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::InternalUnexpected,
            format!("Unexpected error: {}", error),
            serde_json::json!({ "error": error }),
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::internal_unexpected(message)
    }

    /// Prefix the message with the phase that failed, keeping code and details.
    pub fn wrap(mut self, context: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", context.as_ref(), self.message);
        self
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_prefixes_message_and_keeps_code() {
        let err = Error::internal_io("permission denied", Some("creating app dir".to_string()))
            .wrap("templating app");

        assert_eq!(err.code, ErrorCode::InternalIoError);
        assert_eq!(
            err.message,
            "templating app: creating app dir: permission denied"
        );
    }

    #[test]
    fn namespace_not_found_names_directory() {
        let err = Error::namespace_not_found("staging", "namespaces/staging");
        assert_eq!(err.message, "namespaces/staging directory does not exist");
        assert_eq!(err.details["id"], "staging");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn engine_failures_carry_command_details() {
        let details = EngineCommandFailedDetails {
            command: "kapp deploy --app web".to_string(),
            exit_code: 3,
            stdout: String::new(),
            stderr: "cluster unreachable".to_string(),
        };
        let err = Error::apply_failed("web", details);

        assert_eq!(err.code.as_str(), "apply.failed");
        assert_eq!(err.details["exitCode"], 3);
        assert_eq!(err.details["stderr"], "cluster unreachable");
        assert!(err.details.get("stdout").is_none());
    }

    #[test]
    fn code_strings_are_unique_and_dotted() {
        let mut seen = std::collections::HashSet::new();
        for code in all_codes() {
            assert!(code.as_str().contains('.'), "{}", code.as_str());
            assert!(seen.insert(code.as_str()), "duplicate {}", code.as_str());
        }
        assert!(!seen.contains("validation.invalid_json"));
    }
}
