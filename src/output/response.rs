//! CLI response formatting and output.
//!
//! Successful results are printed as a JSON envelope on stdout. Failures are
//! printed as plain text on stderr and mapped to an exit code.

use korgi::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print the wrapped error message and any hints to stderr.
pub fn print_error(err: &Error) {
    eprintln!("Error: {}", err.message);
    for hint in &err.hints {
        eprintln!("  hint: {}", hint.message);
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::NamespaceNotFound | ErrorCode::GroupNotFound => 4,

        ErrorCode::TemplateLintFailed
        | ErrorCode::TemplateRenderFailed
        | ErrorCode::ApplyFailed
        | ErrorCode::EngineSpawnFailed => 20,

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

/// Print a command result, returning the process exit code.
pub fn print_json_result(result: Result<serde_json::Value>, exit_code: i32) -> i32 {
    match result {
        Ok(data) => match print_response(&CliResponse::success(data)) {
            Ok(()) => exit_code,
            Err(err) => {
                print_error(&err);
                exit_code_for_error(err.code)
            }
        },
        Err(err) => {
            print_error(&err);
            exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_code_maps_to_non_zero_exit() {
        for code in korgi::error::all_codes() {
            assert!(exit_code_for_error(*code) > 0, "{}", code.as_str());
        }
    }

    #[test]
    fn engine_failures_share_an_exit_code() {
        assert_eq!(exit_code_for_error(ErrorCode::TemplateLintFailed), 20);
        assert_eq!(exit_code_for_error(ErrorCode::ApplyFailed), 20);
        assert_eq!(exit_code_for_error(ErrorCode::NamespaceNotFound), 4);
    }

    #[test]
    fn map_cmd_result_keeps_success_exit_code() {
        let (value, code) = map_cmd_result_to_json(Ok((serde_json::json!({"a": 1}), 0)));
        assert_eq!(code, 0);
        assert_eq!(value.unwrap()["a"], 1);
    }

    #[test]
    fn map_cmd_result_maps_error_codes() {
        let (value, code) = map_cmd_result_to_json::<serde_json::Value>(Err(
            Error::namespace_not_found("dev", "namespaces/dev"),
        ));
        assert!(value.is_err());
        assert_eq!(code, 4);
    }

    #[test]
    fn envelope_wraps_data() {
        let json = CliResponse::success(serde_json::json!({"group": "core"}))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["group"], "core");
    }
}
