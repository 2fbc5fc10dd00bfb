use std::fmt::Display;

use dlg_api::LoadError;
use dlg_core::DlgError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliError {
    pub(crate) code: String,
    pub(crate) message: String,
}

impl CliError {
    pub(crate) fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<LoadError> for CliError {
    fn from(error: LoadError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}

impl From<DlgError> for CliError {
    fn from(error: DlgError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}

fn map_error(code: &'static str, error: impl Display) -> CliError {
    CliError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: CliError) -> i32 {
    tracing::error!(code = %error.code, "{}", error.message);
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    1
}

pub(crate) fn map_tui_io(error: std::io::Error) -> CliError {
    map_error("TUI_IO", error)
}

pub(crate) fn map_stdout_io(error: std::io::Error) -> CliError {
    map_error("CLI_STDOUT_IO", error)
}

pub(crate) fn map_stdin_io(error: std::io::Error) -> CliError {
    map_error("CLI_STDIN_IO", error)
}

pub(crate) fn map_settings_read(error: std::io::Error) -> CliError {
    map_error("CLI_SETTINGS_READ", error)
}

pub(crate) fn map_settings_invalid(error: DlgError) -> CliError {
    map_error("CLI_SETTINGS_INVALID", error)
}

pub(crate) fn map_json(error: serde_json::Error) -> CliError {
    map_error("CLI_JSON", error)
}

pub(crate) fn map_log_file(error: std::io::Error) -> CliError {
    map_error("CLI_LOG_FILE", error)
}
