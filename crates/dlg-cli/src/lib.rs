use std::ffi::OsString;

use clap::Parser;

mod audio;
mod cli_args;
mod commands;
mod error_map;
mod explorer;
mod input;
mod line_tui;
mod logging;
mod session;
mod settings;
mod traversal;
mod tui;
mod tui_render;
mod tui_state;
mod view;

pub(crate) use cli_args::{Cli, ExploreArgs, GameArgs, Mode, ShowArgs, ValidateArgs};
pub(crate) use error_map::{
    emit_error, map_json, map_log_file, map_settings_invalid, map_settings_read, map_stdin_io,
    map_stdout_io, map_tui_io, CliError,
};
pub(crate) use line_tui::run_explore_line_mode;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Mode::Explore(args) => commands::run_explore(args),
        Mode::Show(args) => commands::run_show(args),
        Mode::Validate(args) => commands::run_validate(args),
    }
}

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
