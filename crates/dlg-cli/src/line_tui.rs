use std::io::{self, BufRead, Write};

use crate::explorer::{Explorer, Outcome};
use crate::input::line_to_keys;
use crate::view::HOW_TO_LINES;
use crate::{map_stdin_io, map_stdout_io, CliError};

pub(crate) fn run_explore_line_mode(explorer: &mut Explorer<'_>) -> Result<i32, CliError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_explore_line_mode_with_io(explorer, &mut reader, &mut writer)
}

pub(crate) fn run_explore_line_mode_with_io(
    explorer: &mut Explorer<'_>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, CliError> {
    writeln!(writer, "[HOW-TO]").map_err(map_stdout_io)?;
    writeln!(writer).map_err(map_stdout_io)?;
    for line in HOW_TO_LINES {
        writeln!(writer, "{}", line).map_err(map_stdout_io)?;
    }
    writeln!(writer, "line mode: type a number then ENTER, '-' rewinds, 'a' toggles audio, 'q' quits")
        .map_err(map_stdout_io)?;
    writeln!(writer).map_err(map_stdout_io)?;
    print_view(explorer, writer)?;

    loop {
        let Some(raw) = prompt_input_from("> ", reader, writer)? else {
            return Ok(0);
        };
        for key in line_to_keys(&raw) {
            match explorer.handle_key(key) {
                Ok(Outcome::Pending) | Ok(Outcome::Unchanged) => continue,
                Ok(Outcome::Redraw) => print_view(explorer, writer)?,
                Ok(Outcome::Message(message)) => {
                    writeln!(writer, "{}", message).map_err(map_stdout_io)?;
                }
                Ok(Outcome::Quit) => return Ok(0),
                Err(error) => {
                    tracing::warn!(code = %error.code, "{}", error.message);
                    writeln!(writer, "error [{}]: {}", error.code, error.message)
                        .map_err(map_stdout_io)?;
                }
            }
            break;
        }
    }
}

fn print_view(explorer: &Explorer<'_>, writer: &mut dyn Write) -> Result<(), CliError> {
    writeln!(writer).map_err(map_stdout_io)?;
    for line in explorer.view().lines() {
        writeln!(writer, "{}", line).map_err(map_stdout_io)?;
    }
    Ok(())
}

/// Returns `None` at end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, CliError> {
    write!(writer, "{}", prefix).map_err(map_stdout_io)?;
    writer.flush().map_err(map_stdout_io)?;
    let mut input = String::new();
    if reader.read_line(&mut input).map_err(map_stdin_io)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
