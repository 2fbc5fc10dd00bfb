#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(
    explorer: &mut crate::explorer::Explorer<'_>,
) -> Result<i32, crate::CliError> {
    super::run_explore_line_mode(explorer)
}

#[cfg(not(coverage))]
pub(super) use rich::run_tui_ratatui_mode;

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::Duration;

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;

    use crate::explorer::{Explorer, Outcome};
    use crate::tui_render::{content_rows, render_tui, wrapped_view_lines};
    use crate::tui_state::{map_key_event, TuiUiState, UiKey};
    use crate::{map_tui_io, CliError};

    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, CliError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(crate) fn run_tui_ratatui_mode(explorer: &mut Explorer<'_>) -> Result<i32, CliError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState {
            status: "ready (h for help)".to_string(),
            ..TuiUiState::default()
        };

        loop {
            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &ui, explorer))
                .map_err(map_tui_io)?;

            if !event::poll(POLL_INTERVAL).map_err(map_tui_io)? {
                continue;
            }
            let Event::Key(key) = event::read().map_err(map_tui_io)? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let size = terminal.terminal_mut().size().map_err(map_tui_io)?;
            let visible = content_rows(size.height, &ui);
            let width = (size.width as usize).saturating_sub(1).max(16);
            let content = wrapped_view_lines(explorer, width).len();

            match map_key_event(key) {
                UiKey::ForceQuit => break,
                UiKey::ToggleHelp => ui.help_visible = !ui.help_visible,
                UiKey::ScrollUp => ui.scroll_by(-1, content, visible),
                UiKey::ScrollDown => ui.scroll_by(1, content, visible),
                UiKey::PageUp => ui.scroll_by(-(visible as isize), content, visible),
                UiKey::PageDown => ui.scroll_by(visible as isize, content, visible),
                UiKey::Explorer(key) => match explorer.handle_key(key) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Redraw) => {
                        ui.reset_scroll();
                        ui.status = format!("node {}", explorer.view().node_id);
                    }
                    Ok(Outcome::Message(message)) => ui.status = message,
                    Ok(Outcome::Pending) | Ok(Outcome::Unchanged) => {}
                    Err(error) => {
                        tracing::warn!(code = %error.code, "{}", error.message);
                        ui.status = format!("error [{}]: {}", error.code, error.message);
                    }
                },
            }
        }

        Ok(0)
    }
}
