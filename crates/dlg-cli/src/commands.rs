use std::io::{self, IsTerminal, Write};

use dlg_api::{validate_all, ValidationReport};
use dlg_core::Link;

use crate::audio::{AudioServer, AudioSink, PlayerCommand, SilentAudio};
use crate::explorer::Explorer;
use crate::logging::{default_log_file, init_logging, LogTarget};
use crate::session::{ConversationLoader, ConversationRef, GameSession};
use crate::view::NodeView;
use crate::{
    map_json, map_stdout_io, run_explore_line_mode, CliError, ExploreArgs, ShowArgs, ValidateArgs,
};

pub(crate) fn run_explore(args: ExploreArgs) -> Result<i32, CliError> {
    let line_mode = args.line_mode || !io::stdout().is_terminal();
    init_logging(if line_mode {
        LogTarget::Stderr
    } else {
        LogTarget::File(default_log_file())
    })?;

    let conversation_ref = ConversationRef::parse(&args.conversation);
    let session = GameSession::open(&args.game, Some(&conversation_ref), true)?;
    let conversation = session.open_conversation(&conversation_ref)?;
    let audio_enabled = args
        .audio_override()
        .unwrap_or(session.settings.play_audio);
    let audio: Box<dyn AudioSink> =
        match PlayerCommand::parse(session.settings.audio_player.as_deref()) {
            Some(player) => Box::new(AudioServer::start(player)),
            None => Box::new(SilentAudio),
        };

    let mut explorer = Explorer::new(conversation, &session, audio, audio_enabled)?;
    if line_mode {
        run_explore_line_mode(&mut explorer)
    } else {
        crate::tui::run_tui_ratatui_mode(&mut explorer)
    }
}

pub(crate) fn run_show(args: ShowArgs) -> Result<i32, CliError> {
    init_logging(LogTarget::Stderr)?;
    let conversation_ref = ConversationRef::parse(&args.conversation);
    let session = GameSession::open(&args.game, Some(&conversation_ref), true)?;
    let conversation = session.open_conversation(&conversation_ref)?;
    let view = NodeView::build(&conversation, &Link::new(-1, args.node), &|tag, node_id| {
        session.has_vocalization(tag, node_id)
    })?;
    write_node_view(&view, args.json, &mut io::stdout())?;
    Ok(0)
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<i32, CliError> {
    init_logging(LogTarget::Stderr)?;
    let session = GameSession::open(&args.game, None, false)?;
    let report = validate_all(&session.locator, &session.locale)?;
    write_validation_report(&report, args.json, &mut io::stdout())?;
    Ok(0)
}

pub(crate) fn write_node_view(
    view: &NodeView,
    json: bool,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    if json {
        let payload = serde_json::to_string_pretty(view).map_err(map_json)?;
        writeln!(writer, "{}", payload).map_err(map_stdout_io)?;
        return Ok(());
    }
    for line in view.lines() {
        writeln!(writer, "{}", line).map_err(map_stdout_io)?;
    }
    Ok(())
}

pub(crate) fn write_validation_report(
    report: &ValidationReport,
    json: bool,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    if json {
        let payload = serde_json::to_string_pretty(report).map_err(map_json)?;
        writeln!(writer, "{}", payload).map_err(map_stdout_io)?;
        return Ok(());
    }
    writeln!(writer, "total conversation files: {}", report.total).map_err(map_stdout_io)?;
    writeln!(
        writer,
        "files without stringtable: {}",
        report.missing_string_tables
    )
    .map_err(map_stdout_io)?;
    writeln!(writer, "unparsable files: {}", report.unparsable).map_err(map_stdout_io)?;
    for failure in &report.failures {
        writeln!(
            writer,
            "  [{}] {}",
            failure.code, failure.message
        )
        .map_err(map_stdout_io)?;
    }
    Ok(())
}
