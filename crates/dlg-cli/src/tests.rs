use super::*;

use std::io::Cursor;

use dlg_api::{ValidationFailure, ValidationReport};
use dlg_core::Link;

use crate::commands::{write_node_view, write_validation_report};
use crate::explorer::Explorer;
use crate::line_tui::{prompt_input_from, run_explore_line_mode_with_io};
use crate::session::{ConversationLoader, ConversationRef, GameSession};
use crate::test_support::RecordingAudio;
use crate::view::NodeView;

fn fixture_session() -> GameSession {
    let args = GameArgs {
        game_dir: Some(dlg_testkit::game_dir().to_string_lossy().to_string()),
        locale: Some("en".to_string()),
        settings: Some("/definitely/missing/Settings.xml".to_string()),
    };
    GameSession::open(&args, None, true).expect("fixture session")
}

fn intro_view(session: &GameSession, link: Link) -> NodeView {
    let conversation = session
        .open_conversation(&ConversationRef::Tag("test_intro".to_string()))
        .expect("intro");
    NodeView::build(&conversation, &link, &|tag, node_id| {
        session.has_vocalization(tag, node_id)
    })
    .expect("view")
}

struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn render(view: &NodeView, json: bool) -> String {
    let mut out = Vec::new();
    write_node_view(view, json, &mut out).expect("write");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn invalid_arguments_return_clap_exit_code() {
    assert_eq!(run_cli_from_args(["dlg-explorer", "bogus"]), 2);
    assert_eq!(run_cli_from_args(["dlg-explorer", "show"]), 2);
}

#[test]
fn load_failures_are_emitted_as_errors() {
    let game = dlg_testkit::game_dir().to_string_lossy().to_string();
    let code = run_cli_from_args([
        "dlg-explorer",
        "show",
        "nope",
        "--game-dir",
        game.as_str(),
        "--settings",
        "/definitely/missing/Settings.xml",
    ]);
    assert_eq!(code, 1);
}

#[test]
fn root_view_of_fixture_matches_printed_layout() {
    let session = fixture_session();
    let text = render(&intro_view(&session, Link::new(-1, 0)), false);
    let expected = "\
[ node-00 QuestionNode ]
[audio] Well met, traveler. What brings you to the Copperlane?


(1) [ ] -> [ node-01 PlayerResponseNode ] -> [ node-04 OnceEver ]
  on enter  : bAskedWork = 1
I'm looking for work.

(2) [ ] -> [ node-02 PlayerResponseNode ] -> [ node-04 OnceEver ]
  if : Mercenary && !bAskedWork
I sold my sword in the last war. Need another buyer?

(3) [ ] -> [ node-03 PlayerResponseNode ] -> [ node-07 TriggerConversationNode node-0 test_market ]
Any news from the market?

(4) [ ] -> [ node-05 PlayerResponseNode ]
Farewell.

";
    assert_eq!(text, expected);
}

#[test]
fn bank_node_lists_children_and_json_view_serializes() {
    let session = fixture_session();
    let view = intro_view(&session, Link::new(4, 6));
    let text = render(&view, false);
    assert!(text.starts_with("[ node-06 BankNode ]\n"));
    assert!(text.contains("(1) [ child ] -> [ node-08 ]"));
    assert!(text.contains("(2) [ child ] -> [ node-09 ]"));

    let json: serde_json::Value =
        serde_json::from_str(&render(&view, true)).expect("valid json");
    assert_eq!(json["conversation"], "test_intro");
    assert_eq!(json["options"][1]["targetId"], 9);
    assert_eq!(json["options"][1]["linkBrief"], "[ child ]");
}

#[test]
fn validation_report_prints_totals_and_failures() {
    let report = ValidationReport {
        total: 4,
        missing_string_tables: 1,
        unparsable: 1,
        failures: vec![ValidationFailure {
            path: "x.conversation".into(),
            code: "UNSUPPORTED_NODE_TYPE".to_string(),
            message: "x.conversation: bad".to_string(),
        }],
    };
    let mut out = Vec::new();
    write_validation_report(&report, false, &mut out).expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "total conversation files: 4\nfiles without stringtable: 1\nunparsable files: 1\n  [UNSUPPORTED_NODE_TYPE] x.conversation: bad\n"
    );

    let mut out = Vec::new();
    write_validation_report(&report, true, &mut out).expect("write");
    let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
    assert_eq!(json["missingStringTables"], 1);
}

#[test]
fn line_mode_walks_fixture_across_conversations() {
    let session = fixture_session();
    let conversation = session
        .open_conversation(&ConversationRef::Tag("test_intro".to_string()))
        .expect("intro");
    let audio = RecordingAudio::default();
    let mut explorer =
        Explorer::new(conversation, &session, Box::new(audio.clone()), true).expect("explorer");

    let mut reader = Cursor::new("1\n2\n\n3\n\n-\na\nq\n");
    let mut output = Vec::new();
    let code = run_explore_line_mode_with_io(&mut explorer, &mut reader, &mut output)
        .expect("line mode");
    assert_eq!(code, 0);

    let text = String::from_utf8(output).expect("utf8");
    assert!(text.starts_with("[HOW-TO]\n\n0..9:      select a dialogue line\n"));
    assert!(text.contains("[ node-04 OnceEver ]\n[audio] Work, is it? The quartermaster pays well, friend. / fem: Work, is it? The quartermaster pays well, lass."));
    assert!(text.contains("(2) [ PointsToGhost ] -> [ node-00 QuestionNode ]"));
    assert!(text.contains("Valid range: 1 .. 4"));
    assert!(text.contains(view::END_TRIGGER_HINT));
    assert!(text.contains("[ node-00 ]\nFresh fish! Fresh bread!"));
    assert!(text.contains("audio off"));

    let log = audio.log.borrow();
    assert!(log[0].starts_with("play ") && log[0].ends_with("test_intro_0000.ogg"));
    assert!(log
        .iter()
        .any(|entry| entry.starts_with("play ") && entry.ends_with("test_intro_0004.ogg")));
    assert_eq!(log.last().map(String::as_str), Some("stop"));
}

#[test]
fn prompt_input_trims_newline_and_reports_eof() {
    let mut reader = Cursor::new("12\r\n");
    let mut writer = Vec::new();
    assert_eq!(
        prompt_input_from("> ", &mut reader, &mut writer).expect("line"),
        Some("12".to_string())
    );
    assert_eq!(
        prompt_input_from("> ", &mut reader, &mut writer).expect("eof"),
        None
    );
    assert_eq!(String::from_utf8(writer).expect("utf8"), "> > ");
}

#[test]
fn stdout_failures_are_reported_as_stdout_errors() {
    let session = fixture_session();
    let view = intro_view(&session, Link::new(-1, 0));
    let error = write_node_view(&view, false, &mut ClosedPipe).expect_err("closed pipe");
    assert_eq!(error.code, "CLI_STDOUT_IO");

    let error = write_validation_report(&ValidationReport::default(), true, &mut ClosedPipe)
        .expect_err("closed pipe");
    assert_eq!(error.code, "CLI_STDOUT_IO");

    let conversation = session
        .open_conversation(&ConversationRef::Tag("test_intro".to_string()))
        .expect("intro");
    let mut explorer = Explorer::new(
        conversation,
        &session,
        Box::new(RecordingAudio::default()),
        false,
    )
    .expect("explorer");
    let error = run_explore_line_mode_with_io(&mut explorer, &mut Cursor::new("q\n"), &mut ClosedPipe)
        .expect_err("closed pipe");
    assert_eq!(error.code, "CLI_STDOUT_IO");
}
