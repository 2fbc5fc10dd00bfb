use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dlg-explorer")]
#[command(about = "Walk Pillars of Eternity conversation graphs in the terminal")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Interactive traversal with rewind.
    Explore(ExploreArgs),
    /// Print one node and its options, then exit.
    Show(ShowArgs),
    /// Load every conversation of the game and report failures.
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct GameArgs {
    #[arg(long = "game-dir")]
    pub(crate) game_dir: Option<String>,
    #[arg(long = "locale")]
    pub(crate) locale: Option<String>,
    #[arg(long = "settings")]
    pub(crate) settings: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ExploreArgs {
    /// Path to a `.conversation` file, or a conversation tag.
    pub(crate) conversation: String,
    #[command(flatten)]
    pub(crate) game: GameArgs,
    #[arg(long = "audio", conflicts_with = "no_audio")]
    pub(crate) audio: bool,
    #[arg(long = "no-audio")]
    pub(crate) no_audio: bool,
    #[arg(long = "line-mode")]
    pub(crate) line_mode: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    pub(crate) conversation: String,
    #[command(flatten)]
    pub(crate) game: GameArgs,
    #[arg(long = "node", default_value_t = 0)]
    pub(crate) node: i32,
    #[arg(long = "json")]
    pub(crate) json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub(crate) game: GameArgs,
    #[arg(long = "json")]
    pub(crate) json: bool,
}

impl ExploreArgs {
    pub(crate) fn audio_override(&self) -> Option<bool> {
        match (self.audio, self.no_audio) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
