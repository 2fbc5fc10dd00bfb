use std::path::{Path, PathBuf};

use dlg_api::{load_conversation, load_conversation_by_path, ResourceLocator};
use dlg_core::Conversation;

use crate::settings::{Settings, DEFAULT_SETTINGS_FILE};
use crate::{CliError, GameArgs};

const CONVERSATION_SUFFIX: &str = ".conversation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConversationRef {
    Path(PathBuf),
    Tag(String),
}

impl ConversationRef {
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.to_ascii_lowercase().ends_with(CONVERSATION_SUFFIX) {
            Self::Path(PathBuf::from(raw))
        } else {
            Self::Tag(raw.to_string())
        }
    }
}

/// Loads conversations by tag while a traversal crosses trigger nodes, and
/// finds their voice-over files.
pub(crate) trait ConversationLoader {
    fn load(&self, tag: &str) -> Result<Conversation, CliError>;

    fn vocalization(&self, _tag: &str, _node_id: i32) -> Option<PathBuf> {
        None
    }

    fn has_vocalization(&self, tag: &str, node_id: i32) -> bool {
        self.vocalization(tag, node_id).is_some()
    }
}

#[derive(Debug)]
pub(crate) struct GameSession {
    pub(crate) locator: ResourceLocator,
    pub(crate) locale: String,
    pub(crate) settings: Settings,
}

impl GameSession {
    /// Precedence for the game directory: `--game-dir`, then the conversation
    /// path itself, then `GamePath` from the settings file.
    pub(crate) fn open(
        args: &GameArgs,
        conversation: Option<&ConversationRef>,
        with_audio: bool,
    ) -> Result<Self, CliError> {
        let settings_path = args
            .settings
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let settings = Settings::load(&settings_path)?;

        let game_path = args
            .game_dir
            .as_deref()
            .map(PathBuf::from)
            .or_else(|| match conversation {
                Some(ConversationRef::Path(path)) => Some(path.clone()),
                _ => None,
            })
            .or_else(|| settings.game_path.clone())
            .ok_or_else(|| {
                CliError::new(
                    "CLI_GAME_DIR_MISSING",
                    "No game directory: pass --game-dir or set GamePath in Settings.xml.",
                )
            })?;

        let locator = if with_audio {
            ResourceLocator::new(&game_path)?
        } else {
            ResourceLocator::without_audio(&game_path)?
        };
        let locale = args
            .locale
            .clone()
            .unwrap_or_else(|| settings.localization.clone());
        tracing::info!(
            game_dir = %locator.game_dir().display(),
            locale = %locale,
            "opened game"
        );

        Ok(Self {
            locator,
            locale,
            settings,
        })
    }

    pub(crate) fn open_conversation(
        &self,
        conversation: &ConversationRef,
    ) -> Result<Conversation, CliError> {
        match conversation {
            ConversationRef::Path(path) => self.load_path(path),
            ConversationRef::Tag(tag) => self.load(tag),
        }
    }

    fn load_path(&self, path: &Path) -> Result<Conversation, CliError> {
        if !path.is_file() {
            return Err(CliError::new(
                "CLI_CONVERSATION_NOT_FOUND",
                format!("Conversation file does not exist: {}", path.display()),
            ));
        }
        Ok(load_conversation_by_path(
            &self.locator,
            path,
            &self.locale,
        )?)
    }
}

impl ConversationLoader for GameSession {
    fn load(&self, tag: &str) -> Result<Conversation, CliError> {
        Ok(load_conversation(&self.locator, tag, &self.locale)?)
    }

    fn vocalization(&self, tag: &str, node_id: i32) -> Option<PathBuf> {
        self.locator
            .find_vocalization(tag, node_id, "")
            .map(Path::to_path_buf)
    }

    fn has_vocalization(&self, tag: &str, node_id: i32) -> bool {
        self.locator.has_vocalization(tag, node_id)
    }
}
