use std::path::PathBuf;

use dlg_core::DlgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid game dir: {path}")]
    InvalidGameDir { path: PathBuf },
    #[error("Conversation {tag} file not found.")]
    ConversationNotFound { tag: String },
    #[error("String table file not found for conversation {tag} ({locale}).")]
    StringTableNotFound { tag: String, locale: String },
    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("{path}: {source}")]
    Document { path: PathBuf, source: DlgError },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidGameDir { .. } => "INVALID_GAME_DIR",
            Self::ConversationNotFound { .. } => "CONVERSATION_NOT_FOUND",
            Self::StringTableNotFound { .. } => "STRING_TABLE_NOT_FOUND",
            Self::Io { .. } => "IO",
            Self::Scan { .. } => "SCAN",
            Self::Document { source, .. } => source.code(),
        }
    }
}
