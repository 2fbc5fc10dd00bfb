use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::LoadError;
use crate::vocalization::VocalizationIndex;

const DATA_SUBPATH: [&str; 2] = ["PillarsOfEternity_Data", "data"];
const CONVERSATION_EXTENSION: &str = "conversation";
const STRING_TABLE_EXTENSION: &str = "stringtable";
const AUDIO_EXTENSIONS: [&str; 2] = ["ogg", "wav"];

#[derive(Debug, Clone)]
pub struct ResourceLocator {
    game_dir: PathBuf,
    vocalizations: VocalizationIndex,
}

impl ResourceLocator {
    /// Accepts the game root or any path inside its data directory.
    pub fn new(game_path: &Path) -> Result<Self, LoadError> {
        let mut locator = Self::without_audio(game_path)?;
        locator.vocalizations = index_vocalizations(&locator.vocalization_dir())?;
        tracing::debug!(
            game_dir = %locator.game_dir.display(),
            conversations = locator.vocalizations.conversation_count(),
            "indexed vocalization files"
        );
        Ok(locator)
    }

    /// Same as [`ResourceLocator::new`] but skips the voice-over scan.
    pub fn without_audio(game_path: &Path) -> Result<Self, LoadError> {
        let game_dir = resolve_game_dir(game_path);
        let data_dir = data_dir_of(&game_dir);
        if !data_dir.is_dir() {
            return Err(LoadError::InvalidGameDir { path: game_dir });
        }
        let game_dir = fs::canonicalize(&game_dir).map_err(|source| LoadError::Io {
            path: game_dir.clone(),
            source,
        })?;

        Ok(Self {
            game_dir,
            vocalizations: VocalizationIndex::default(),
        })
    }

    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        data_dir_of(&self.game_dir)
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.data_dir().join("conversations")
    }

    pub fn localized_conversations_dir(&self, locale: &str) -> PathBuf {
        self.data_dir()
            .join("localized")
            .join(locale)
            .join("text")
            .join("conversations")
    }

    pub fn vocalization_dir(&self) -> PathBuf {
        self.data_dir()
            .join("audio")
            .join("vocalization")
            .join("vo wav files")
    }

    pub fn find_all_conversations(&self) -> Result<Vec<PathBuf>, LoadError> {
        let dir = self.conversations_dir();
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|source| LoadError::Scan {
                path: dir.clone(),
                source,
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), CONVERSATION_EXTENSION) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    pub fn find_conversation(&self, tag: &str) -> Result<Option<PathBuf>, LoadError> {
        find_file(
            &self.conversations_dir(),
            &format!("{}.{}", tag, CONVERSATION_EXTENSION),
        )
    }

    pub fn find_string_table(&self, tag: &str, locale: &str) -> Result<Option<PathBuf>, LoadError> {
        find_file(
            &self.localized_conversations_dir(locale),
            &format!("{}.{}", tag, STRING_TABLE_EXTENSION),
        )
    }

    /// Mirrors the conversation's sub-path into the localized text tree.
    pub fn find_string_table_by_path(
        &self,
        conversation_file: &Path,
        locale: &str,
    ) -> Result<Option<PathBuf>, LoadError> {
        let absolute =
            fs::canonicalize(conversation_file).unwrap_or_else(|_| conversation_file.to_path_buf());
        if let Ok(relative) = absolute.strip_prefix(self.conversations_dir()) {
            let candidate = self
                .localized_conversations_dir(locale)
                .join(relative)
                .with_extension(STRING_TABLE_EXTENSION);
            return Ok(candidate.is_file().then_some(candidate));
        }

        let Some(tag) = file_stem(conversation_file) else {
            return Ok(None);
        };
        tracing::debug!(
            path = %conversation_file.display(),
            "conversation lies outside the game dir, searching string table by tag"
        );
        self.find_string_table(&tag, locale)
    }

    pub fn find_vocalization(&self, tag: &str, node_id: i32, variant: &str) -> Option<&Path> {
        self.vocalizations.find(tag, node_id)?.find_variant(variant)
    }

    pub fn has_vocalization(&self, tag: &str, node_id: i32) -> bool {
        self.find_vocalization(tag, node_id, "").is_some()
    }
}

fn resolve_game_dir(game_path: &Path) -> PathBuf {
    let data_suffix = DATA_SUBPATH.iter().collect::<PathBuf>();
    game_path
        .ancestors()
        .find(|ancestor| ancestor.ends_with(&data_suffix))
        .and_then(|data_dir| data_dir.parent()?.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| game_path.to_path_buf())
}

fn data_dir_of(game_dir: &Path) -> PathBuf {
    DATA_SUBPATH
        .iter()
        .fold(game_dir.to_path_buf(), |path, part| path.join(part))
}

fn index_vocalizations(dir: &Path) -> Result<VocalizationIndex, LoadError> {
    let mut index = VocalizationIndex::default();
    if !dir.is_dir() {
        tracing::warn!(path = %dir.display(), "vocalization directory not found");
        return Ok(index);
    }

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file()
            || !AUDIO_EXTENSIONS
                .iter()
                .any(|extension| has_extension(entry.path(), extension))
        {
            continue;
        }
        let generic = entry
            .path()
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("generic"));
        if generic {
            continue;
        }
        let path = entry.into_path();
        if !index.insert(path.clone()) {
            tracing::trace!(path = %path.display(), "skipped vocalization file");
        }
    }
    Ok(index)
}

fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Ok(None);
    }
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(extension))
}

pub(crate) fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
