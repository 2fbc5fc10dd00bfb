use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dlg_parser::parse_xml_document;

use crate::{map_settings_invalid, map_settings_read, CliError};

pub(crate) const DEFAULT_SETTINGS_FILE: &str = "Settings.xml";
pub(crate) const DEFAULT_LOCALIZATION: &str = "en";

/// User preferences read from `Settings.xml`:
///
/// ```xml
/// <Settings>
///   <Entry key="GamePath" value="C:\Games\Pillars of Eternity" />
///   <Entry key="Localization" value="en" />
/// </Settings>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) game_path: Option<PathBuf>,
    pub(crate) localization: String,
    pub(crate) play_audio: bool,
    pub(crate) audio_player: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_path: None,
            localization: DEFAULT_LOCALIZATION.to_string(),
            play_audio: true,
            audio_player: None,
        }
    }
}

impl Settings {
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let source = fs::read_to_string(path).map_err(map_settings_read)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        parse_settings_xml(&source, base_dir)
    }
}

pub(crate) fn parse_settings_xml(source: &str, base_dir: &Path) -> Result<Settings, CliError> {
    let document = parse_xml_document(source).map_err(map_settings_invalid)?;
    if document.root.name != "Settings" {
        return Err(CliError::new(
            "CLI_SETTINGS_INVALID",
            format!("expected <Settings> root, found <{}>.", document.root.name),
        ));
    }

    let entries = document
        .root
        .element_children()
        .filter(|child| child.name == "Entry")
        .filter_map(|entry| Some((entry.attr("key")?, entry.attr("value").unwrap_or_default())))
        .collect::<BTreeMap<_, _>>();

    let mut settings = Settings::default();
    if let Some(game_path) = entries.get("GamePath").filter(|value| !value.is_empty()) {
        let game_path = PathBuf::from(game_path);
        settings.game_path = Some(if game_path.is_absolute() {
            game_path
        } else {
            base_dir.join(game_path)
        });
    }
    if let Some(localization) = entries.get("Localization").filter(|value| !value.is_empty()) {
        settings.localization = localization.to_string();
    }
    if let Some(play_audio) = entries.get("PlayAudio") {
        settings.play_audio = parse_flag(play_audio)?;
    }
    if let Some(player) = entries.get("AudioPlayer").filter(|value| !value.trim().is_empty()) {
        settings.audio_player = Some(player.trim().to_string());
    }
    Ok(settings)
}

fn parse_flag(raw: &str) -> Result<bool, CliError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(CliError::new(
            "CLI_SETTINGS_INVALID",
            format!("PlayAudio expects true or false, found \"{}\".", raw),
        )),
    }
}
