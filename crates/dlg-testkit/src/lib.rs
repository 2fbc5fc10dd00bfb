use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures")
}

pub fn game_dir() -> PathBuf {
    fixtures_root().join("game")
}

pub fn data_dir() -> PathBuf {
    game_dir().join("PillarsOfEternity_Data").join("data")
}

pub fn conversation_path(relative: &str) -> PathBuf {
    data_dir().join("conversations").join(relative)
}

pub fn settings_path() -> PathBuf {
    fixtures_root().join("Settings.xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn game_dir_has_data_directory() {
        assert!(data_dir().is_dir());
    }

    #[test]
    fn conversation_path_joins_relative_path() {
        let path = conversation_path("test/test_intro.conversation");
        assert!(path.is_file());
    }

    #[test]
    fn settings_fixture_exists() {
        assert!(settings_path().is_file());
    }
}
