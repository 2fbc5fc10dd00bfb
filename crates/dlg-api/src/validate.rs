use std::path::PathBuf;

use serde::Serialize;

use crate::error::LoadError;
use crate::loader::load_conversation_by_path;
use crate::locator::ResourceLocator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub path: PathBuf,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total: usize,
    pub missing_string_tables: usize,
    pub unparsable: usize,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.missing_string_tables == 0 && self.unparsable == 0
    }
}

/// Loads every conversation and resolves its links. Individual failures are
/// recorded and never stop the run.
pub fn validate_all(locator: &ResourceLocator, locale: &str) -> Result<ValidationReport, LoadError> {
    let files = locator.find_all_conversations()?;
    let mut report = ValidationReport {
        total: files.len(),
        ..ValidationReport::default()
    };

    for path in files {
        let outcome = load_conversation_by_path(locator, &path, locale).and_then(|conversation| {
            conversation
                .flowchart()
                .validate_links()
                .map_err(|source| LoadError::Document {
                    path: path.clone(),
                    source,
                })
        });

        match outcome {
            Ok(()) => {}
            Err(LoadError::StringTableNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "no string table");
                report.missing_string_tables += 1;
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), code = error.code(), "{}", error);
                report.unparsable += 1;
                report.failures.push(ValidationFailure {
                    path,
                    code: error.code().to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_fixture_game() {
        let locator = ResourceLocator::new(&dlg_testkit::game_dir()).expect("fixture game dir");
        let report = validate_all(&locator, "en").expect("validate");

        assert_eq!(report.total, 4);
        assert_eq!(report.missing_string_tables, 1);
        assert_eq!(report.unparsable, 1);
        assert!(!report.is_clean());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "UNSUPPORTED_NODE_TYPE");
        assert!(report.failures[0].path.ends_with("test_broken.conversation"));
    }

    #[test]
    fn unknown_locale_counts_every_file_as_missing_table() {
        let locator = ResourceLocator::new(&dlg_testkit::game_dir()).expect("fixture game dir");
        let report = validate_all(&locator, "xx").expect("validate");
        assert_eq!(report.total, 4);
        // the broken file fails before its table is looked up
        assert_eq!(report.missing_string_tables, 3);
        assert_eq!(report.unparsable, 1);
    }
}
