use std::fs;
use std::path::Path;

use dlg_core::Conversation;
use dlg_parser::{parse_flowchart_xml, parse_string_table_xml};

use crate::error::LoadError;
use crate::locator::{file_stem, ResourceLocator};

pub fn load_conversation_by_path(
    locator: &ResourceLocator,
    path: &Path,
    locale: &str,
) -> Result<Conversation, LoadError> {
    let tag = file_stem(path).unwrap_or_default();
    let source = read_file(path)?;
    let flowchart = parse_flowchart_xml(&source).map_err(|source| LoadError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    let table_path = locator
        .find_string_table_by_path(path, locale)?
        .ok_or_else(|| LoadError::StringTableNotFound {
            tag: tag.clone(),
            locale: locale.to_string(),
        })?;
    let table_source = read_file(&table_path)?;
    let string_table =
        parse_string_table_xml(&table_source).map_err(|source| LoadError::Document {
            path: table_path.clone(),
            source,
        })?;

    tracing::debug!(
        tag = %tag,
        nodes = flowchart.len(),
        entries = string_table.len(),
        "loaded conversation"
    );
    Ok(Conversation::new(tag, flowchart, string_table))
}

/// Looks a conversation up by tag (file stem) anywhere under the game's
/// conversation directory.
pub fn load_conversation(
    locator: &ResourceLocator,
    tag: &str,
    locale: &str,
) -> Result<Conversation, LoadError> {
    let path = locator
        .find_conversation(tag)?
        .ok_or_else(|| LoadError::ConversationNotFound {
            tag: tag.to_string(),
        })?;
    load_conversation_by_path(locator, &path, locale)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
