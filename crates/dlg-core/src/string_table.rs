use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DlgError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringTableEntry {
    pub id: i32,
    pub default_text: String,
    pub female_text: Option<String>,
}

impl StringTableEntry {
    pub fn new(id: i32, default_text: impl Into<String>, female_text: Option<String>) -> Self {
        Self {
            id,
            default_text: default_text.into(),
            female_text: female_text.filter(|text| !text.is_empty()),
        }
    }

    pub fn format(&self) -> String {
        match &self.female_text {
            Some(female) => format!("{} / fem: {}", self.default_text, female),
            None => self.default_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringTable {
    name: String,
    next_entry_id: i32,
    entries: BTreeMap<i32, StringTableEntry>,
}

impl StringTable {
    pub fn new(
        name: impl Into<String>,
        next_entry_id: i32,
        declared_count: usize,
        entries: Vec<StringTableEntry>,
    ) -> Result<Self, DlgError> {
        if declared_count != entries.len() {
            return Err(DlgError::EntryCountMismatch {
                declared: declared_count,
                actual: entries.len(),
            });
        }

        let mut by_id = BTreeMap::new();
        for entry in entries {
            let id = entry.id;
            if by_id.insert(id, entry).is_some() {
                return Err(DlgError::DuplicateEntryId { id });
            }
        }

        Ok(Self {
            name: name.into(),
            next_entry_id,
            entries: by_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next_entry_id(&self) -> i32 {
        self.next_entry_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: i32) -> Option<&StringTableEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &StringTableEntry> {
        self.entries.values()
    }
}
