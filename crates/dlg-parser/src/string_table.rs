use dlg_core::{DlgError, StringTable, StringTableEntry};

use crate::xml::{parse_xml_document, XmlElementNode};

const STRING_TABLE_ROOT: &str = "StringTableFile";

pub fn parse_string_table_xml(source: &str) -> Result<StringTable, DlgError> {
    let document = parse_xml_document(source)?;
    let root = &document.root;
    if root.name != STRING_TABLE_ROOT {
        return Err(DlgError::malformed_document(format!(
            "expected <{}> root, found <{}>.",
            STRING_TABLE_ROOT, root.name
        )));
    }

    let entries = root
        .list("Entries")
        .into_iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    StringTable::new(
        root.child_text("Name").unwrap_or_default(),
        root.value_or("NextEntryID", 0)?,
        root.required_value("EntryCount")?,
        entries,
    )
}

fn parse_entry(element: &XmlElementNode) -> Result<StringTableEntry, DlgError> {
    Ok(StringTableEntry::new(
        element.required_value("ID")?,
        element.child_text("DefaultText").unwrap_or_default(),
        element.child_text("FemaleText"),
    ))
}
