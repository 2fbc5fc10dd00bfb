use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Voice-over file name split into its parts:
/// `<conversation tag>_<NNNN>[_<variant>].<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocalizationName {
    pub conversation_tag: String,
    pub node_id: i32,
    pub variant: String,
}

/// The node id is the right-most `_`-prefixed group of four digits; anything
/// after it (minus the extension) is the variant.
pub fn parse_vocalization_file_name(file_name: &str) -> Option<VocalizationName> {
    let bytes = file_name.as_bytes();
    let mut index = file_name.rfind('_');
    let mut suffix_start = None;

    while let Some(found) = index {
        if is_node_id(bytes, found + 1) {
            break;
        }
        suffix_start = Some(found + 1);
        index = file_name[..found].rfind('_');
    }

    let index = index?;
    let node_id = file_name[index + 1..index + 5].parse().ok()?;
    let variant = match suffix_start {
        Some(start) => {
            let suffix = &file_name[start..];
            match suffix.rfind('.') {
                Some(dot) => suffix[..dot].to_string(),
                None => suffix.to_string(),
            }
        }
        None => String::new(),
    };

    Some(VocalizationName {
        conversation_tag: file_name[..index].to_string(),
        node_id,
        variant,
    })
}

fn is_node_id(bytes: &[u8], start: usize) -> bool {
    start + 3 < bytes.len() && bytes[start..start + 4].iter().all(u8::is_ascii_digit)
}

/// Every recorded take of one node's line, keyed by variant (`""` is the
/// main take).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocalization {
    variants: BTreeMap<String, PathBuf>,
}

impl Vocalization {
    pub fn find_variant(&self, variant: &str) -> Option<&Path> {
        self.variants.get(variant).map(PathBuf::as_path)
    }

    /// Returns false when the variant is already known.
    pub fn add_variant(&mut self, variant: String, file: PathBuf) -> bool {
        if self.variants.contains_key(&variant) {
            return false;
        }
        self.variants.insert(variant, file);
        true
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VocalizationIndex {
    by_conversation: BTreeMap<String, BTreeMap<i32, Vocalization>>,
}

impl VocalizationIndex {
    /// Registers a file. Returns false for unrecognized names and duplicates.
    pub fn insert(&mut self, file: PathBuf) -> bool {
        let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let Some(name) = parse_vocalization_file_name(file_name) else {
            return false;
        };
        self.by_conversation
            .entry(name.conversation_tag)
            .or_default()
            .entry(name.node_id)
            .or_default()
            .add_variant(name.variant, file)
    }

    pub fn find(&self, conversation_tag: &str, node_id: i32) -> Option<&Vocalization> {
        self.by_conversation.get(conversation_tag)?.get(&node_id)
    }

    pub fn conversation_count(&self) -> usize {
        self.by_conversation.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_take() {
        let name = parse_vocalization_file_name("cv_durance_0012.ogg").expect("name");
        assert_eq!(
            name,
            VocalizationName {
                conversation_tag: "cv_durance".to_string(),
                node_id: 12,
                variant: String::new(),
            }
        );
    }

    #[test]
    fn parses_variant_suffix() {
        let name = parse_vocalization_file_name("cv_durance_0012_angry_v2.ogg").expect("name");
        assert_eq!(name.conversation_tag, "cv_durance");
        assert_eq!(name.node_id, 12);
        assert_eq!(name.variant, "angry_v2");
    }

    #[test]
    fn tag_may_contain_digit_groups() {
        let name = parse_vocalization_file_name("05_cv_0001_0003.ogg").expect("name");
        assert_eq!(name.conversation_tag, "05_cv_0001");
        assert_eq!(name.node_id, 3);
    }

    #[test]
    fn rejects_names_without_node_id() {
        assert!(parse_vocalization_file_name("ambient_wind.ogg").is_none());
        assert!(parse_vocalization_file_name("cv_12.ogg").is_none());
        assert!(parse_vocalization_file_name("nounderscore.ogg").is_none());
    }

    #[test]
    fn index_skips_duplicate_variants() {
        let mut index = VocalizationIndex::default();
        assert!(index.insert(PathBuf::from("a/cv_x_0001.ogg")));
        assert!(!index.insert(PathBuf::from("b/cv_x_0001.ogg")));
        assert!(index.insert(PathBuf::from("b/cv_x_0001_v2.ogg")));
        assert!(!index.insert(PathBuf::from("b/music.ogg")));

        let takes = index.find("cv_x", 1).expect("node 1");
        assert_eq!(takes.find_variant(""), Some(Path::new("a/cv_x_0001.ogg")));
        assert_eq!(takes.variants().collect::<Vec<_>>(), vec!["", "v2"]);
        assert!(index.find("cv_x", 2).is_none());
        assert_eq!(index.conversation_count(), 1);
    }
}
