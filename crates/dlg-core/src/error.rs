use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DlgError {
    #[error("Duplicate node id {id}.")]
    DuplicateNodeId { id: i32 },
    #[error("Unknown node id {id}.")]
    UnknownNodeId { id: i32 },
    #[error("Declared entry count {declared} does not match {actual} supplied entries.")]
    EntryCountMismatch { declared: usize, actual: usize },
    #[error("Duplicate string table entry id {id}.")]
    DuplicateEntryId { id: i32 },
    #[error("Malformed call to {function}: {message}")]
    MalformedCall { function: String, message: String },
    #[error("Invalid reputation axis: \"{axis}\".")]
    InvalidAxis { axis: String },
    #[error("Unsupported node type: \"{type_name}\".")]
    UnsupportedNodeType { type_name: String },
    #[error("Link of node {expected} declares FromNodeID {found}.")]
    LinkSourceMismatch { expected: i32, found: i32 },
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },
}

impl DlgError {
    pub fn malformed_call(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCall {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn arity(function: &str, expected: usize) -> Self {
        let noun = if expected == 1 { "argument" } else { "arguments" };
        Self::malformed_call(function, format!("{} takes {} {}", function, expected, noun))
    }

    pub fn malformed_document(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateNodeId { .. } => "DUPLICATE_NODE_ID",
            Self::UnknownNodeId { .. } => "UNKNOWN_NODE_ID",
            Self::EntryCountMismatch { .. } => "ENTRY_COUNT_MISMATCH",
            Self::DuplicateEntryId { .. } => "DUPLICATE_ENTRY_ID",
            Self::MalformedCall { .. } => "MALFORMED_CALL",
            Self::InvalidAxis { .. } => "INVALID_AXIS",
            Self::UnsupportedNodeType { .. } => "UNSUPPORTED_NODE_TYPE",
            Self::LinkSourceMismatch { .. } => "LINK_SOURCE_MISMATCH",
            Self::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn arity_error_names_function_and_count() {
        let error = DlgError::arity("IsGlobalValue", 3);
        assert_eq!(error.code(), "MALFORMED_CALL");
        assert_eq!(
            error.to_string(),
            "Malformed call to IsGlobalValue: IsGlobalValue takes 3 arguments"
        );

        let single = DlgError::arity("IsPlayerBackground", 1);
        assert!(single.to_string().ends_with("takes 1 argument"));
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(DlgError::UnknownNodeId { id: 4 }.code(), "UNKNOWN_NODE_ID");
        assert_eq!(
            DlgError::InvalidAxis {
                axis: "Sideways".to_string()
            }
            .code(),
            "INVALID_AXIS"
        );
        assert_eq!(
            DlgError::malformed_document("x").code(),
            "MALFORMED_DOCUMENT"
        );
    }
}
