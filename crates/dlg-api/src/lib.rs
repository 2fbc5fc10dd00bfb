mod error;
mod loader;
mod locator;
mod validate;
mod vocalization;

pub use error::LoadError;
pub use loader::{load_conversation, load_conversation_by_path};
pub use locator::ResourceLocator;
pub use validate::{validate_all, ValidationFailure, ValidationReport};
pub use vocalization::{
    parse_vocalization_file_name, Vocalization, VocalizationIndex, VocalizationName,
};
