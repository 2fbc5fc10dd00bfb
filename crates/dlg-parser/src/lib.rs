pub mod conversation;
pub mod string_table;
pub mod xml;

pub use conversation::{parse_conversation_xml, parse_flowchart_xml, ConversationDocument};
pub use string_table::parse_string_table_xml;
pub use xml::{parse_xml_document, XmlDocument, XmlElementNode, XmlNode};
