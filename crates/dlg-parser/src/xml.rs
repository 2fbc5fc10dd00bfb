use std::collections::BTreeMap;
use std::str::FromStr;

use dlg_core::DlgError;
use roxmltree::{Document, Node, NodeType};

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElementNode),
    Text(String),
}

/// Owned element tree. Attribute keys are local names, so `xsi:type` is
/// stored as `type`.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
    pub line: u32,
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, DlgError> {
    let document = Document::parse(source.trim_start_matches('\u{feff}'))
        .map_err(|error| DlgError::malformed_document(error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(DlgError::malformed_document(
            "XML document must contain a root element.",
        ));
    };

    Ok(XmlDocument {
        root: parse_element(&document, root),
    })
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let mut attributes = BTreeMap::new();
    for attribute in node.attributes() {
        attributes.insert(attribute.name().to_string(), attribute.value().to_string());
    }

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(parse_element(document, child))),
            NodeType::Text => {
                let value = child.text().unwrap_or_default();
                if !value.is_empty() {
                    children.push(XmlNode::Text(value.to_string()));
                }
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        line: document.text_pos_at(node.range().start).row,
    }
}

impl XmlElementNode {
    pub fn element_children(&self) -> impl Iterator<Item = &XmlElementNode> {
        self.children.iter().filter_map(|entry| match entry {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElementNode> {
        self.element_children().find(|element| element.name == name)
    }

    pub fn required_child(&self, name: &str) -> Result<&XmlElementNode, DlgError> {
        self.child(name).ok_or_else(|| {
            DlgError::malformed_document(format!(
                "line {}: <{}> is missing <{}>.",
                self.line, self.name, name
            ))
        })
    }

    /// Element children of the named list element; absent list means empty.
    pub fn list(&self, name: &str) -> Vec<&XmlElementNode> {
        self.child(name)
            .map(|list| list.element_children().collect())
            .unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn xsi_type(&self) -> Option<&str> {
        self.attr("type")
    }

    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|entry| match entry {
                XmlNode::Text(value) => Some(value.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(XmlElementNode::text)
    }

    pub fn required_value<T: FromStr>(&self, name: &str) -> Result<T, DlgError> {
        let child = self.required_child(name)?;
        child.value()
    }

    pub fn value_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, DlgError> {
        match self.child(name) {
            Some(child) => child.value(),
            None => Ok(default),
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, DlgError> {
        let Some(child) = self.child(name) else {
            return Ok(default);
        };
        let raw = child.text();
        match raw.trim() {
            value if value.eq_ignore_ascii_case("true") => Ok(true),
            value if value.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(child.invalid_value(&raw)),
        }
    }

    /// Parses an exporter enum, falling back to `default` when the element is
    /// absent.
    pub fn enum_or<T>(
        &self,
        name: &str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, DlgError> {
        let Some(child) = self.child(name) else {
            return Ok(default);
        };
        let raw = child.text();
        parse(raw.trim()).ok_or_else(|| child.invalid_value(&raw))
    }

    pub fn value<T: FromStr>(&self) -> Result<T, DlgError> {
        let raw = self.text();
        raw.trim().parse().map_err(|_| self.invalid_value(&raw))
    }

    pub fn invalid_value(&self, raw: &str) -> DlgError {
        DlgError::malformed_document(format!(
            "line {}: invalid value \"{}\" in <{}>.",
            self.line, raw, self.name
        ))
    }
}
