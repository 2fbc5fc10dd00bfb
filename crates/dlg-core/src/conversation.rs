use crate::error::DlgError;
use crate::flowchart::{FlowChart, FlowChartNode};
use crate::string_table::{StringTable, StringTableEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    tag: String,
    flowchart: FlowChart,
    string_table: StringTable,
}

impl Conversation {
    pub fn new(tag: impl Into<String>, flowchart: FlowChart, string_table: StringTable) -> Self {
        Self {
            tag: tag.into(),
            flowchart,
            string_table,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn flowchart(&self) -> &FlowChart {
        &self.flowchart
    }

    pub fn string_table(&self) -> &StringTable {
        &self.string_table
    }

    pub fn find_node(&self, node_id: i32) -> Option<&FlowChartNode> {
        self.flowchart.find_node(node_id)
    }

    pub fn get_node(&self, node_id: i32) -> Result<&FlowChartNode, DlgError> {
        self.flowchart.get_node(node_id)
    }

    pub fn find_text(&self, node_id: i32) -> Option<&StringTableEntry> {
        self.string_table.find(node_id)
    }

    pub fn trigger_target_tag(&self, node: &FlowChartNode) -> Option<String> {
        node.trigger_target().map(|(tag, _)| tag)
    }
}
