use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dlg_core::{
    Conversation, DialogueAttributes, FlowChart, FlowChartNode, Link, NodeKind, StringTable,
    StringTableEntry,
};

use crate::audio::AudioSink;
use crate::session::ConversationLoader;
use crate::CliError;

pub(crate) fn talk(id: i32, targets: &[i32]) -> FlowChartNode {
    let mut node = FlowChartNode::new(
        id,
        NodeKind::Talk {
            dialogue: DialogueAttributes::default(),
            speaker_guid: String::new(),
            listener_guid: String::new(),
            actor_direction: String::new(),
        },
    );
    node.links = targets.iter().map(|to| Link::new(id, *to)).collect();
    node
}

pub(crate) fn response(id: i32, targets: &[i32]) -> FlowChartNode {
    let mut node = talk(id, targets);
    node.kind = NodeKind::PlayerResponse {
        dialogue: DialogueAttributes::default(),
    };
    node
}

pub(crate) fn trigger(id: i32, filename: &str, start: i32) -> FlowChartNode {
    let mut node = talk(id, &[]);
    node.kind = NodeKind::TriggerConversation {
        dialogue: DialogueAttributes::default(),
        conversation_filename: filename.to_string(),
        start_node_id: start,
    };
    node
}

/// Every node gets the text `line <id>`.
pub(crate) fn conversation(tag: &str, nodes: Vec<FlowChartNode>) -> Conversation {
    let entries = nodes
        .iter()
        .map(|node| StringTableEntry::new(node.id, format!("line {}", node.id), None))
        .collect::<Vec<_>>();
    let count = entries.len();
    Conversation::new(
        tag,
        FlowChart::new(nodes.len() as i32, nodes).expect("flowchart"),
        StringTable::new(tag, count as i32, count, entries).expect("table"),
    )
}

/// In-memory conversations; `voiced` lists `(tag, node id)` pairs that have
/// a voice-over file.
#[derive(Default)]
pub(crate) struct MapLoader {
    pub(crate) conversations: BTreeMap<String, Conversation>,
    pub(crate) voiced: Vec<(String, i32)>,
}

impl MapLoader {
    pub(crate) fn with(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: conversations
                .into_iter()
                .map(|conversation| (conversation.tag().to_string(), conversation))
                .collect(),
            voiced: Vec::new(),
        }
    }
}

impl ConversationLoader for MapLoader {
    fn load(&self, tag: &str) -> Result<Conversation, CliError> {
        self.conversations
            .get(tag)
            .cloned()
            .ok_or_else(|| CliError::new("CONVERSATION_NOT_FOUND", tag.to_string()))
    }

    fn vocalization(&self, tag: &str, node_id: i32) -> Option<PathBuf> {
        self.voiced
            .iter()
            .any(|(voiced_tag, voiced_id)| voiced_tag == tag && *voiced_id == node_id)
            .then(|| PathBuf::from(format!("{}_{:04}.ogg", tag, node_id)))
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingAudio {
    pub(crate) log: Rc<RefCell<Vec<String>>>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, file: &Path) {
        self.log.borrow_mut().push(format!("play {}", file.display()));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push("stop".to_string());
    }
}
