use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DlgError;
use crate::expression::Expression;
use crate::script_call::ScriptCall;

pub const ROOT_NODE_ID: i32 = 0;

macro_rules! exporter_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            pub fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $(stringify!($variant) => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

exporter_enum!(PlayType { Normal, Random, CycleLoop, CycleStop } default Normal);
exporter_enum!(Persistence { None, MarkAsRead, OncePerConversation, OnceEver } default None);
exporter_enum!(DisplayType { Hidden, Conversation, Bark } default Conversation);
exporter_enum!(QuestionDisplay { ShowOnce, ShowAlways, ShowNever } default ShowOnce);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub from_node_id: i32,
    pub to_node_id: i32,
    pub points_to_ghost: bool,
    pub random_weight: i32,
    pub question_node_text_display: QuestionDisplay,
    pub play_question_node_vo: bool,
}

impl Link {
    pub fn new(from_node_id: i32, to_node_id: i32) -> Self {
        Self {
            from_node_id,
            to_node_id,
            points_to_ghost: false,
            random_weight: 1,
            question_node_text_display: QuestionDisplay::ShowOnce,
            play_question_node_vo: true,
        }
    }

    pub fn brief(&self) -> String {
        let mut out = String::from("[ ");
        if self.points_to_ghost {
            out.push_str("PointsToGhost ");
        }
        if !self.play_question_node_vo {
            out.push_str("!PlayQuestionNodeVO ");
        }
        if self.random_weight != 1 {
            let _ = write!(out, "RandomWeight-{} ", self.random_weight);
        }
        if self.question_node_text_display != QuestionDisplay::ShowOnce {
            let _ = write!(out, "{} ", self.question_node_text_display.name());
        }
        out.push(']');
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueAttributes {
    pub is_question_node: bool,
    pub not_skippable: bool,
    pub is_temp_text: bool,
    pub play_vo_as_3d_sound: bool,
    pub play_type: PlayType,
    pub persistence: Persistence,
    pub no_play_random_weight: i32,
    pub display_type: DisplayType,
    pub vo_filename: String,
    pub voice_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Talk {
        dialogue: DialogueAttributes,
        speaker_guid: String,
        listener_guid: String,
        actor_direction: String,
    },
    PlayerResponse {
        dialogue: DialogueAttributes,
    },
    Script {
        dialogue: DialogueAttributes,
    },
    TriggerConversation {
        dialogue: DialogueAttributes,
        conversation_filename: String,
        start_node_id: i32,
    },
    Bank {
        child_node_ids: Vec<i32>,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Talk { .. } => "TalkNode",
            Self::PlayerResponse { .. } => "PlayerResponseNode",
            Self::Script { .. } => "ScriptNode",
            Self::TriggerConversation { .. } => "TriggerConversationNode",
            Self::Bank { .. } => "BankNode",
        }
    }

    pub fn dialogue(&self) -> Option<&DialogueAttributes> {
        match self {
            Self::Talk { dialogue, .. }
            | Self::PlayerResponse { dialogue }
            | Self::Script { dialogue }
            | Self::TriggerConversation { dialogue, .. } => Some(dialogue),
            Self::Bank { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowChartNode {
    pub id: i32,
    pub container_node_id: Option<i32>,
    pub comments: String,
    pub package_id: i32,
    pub links: Vec<Link>,
    pub conditionals: Expression,
    pub on_enter: Vec<ScriptCall>,
    pub on_exit: Vec<ScriptCall>,
    pub on_update: Vec<ScriptCall>,
    pub kind: NodeKind,
}

impl FlowChartNode {
    pub fn new(id: i32, kind: NodeKind) -> Self {
        Self {
            id,
            container_node_id: None,
            comments: String::new(),
            package_id: 0,
            links: Vec::new(),
            conditionals: Expression::always(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
            on_update: Vec::new(),
            kind,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_NODE_ID
    }

    pub fn is_player_response(&self) -> bool {
        matches!(self.kind, NodeKind::PlayerResponse { .. })
    }

    pub fn is_question_node(&self) -> bool {
        self.kind
            .dialogue()
            .is_some_and(|dialogue| dialogue.is_question_node)
    }

    pub fn child_node_ids(&self) -> &[i32] {
        match &self.kind {
            NodeKind::Bank { child_node_ids } => child_node_ids,
            _ => &[],
        }
    }

    pub fn trigger_target(&self) -> Option<(String, i32)> {
        match &self.kind {
            NodeKind::TriggerConversation {
                conversation_filename,
                start_node_id,
                ..
            } => Some((conversation_tag(conversation_filename), *start_node_id)),
            _ => None,
        }
    }

    pub fn brief(&self) -> String {
        let mut out = format!("[ node-{:02} ", self.id);
        match &self.kind {
            NodeKind::Bank { .. } => out.push_str("BankNode "),
            kind => {
                if let Some(dialogue) = kind.dialogue() {
                    extend_dialogue_brief(&mut out, kind, dialogue);
                }
            }
        }
        if let Some((tag, start_node_id)) = self.trigger_target() {
            let _ = write!(out, "node-{} {} ", start_node_id, tag);
        }
        out.push(']');
        out
    }
}

fn extend_dialogue_brief(out: &mut String, kind: &NodeKind, dialogue: &DialogueAttributes) {
    if dialogue.is_question_node {
        out.push_str("QuestionNode ");
    }
    if !matches!(kind, NodeKind::Talk { .. }) {
        let _ = write!(out, "{} ", kind.type_name());
    }
    if dialogue.display_type != DisplayType::Conversation {
        let _ = write!(out, "{} ", dialogue.display_type.name());
    }
    if dialogue.play_type != PlayType::Normal {
        let _ = write!(out, "{} ", dialogue.play_type.name());
    }
    if dialogue.persistence != Persistence::None {
        let _ = write!(out, "{} ", dialogue.persistence.name());
    }
    if dialogue.not_skippable {
        out.push_str("NotSkippable ");
    }
}

/// File stem of an exported conversation path, accepting either separator.
pub fn conversation_tag(filename: &str) -> String {
    let normalized = filename.replace('\\', "/");
    Path::new(&normalized)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowChart {
    next_node_id: i32,
    nodes: BTreeMap<i32, FlowChartNode>,
}

impl FlowChart {
    pub fn new(next_node_id: i32, nodes: Vec<FlowChartNode>) -> Result<Self, DlgError> {
        let mut by_id = BTreeMap::new();
        for node in nodes {
            let id = node.id;
            if by_id.insert(id, node).is_some() {
                return Err(DlgError::DuplicateNodeId { id });
            }
        }
        Ok(Self {
            next_node_id,
            nodes: by_id,
        })
    }

    pub fn next_node_id(&self) -> i32 {
        self.next_node_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_node(&self, id: i32) -> Option<&FlowChartNode> {
        self.nodes.get(&id)
    }

    pub fn get_node(&self, id: i32) -> Result<&FlowChartNode, DlgError> {
        self.find_node(id).ok_or(DlgError::UnknownNodeId { id })
    }

    pub fn root(&self) -> Result<&FlowChartNode, DlgError> {
        self.get_node(ROOT_NODE_ID)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.nodes.keys().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowChartNode> {
        self.nodes.values()
    }

    /// Dereferences every link target and bank child.
    pub fn validate_links(&self) -> Result<(), DlgError> {
        for node in self.nodes.values() {
            for link in &node.links {
                self.get_node(link.to_node_id)?;
            }
            for child in node.child_node_ids() {
                self.get_node(*child)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod flowchart_tests {
    use super::*;

    fn talk(id: i32) -> FlowChartNode {
        FlowChartNode::new(
            id,
            NodeKind::Talk {
                dialogue: DialogueAttributes::default(),
                speaker_guid: String::new(),
                listener_guid: String::new(),
                actor_direction: String::new(),
            },
        )
    }

    #[test]
    fn get_node_round_trips_every_id() {
        let ids = [0, 1, 2, 7, 42];
        let chart = FlowChart::new(43, ids.iter().map(|id| talk(*id)).collect())
            .expect("unique ids should build");
        assert_eq!(chart.len(), ids.len());
        for id in ids {
            assert_eq!(chart.get_node(id).unwrap().id, id);
        }
        assert_eq!(
            chart.get_node(3).expect_err("missing"),
            DlgError::UnknownNodeId { id: 3 }
        );
        assert!(chart.find_node(3).is_none());
        assert!(chart.root().unwrap().is_root());
        assert_eq!(chart.node_ids().collect::<Vec<_>>(), ids.to_vec());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error = FlowChart::new(3, vec![talk(0), talk(1), talk(1)]).expect_err("dup");
        assert_eq!(error, DlgError::DuplicateNodeId { id: 1 });
    }

    #[test]
    fn dangling_links_fail_validation() {
        let mut root = talk(0);
        root.links.push(Link::new(0, 9));
        let chart = FlowChart::new(1, vec![root]).expect("builds lazily");
        assert_eq!(
            chart.validate_links().expect_err("dangling"),
            DlgError::UnknownNodeId { id: 9 }
        );
    }

    #[test]
    fn node_brief_lists_non_default_flags() {
        assert_eq!(talk(3).brief(), "[ node-03 ]");

        let mut question = talk(12);
        if let NodeKind::Talk { dialogue, .. } = &mut question.kind {
            dialogue.is_question_node = true;
            dialogue.persistence = Persistence::OnceEver;
            dialogue.display_type = DisplayType::Bark;
            dialogue.play_type = PlayType::Random;
            dialogue.not_skippable = true;
        }
        assert_eq!(
            question.brief(),
            "[ node-12 QuestionNode Bark Random OnceEver NotSkippable ]"
        );

        let response = FlowChartNode::new(
            4,
            NodeKind::PlayerResponse {
                dialogue: DialogueAttributes::default(),
            },
        );
        assert_eq!(response.brief(), "[ node-04 PlayerResponseNode ]");

        let bank = FlowChartNode::new(
            5,
            NodeKind::Bank {
                child_node_ids: vec![6],
            },
        );
        assert_eq!(bank.brief(), "[ node-05 BankNode ]");
        assert_eq!(bank.child_node_ids(), &[6]);
    }

    #[test]
    fn trigger_brief_names_target() {
        let trigger = FlowChartNode::new(
            8,
            NodeKind::TriggerConversation {
                dialogue: DialogueAttributes::default(),
                conversation_filename: "Assets/Data/Conversations/05_cv_eder.conversation"
                    .to_string(),
                start_node_id: 3,
            },
        );
        assert_eq!(
            trigger.brief(),
            "[ node-08 TriggerConversationNode node-3 05_cv_eder ]"
        );
        assert_eq!(trigger.trigger_target(), Some(("05_cv_eder".to_string(), 3)));
        assert_eq!(conversation_tag(r"data\conversations\x.conversation"), "x");
    }

    #[test]
    fn link_brief_lists_non_default_flags() {
        assert_eq!(Link::new(0, 1).brief(), "[ ]");
        let link = Link {
            points_to_ghost: true,
            play_question_node_vo: false,
            random_weight: 3,
            question_node_text_display: QuestionDisplay::ShowNever,
            ..Link::new(0, 1)
        };
        assert_eq!(
            link.brief(),
            "[ PointsToGhost !PlayQuestionNodeVO RandomWeight-3 ShowNever ]"
        );
    }

    #[test]
    fn exporter_enums_parse_their_names() {
        assert_eq!(PlayType::parse("CycleLoop"), Some(PlayType::CycleLoop));
        assert_eq!(Persistence::parse("MarkAsRead"), Some(Persistence::MarkAsRead));
        assert_eq!(DisplayType::parse("Hidden"), Some(DisplayType::Hidden));
        assert_eq!(QuestionDisplay::parse("ShowAlways"), Some(QuestionDisplay::ShowAlways));
        assert_eq!(DisplayType::parse("Loud"), None);
        assert_eq!(DisplayType::default(), DisplayType::Conversation);
    }
}
