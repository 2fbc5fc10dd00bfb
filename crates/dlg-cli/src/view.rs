use dlg_core::{Conversation, FlowChartNode, Link, NodeKind};
use serde::Serialize;

use crate::traversal::{node_options, single_response_link};
use crate::CliError;

pub(crate) const END_TRIGGER_HINT: &str =
    "(End. Hit BACKSPACE to rewind or ENTER to load target conversation)";
pub(crate) const END_CONTAINER_HINT: &str = "(Hit BACKSPACE to rewind into container node)";
pub(crate) const END_HINT: &str = "(End. Hit BACKSPACE to rewind)";

pub(crate) const HOW_TO_LINES: [&str; 5] = [
    "0..9:      select a dialogue line",
    "ENTER:     commit when there are 10+ options",
    "BACKSPACE: rewind",
    "SPACE:     toggle audio",
    "ESC:       quit",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OptionView {
    pub(crate) number: usize,
    pub(crate) link_brief: String,
    pub(crate) target_id: i32,
    pub(crate) target_brief: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_brief: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) guard: Option<String>,
    pub(crate) on_enter: Vec<String>,
    pub(crate) on_exit: Vec<String>,
    pub(crate) on_update: Vec<String>,
    pub(crate) points_to_ghost: bool,
    pub(crate) has_audio: bool,
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NodeView {
    pub(crate) conversation: String,
    pub(crate) node_id: i32,
    /// Node whose brief and text are shown; the parent for a ghost link into
    /// a question node.
    pub(crate) shown_node_id: i32,
    pub(crate) brief: String,
    pub(crate) has_audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    pub(crate) options: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end_hint: Option<String>,
}

impl NodeView {
    pub(crate) fn build(
        conversation: &Conversation,
        link: &Link,
        has_audio: &dyn Fn(&str, i32) -> bool,
    ) -> Result<Self, CliError> {
        let node = conversation.get_node(link.to_node_id)?;
        let keep_parent_brief = link.points_to_ghost && node.is_question_node();
        let shown = if keep_parent_brief {
            conversation.get_node(link.from_node_id)?
        } else {
            node
        };
        let tag = conversation.tag();

        let options = node_options(node)
            .iter()
            .enumerate()
            .map(|(index, option)| build_option(conversation, index, option, node, has_audio))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            conversation: tag.to_string(),
            node_id: node.id,
            shown_node_id: shown.id,
            brief: shown.brief(),
            has_audio: has_audio(tag, shown.id),
            text: conversation.find_text(shown.id).map(|entry| entry.format()),
            end_hint: options.is_empty().then(|| end_hint(node).to_string()),
            options,
        })
    }

    /// Voice-over plays only for the node itself, never for a borrowed brief.
    pub(crate) fn autoplay_node(&self) -> Option<i32> {
        (self.has_audio && self.shown_node_id == self.node_id).then_some(self.node_id)
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let mut out = vec![self.brief.clone()];
        match (&self.text, self.has_audio) {
            (Some(text), true) => out.push(format!("[audio] {}", text)),
            (Some(text), false) => out.push(text.clone()),
            (None, true) => out.push("[audio]".to_string()),
            (None, false) => {}
        }
        out.extend([String::new(), String::new()]);

        if let Some(hint) = &self.end_hint {
            out.push(hint.clone());
            return out;
        }

        let single = self.options.len() == 1;
        for option in &self.options {
            let mut header = format!(
                "({}) {} -> {}",
                option.number, option.link_brief, option.target_brief
            );
            if let Some(next) = &option.next_brief {
                header.push_str(" -> ");
                header.push_str(next);
            }
            out.push(header);
            if let Some(guard) = &option.guard {
                out.push(format!("  if : {}", guard));
            }
            out.extend(option.on_enter.iter().map(|s| format!("  on enter  : {}", s)));
            out.extend(option.on_exit.iter().map(|s| format!("  on exit   : {}", s)));
            out.extend(option.on_update.iter().map(|s| format!("  on update : {}", s)));
            if single {
                out.push("[continue]".to_string());
            } else if option.has_audio {
                out.push(format!("[audio] {}", option.text));
            } else {
                out.push(option.text.clone());
            }
            out.push(String::new());
        }
        out
    }
}

fn build_option(
    conversation: &Conversation,
    index: usize,
    option: &Link,
    node: &FlowChartNode,
    has_audio: &dyn Fn(&str, i32) -> bool,
) -> Result<OptionView, CliError> {
    let bank_child = index >= node.links.len();
    let link_brief = if bank_child {
        "[ child ]".to_string()
    } else {
        option.brief()
    };
    let target = if option.points_to_ghost {
        match conversation.find_node(option.to_node_id) {
            Some(target) => target,
            None => return Ok(missing_option(index, option, link_brief)),
        }
    } else {
        conversation.get_node(option.to_node_id)?
    };
    let next_brief = match single_response_link(target) {
        Some(next) => Some(conversation.get_node(next.to_node_id)?.brief()),
        None => None,
    };
    let guard = target.conditionals.format_guard()?;
    let format_all = |scripts: &[dlg_core::ScriptCall]| {
        scripts
            .iter()
            .map(|script| script.format())
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(OptionView {
        number: index + 1,
        link_brief,
        target_id: target.id,
        target_brief: target.brief(),
        next_brief,
        guard: (!guard.is_empty()).then_some(guard),
        on_enter: format_all(&target.on_enter)?,
        on_exit: format_all(&target.on_exit)?,
        on_update: format_all(&target.on_update)?,
        points_to_ghost: option.points_to_ghost,
        has_audio: has_audio(conversation.tag(), target.id),
        text: conversation
            .find_text(target.id)
            .map(|entry| entry.format())
            .unwrap_or_default(),
    })
}

fn missing_option(index: usize, option: &Link, link_brief: String) -> OptionView {
    OptionView {
        number: index + 1,
        link_brief,
        target_id: option.to_node_id,
        target_brief: missing_brief(option.to_node_id),
        next_brief: None,
        guard: None,
        on_enter: Vec::new(),
        on_exit: Vec::new(),
        on_update: Vec::new(),
        points_to_ghost: option.points_to_ghost,
        has_audio: false,
        text: String::new(),
    }
}

fn missing_brief(node_id: i32) -> String {
    format!("[ node-{:02} missing ]", node_id)
}

fn end_hint(node: &FlowChartNode) -> &'static str {
    if matches!(node.kind, NodeKind::TriggerConversation { .. }) {
        END_TRIGGER_HINT
    } else if node.container_node_id.is_some() {
        END_CONTAINER_HINT
    } else {
        END_HINT
    }
}
