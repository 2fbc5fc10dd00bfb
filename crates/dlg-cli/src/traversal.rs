use std::rc::Rc;

use dlg_core::{Conversation, FlowChartNode, Link, ROOT_NODE_ID};

use crate::session::ConversationLoader;
use crate::CliError;

#[derive(Debug, Clone)]
pub(crate) struct Step {
    pub(crate) conversation: Rc<Conversation>,
    pub(crate) link: Link,
}

impl Step {
    fn entry(conversation: Rc<Conversation>, node_id: i32) -> Self {
        Self {
            conversation,
            link: Link::new(-1, node_id),
        }
    }
}

/// Stack of followed links above a fixed entry step.
#[derive(Debug)]
pub(crate) struct Traversal {
    entry: Step,
    steps: Vec<Step>,
}

impl Traversal {
    pub(crate) fn new(conversation: Conversation) -> Self {
        Self::starting_at(Rc::new(conversation), ROOT_NODE_ID)
    }

    pub(crate) fn starting_at(conversation: Rc<Conversation>, node_id: i32) -> Self {
        Self {
            entry: Step::entry(conversation, node_id),
            steps: Vec::new(),
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.steps.len() + 1
    }

    pub(crate) fn current(&self) -> &Step {
        self.steps.last().unwrap_or(&self.entry)
    }

    pub(crate) fn conversation(&self) -> &Rc<Conversation> {
        &self.current().conversation
    }

    pub(crate) fn node(&self) -> Result<&FlowChartNode, CliError> {
        let step = self.current();
        Ok(step.conversation.get_node(step.link.to_node_id)?)
    }

    /// Follows option `index` (zero-based). A player response with exactly
    /// one outgoing link is skipped over.
    pub(crate) fn pick(&mut self, index: usize) -> Result<(), CliError> {
        let conversation = Rc::clone(self.conversation());
        let options = node_options(self.node()?);
        let link = options.get(index).cloned().ok_or_else(|| {
            CliError::new(
                "TRAVERSAL_CHOICE_RANGE",
                format!("Valid range: 1 .. {}", options.len()),
            )
        })?;

        let Some(target) = conversation.find_node(link.to_node_id) else {
            return Err(CliError::new(
                "TRAVERSAL_MISSING_NODE",
                format!(
                    "Line {} leads to node {}, which does not exist.",
                    index + 1,
                    link.to_node_id
                ),
            ));
        };
        let link = match single_response_link(target) {
            Some(next) => next.clone(),
            None => link,
        };
        tracing::debug!(
            conversation = conversation.tag(),
            from = link.from_node_id,
            to = link.to_node_id,
            "picked line"
        );
        self.steps.push(Step { conversation, link });
        Ok(())
    }

    pub(crate) fn rewind(&mut self) -> bool {
        self.steps.pop().is_some()
    }

    /// Enters the target conversation of an option-less trigger node. Returns
    /// false when the current node is not such a node.
    pub(crate) fn confirm(&mut self, loader: &dyn ConversationLoader) -> Result<bool, CliError> {
        let node = self.node()?;
        if !node_options(node).is_empty() {
            return Ok(false);
        }
        let Some((tag, start_node_id)) = node.trigger_target() else {
            return Ok(false);
        };

        let conversation = if tag == self.conversation().tag() {
            Rc::clone(self.conversation())
        } else {
            Rc::new(loader.load(&tag)?)
        };
        conversation.get_node(start_node_id)?;
        tracing::info!(conversation = %tag, node = start_node_id, "entered conversation");
        self.steps.push(Step::entry(conversation, start_node_id));
        Ok(true)
    }
}

pub(crate) fn node_options(node: &FlowChartNode) -> Vec<Link> {
    node.links
        .iter()
        .cloned()
        .chain(
            node.child_node_ids()
                .iter()
                .map(|child| Link::new(node.id, *child)),
        )
        .collect()
}

pub(crate) fn single_response_link(node: &FlowChartNode) -> Option<&Link> {
    match node.links.as_slice() {
        [only] if node.is_player_response() => Some(only),
        _ => None,
    }
}
