use dlg_core::Conversation;

use crate::audio::AudioSink;
use crate::input::{ChoiceInput, Command, InputEvent, Key};
use crate::session::ConversationLoader;
use crate::traversal::Traversal;
use crate::view::NodeView;
use crate::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Redraw,
    Pending,
    Message(String),
    Unchanged,
    Quit,
}

pub(crate) struct Explorer<'a> {
    traversal: Traversal,
    source: &'a dyn ConversationLoader,
    audio: Box<dyn AudioSink + 'a>,
    audio_enabled: bool,
    view: NodeView,
    input: ChoiceInput,
}

impl<'a> Explorer<'a> {
    pub(crate) fn new(
        conversation: Conversation,
        source: &'a dyn ConversationLoader,
        audio: Box<dyn AudioSink + 'a>,
        audio_enabled: bool,
    ) -> Result<Self, CliError> {
        let traversal = Traversal::new(conversation);
        let view = build_view(&traversal, source)?;
        let mut explorer = Self {
            input: ChoiceInput::new(view.options.len()),
            traversal,
            source,
            audio,
            audio_enabled,
            view,
        };
        explorer.autoplay();
        Ok(explorer)
    }

    pub(crate) fn view(&self) -> &NodeView {
        &self.view
    }

    pub(crate) fn pending(&self) -> Option<usize> {
        self.input.pending()
    }

    pub(crate) fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub(crate) fn depth(&self) -> usize {
        self.traversal.depth()
    }

    pub(crate) fn handle_key(&mut self, key: Key) -> Result<Outcome, CliError> {
        match self.input.feed(key) {
            InputEvent::Command(command) => self.apply(command),
            InputEvent::Echo(_) | InputEvent::Erase => Ok(Outcome::Pending),
            InputEvent::Message(message) => Ok(Outcome::Message(message)),
            InputEvent::Ignored => Ok(Outcome::Unchanged),
        }
    }

    fn apply(&mut self, command: Command) -> Result<Outcome, CliError> {
        match command {
            Command::PickLine(index) => {
                self.traversal.pick(index)?;
                self.enter_current(true)
            }
            Command::Rewind => {
                if !self.traversal.rewind() {
                    return Ok(Outcome::Unchanged);
                }
                self.enter_current(false)
            }
            Command::Confirm => {
                if !self.traversal.confirm(self.source)? {
                    return Ok(Outcome::Unchanged);
                }
                self.enter_current(true)
            }
            Command::ToggleAudio => {
                self.audio_enabled = !self.audio_enabled;
                if self.audio_enabled {
                    let step = self.traversal.current();
                    if let Some(file) = self
                        .source
                        .vocalization(step.conversation.tag(), step.link.to_node_id)
                    {
                        self.audio.play(&file);
                    }
                } else {
                    self.audio.stop();
                }
                let state = if self.audio_enabled { "on" } else { "off" };
                Ok(Outcome::Message(format!("audio {}", state)))
            }
            Command::Quit => {
                self.audio.stop();
                Ok(Outcome::Quit)
            }
        }
    }

    /// Rebuilds the view after the traversal moved. A step whose node cannot
    /// be rendered is undone.
    fn enter_current(&mut self, autoplay: bool) -> Result<Outcome, CliError> {
        self.audio.stop();
        let view = match build_view(&self.traversal, self.source) {
            Ok(view) => view,
            Err(error) => {
                self.traversal.rewind();
                return Err(error);
            }
        };
        self.input = ChoiceInput::new(view.options.len());
        self.view = view;
        if autoplay {
            self.autoplay();
        }
        Ok(Outcome::Redraw)
    }

    fn autoplay(&mut self) {
        if !self.audio_enabled {
            return;
        }
        let Some(node_id) = self.view.autoplay_node() else {
            return;
        };
        if let Some(file) = self.source.vocalization(&self.view.conversation, node_id) {
            self.audio.play(&file);
        }
    }
}

fn build_view(traversal: &Traversal, source: &dyn ConversationLoader) -> Result<NodeView, CliError> {
    let step = traversal.current();
    NodeView::build(&step.conversation, &step.link, &|tag, node_id| {
        source.has_vocalization(tag, node_id)
    })
}
