#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key {
    Digit(u8),
    Enter,
    Backspace,
    Space,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    PickLine(usize),
    Rewind,
    Confirm,
    ToggleAudio,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Command(Command),
    Echo(char),
    Erase,
    Message(String),
    Ignored,
}

/// Accumulates a multi-digit option number for a node with `option_count`
/// options.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChoiceInput {
    option_count: usize,
    accumulator: usize,
}

impl ChoiceInput {
    pub(crate) fn new(option_count: usize) -> Self {
        Self {
            option_count,
            accumulator: 0,
        }
    }

    pub(crate) fn pending(&self) -> Option<usize> {
        (self.accumulator > 0).then_some(self.accumulator)
    }

    pub(crate) fn feed(&mut self, key: Key) -> InputEvent {
        match key {
            Key::Escape => self.finish(Command::Quit),
            Key::Space => self.finish(Command::ToggleAudio),
            Key::Backspace => {
                if self.accumulator == 0 {
                    self.finish(Command::Rewind)
                } else {
                    self.accumulator /= 10;
                    InputEvent::Erase
                }
            }
            Key::Enter => {
                if self.option_count == 1 {
                    self.accumulator = 1;
                }
                if (1..=self.option_count).contains(&self.accumulator) {
                    let picked = self.accumulator - 1;
                    self.finish(Command::PickLine(picked))
                } else if self.option_count > 0 {
                    InputEvent::Message(format!("Valid range: 1 .. {}", self.option_count))
                } else {
                    self.finish(Command::Confirm)
                }
            }
            Key::Digit(digit) => {
                let total = 10 * self.accumulator + usize::from(digit);
                if total == 0 || total > self.option_count {
                    return InputEvent::Ignored;
                }
                self.accumulator = total;
                // no further digit could stay in range
                if 10 * total > self.option_count {
                    return self.finish(Command::PickLine(total - 1));
                }
                InputEvent::Echo(char::from(b'0' + digit))
            }
            Key::Other => InputEvent::Ignored,
        }
    }

    fn finish(&mut self, command: Command) -> InputEvent {
        self.accumulator = 0;
        InputEvent::Command(command)
    }
}

/// Translates one line typed in line mode into keys. The line is committed
/// with a trailing Enter unless it is a named command.
pub(crate) fn line_to_keys(raw: &str) -> Vec<Key> {
    match raw.trim() {
        "q" | "quit" | "exit" => vec![Key::Escape],
        "-" | "b" | "back" => vec![Key::Backspace],
        "a" | "audio" => vec![Key::Space],
        trimmed => trimmed
            .chars()
            .filter_map(|ch| ch.to_digit(10).map(|digit| Key::Digit(digit as u8)))
            .chain(std::iter::once(Key::Enter))
            .collect(),
    }
}
