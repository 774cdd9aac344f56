use crate::engine::Command;

/// The two buttons of the command surface; their meaning depends on whether the clock runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

impl Button {
    pub fn label(self, running: bool) -> &'static str {
        match (self, running) {
            (Button::Left, true) => "Lap",
            (Button::Left, false) => "Reset",
            (Button::Right, true) => "Stop",
            (Button::Right, false) => "Start",
        }
    }

    pub fn command(self, running: bool) -> Command {
        match (self, running) {
            (Button::Left, _) => Command::LapOrReset,
            (Button::Right, true) => Command::Stop,
            (Button::Right, false) => Command::Start,
        }
    }
}
