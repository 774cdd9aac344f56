use crate::controls::Button;
use crate::engine::{Command, Observer};
use crate::stopwatch::{Highlight, Snapshot};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::io::Write;
use std::str::FromStr;

/// One line typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Press(Button),
    Quit,
}

#[derive(Debug)]
pub struct ParseInputError(String);

impl Display for ParseInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown input {:?}", self.0)
    }
}

impl Error for ParseInputError {}

impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Input::Command(Command::Start)),
            "stop" => Ok(Input::Command(Command::Stop)),
            "lap" | "reset" => Ok(Input::Command(Command::LapOrReset)),
            "l" | "left" => Ok(Input::Press(Button::Left)),
            "r" | "right" => Ok(Input::Press(Button::Right)),
            "q" | "quit" | "exit" => Ok(Input::Quit),
            _ => Err(ParseInputError(s.trim().to_string())),
        }
    }
}

pub fn render(snapshot: &Snapshot) -> String {
    let mut board = String::new();

    let _ = writeln!(board, "{}", snapshot.readout);
    let _ = writeln!(
        board,
        "[{}] [{}]",
        Button::Left.label(snapshot.running),
        Button::Right.label(snapshot.running)
    );

    for lap in &snapshot.laps {
        let _ = write!(board, "{lap}  {}  (+{})", lap.display_time(), lap.split_time());
        match snapshot.highlight(lap) {
            Some(Highlight::Fastest) => board.push_str("  fastest"),
            Some(Highlight::Slowest) => board.push_str("  slowest"),
            None => {}
        }
        board.push('\n');
    }

    board
}

/// Prints snapshots to a writer, as a text board or as JSON lines.
pub struct Console<W> {
    writer: W,
    json: bool,
    previous: Option<Snapshot>,
}

impl<W: Write> Console<W> {
    pub fn new(writer: W, json: bool) -> Self {
        Self {
            writer,
            json,
            previous: None,
        }
    }

    fn write(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        let structural = self
            .previous
            .as_ref()
            .map_or(true, |previous| previous.differs_beyond_tick(snapshot));

        match (self.json, structural) {
            (true, true) => {
                serde_json::to_writer(&mut self.writer, snapshot)?;
                writeln!(self.writer)?;
            }
            (true, false) => {}
            (false, true) => write!(self.writer, "\n{}", render(snapshot))?,
            (false, false) => write!(self.writer, "\r{}", snapshot.readout)?,
        }

        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Observer for Console<W> {
    fn on_change(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.write(snapshot) {
            tracing::warn!(%e, "Failed to write to the console");
        }

        self.previous = Some(snapshot.clone());
    }
}
