use crate::controls::Button;
use crate::stopwatch::{LapOrReset, Snapshot, Stopwatch};
use anyhow::anyhow;
use std::future;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    LapOrReset,
}

/// Receives every published snapshot, starting with the current one.
pub trait Observer {
    fn on_change(&mut self, snapshot: &Snapshot);
}

/// Owns the stopwatch and the periodic tick that refreshes it.
///
/// Commands and ticks are handled by one task, one at a time. The ticker only
/// exists between a start and the matching stop or reset.
pub struct Engine {
    stopwatch: Stopwatch,
    period: Duration,
    ticker: Option<Interval>,
    commands: mpsc::Receiver<Command>,
    state: watch::Sender<Snapshot>,
}

impl Engine {
    pub fn new(period: Duration) -> (Self, Handle) {
        let stopwatch = Stopwatch::default();
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let (state, receiver) = watch::channel(stopwatch.snapshot());

        let engine = Self {
            stopwatch,
            period: period.max(Duration::from_millis(1)),
            ticker: None,
            commands,
            state,
        };
        let handle = Handle {
            commands: sender,
            state: receiver,
        };

        (engine, handle)
    }

    /// Runs until every [`Handle`] has been dropped.
    pub async fn run(mut self) {
        tracing::debug!(period = ?self.period, "stopwatch engine running");

        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(command) => {
                        self.apply(command);
                    }
                    None => break,
                },
                _ = next_tick(&mut self.ticker) => self.tick(),
            }
        }

        self.ticker = None;
        tracing::debug!("stopwatch engine stopped");
    }

    /// Applies a command and publishes a snapshot when it changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        let now = Instant::now().into_std();

        let changed = match command {
            Command::Start => {
                let started = self.stopwatch.start(now);
                if started {
                    let mut ticker = time::interval(self.period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    self.ticker = Some(ticker);
                }
                started
            }
            Command::Stop => {
                let stopped = self.stopwatch.stop(now);
                if stopped {
                    self.ticker = None;
                }
                stopped
            }
            Command::LapOrReset => {
                let zeroed = self.stopwatch.is_zeroed();
                match self.stopwatch.lap_or_reset(now) {
                    LapOrReset::Lap(number) => {
                        tracing::debug!(number, elapsed = ?self.stopwatch.elapsed(), "recorded lap");
                        true
                    }
                    LapOrReset::Reset => {
                        self.ticker = None;
                        !zeroed
                    }
                }
            }
        };

        if changed {
            tracing::debug!(?command, running = self.stopwatch.is_running(), "applied command");
            self.publish();
        } else {
            tracing::debug!(?command, "ignored command");
        }

        changed
    }

    fn tick(&mut self) {
        if self.stopwatch.tick(Instant::now().into_std()) {
            tracing::trace!(elapsed = ?self.stopwatch.elapsed(), "tick");
            self.publish();
        }
    }

    fn publish(&self) {
        self.state.send_replace(self.stopwatch.snapshot());
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }
}

async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => future::pending().await,
    }
}

#[derive(Clone)]
pub struct Handle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<Snapshot>,
}

impl Handle {
    pub async fn send(&self, command: Command) -> anyhow::Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("The stopwatch engine has stopped"))
    }

    /// For threads outside the runtime, such as a blocking stdin reader.
    pub fn blocking_send(&self, command: Command) -> anyhow::Result<()> {
        self.commands
            .blocking_send(command)
            .map_err(|_| anyhow!("The stopwatch engine has stopped"))
    }

    pub fn try_send(&self, command: Command) -> anyhow::Result<()> {
        self.commands
            .try_send(command)
            .map_err(|e| anyhow!("Failed to send {command:?}: {e}"))
    }

    /// The command a button is bound to given the latest published state.
    pub fn command_for(&self, button: Button) -> Command {
        button.command(self.state.borrow().running)
    }

    pub async fn press(&self, button: Button) -> anyhow::Result<()> {
        self.send(self.command_for(button)).await
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }
}

/// Feeds snapshots to an observer until the engine shuts down.
pub async fn observe(mut state: watch::Receiver<Snapshot>, mut observer: impl Observer) -> anyhow::Result<()> {
    loop {
        let snapshot = state.borrow_and_update().clone();
        observer.on_change(&snapshot);

        if state.changed().await.is_err() {
            break;
        }
    }

    Ok(())
}
