use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about)]
pub struct Arguments {
    #[arg(short = 'v', long = None, env = "STOPWATCH_VERBOSITY", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Milliseconds between readout refreshes while running.
    #[arg(long, env = "STOPWATCH_TICK_MS", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Print snapshots as JSON lines instead of a text board.
    #[arg(long, env = "STOPWATCH_JSON")]
    pub json: bool,

    #[cfg(feature = "ui")]
    #[arg(long, env = "STOPWATCH_WINDOW")]
    pub window: bool,
}
