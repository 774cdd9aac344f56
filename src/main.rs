#[cfg(feature = "ui")]
mod app;
mod cli;

use crate::cli::Arguments;
use clap::Parser;
use std::io::{self, BufRead};
use std::time::Duration;
use stopwatch::console::{Console, Input};
use stopwatch::{engine, Engine, Handle};
use tracing_log::LogTracer;

fn main() {
    let arguments = cli::Arguments::parse();
    set_log_level(&arguments).expect("Failed to configure logging");

    tracing::debug!(?arguments, "starting stopwatch");

    if let Err(e) = run(arguments) {
        tracing::error!(%e, "Unable to run the stopwatch");
    }
}

fn set_log_level(arguments: &Arguments) -> anyhow::Result<()> {
    LogTracer::init()?;

    let level = match arguments.verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Stdout belongs to the board.
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn run(arguments: Arguments) -> anyhow::Result<()> {
    let period = Duration::from_millis(arguments.tick_ms);

    #[cfg(feature = "ui")]
    {
        if arguments.window {
            return app::run(period);
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result: anyhow::Result<()> = runtime.block_on(async {
        let (engine, handle) = Engine::new(period);
        let console = Console::new(io::stdout(), arguments.json);

        let mut group = tokio::task::JoinSet::new();

        group.spawn(async move {
            engine.run().await;
            Ok(())
        });
        group.spawn(engine::observe(handle.subscribe(), console));
        group.spawn_blocking(move || read_loop(handle));

        // The reader finishes first; the engine follows once its handle is gone.
        if let Some(join_result) = group.join_next().await {
            join_result??;
        }

        group.shutdown().await;

        Ok(())
    });

    result
}

fn read_loop(handle: Handle) -> anyhow::Result<()> {
    tracing::debug!("Waiting for console input");

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Input>() {
            Ok(Input::Quit) => break,
            Ok(Input::Command(command)) => handle.blocking_send(command)?,
            Ok(Input::Press(button)) => handle.blocking_send(handle.command_for(button))?,
            Err(e) => {
                tracing::warn!(%e, "Ignoring console input");
            }
        }
    }

    Ok(())
}
