#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the Travels lesson in a terminal.

mod config;
mod journal;
mod script;
mod terminal;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use travels_core::{Grid, Pixel};
use travels_rendering::{RenderingBackend, Scene};
use travels_system_bootstrap::Bootstrap;
use travels_system_session::{Input, Session};

use crate::{config::CliConfig, journal::EventJournal, terminal::TerminalBackend};

/// Log lines kept for the log overlay.
const JOURNAL_CAPACITY: usize = 256;

#[derive(Debug, Parser)]
#[command(
    name = "travels",
    version,
    about = "Walk through the Travels lesson in the terminal",
    after_help = "Moves: n e s w to walk, c to confirm, x to cancel, l to toggle the log. \
An empty line on standard input confirms."
)]
struct Cli {
    /// Configuration file, `travels.toml` in the working directory when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Play these moves one per step and exit instead of reading standard input.
    #[arg(long, value_name = "SCRIPT")]
    moves: Option<String>,

    /// Draw with shade characters instead of 24-bit colour.
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    let journal = EventJournal::new(JOURNAL_CAPACITY);
    init_tracing(&config.log_filter, journal.clone())?;

    let session = Bootstrap
        .session(config.tile_size)
        .context("failed to build the lesson")?;
    let backend = TerminalBackend::new(io::stdout().lock(), journal, !cli.no_color);
    let mut game = Game::new(session, backend, &config);
    game.present()?;

    match cli.moves {
        Some(moves) => {
            for input in script::parse(&moves) {
                if game.session.is_finished() {
                    warn!("session finished before the script ended");
                    break;
                }
                game.play(&[input])?;
            }
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read standard input")?;
                let inputs = match script::parse(&line) {
                    inputs if inputs.is_empty() => vec![Input::Confirm],
                    inputs => inputs,
                };
                game.play(&inputs)?;
                if game.session.is_finished() {
                    break;
                }
            }
        }
    }

    info!(clock = ?game.session.state().clock(), "session ended");
    Ok(())
}

fn init_tracing(filter: &str, journal: EventJournal) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)
            .with_context(|| format!("invalid log filter `{filter}`"))?,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(journal)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
    Ok(())
}

/// Session paired with the backend that shows it.
struct Game<B> {
    session: Session,
    backend: B,
    frame: Grid<Pixel>,
    tick: Duration,
}

impl<B: RenderingBackend> Game<B> {
    fn new(session: Session, backend: B, config: &CliConfig) -> Self {
        Self {
            session,
            backend,
            frame: Grid::new(config.viewport),
            tick: config.tick(),
        }
    }

    /// Queues `inputs`, runs one step and shows the result.
    fn play(&mut self, inputs: &[Input]) -> anyhow::Result<()> {
        for input in inputs {
            self.session.push_input(*input);
        }
        let report = self.session.step(self.tick);
        if let Some(failure) = &report.failure {
            warn!(%failure, "step ended early");
        }
        self.present()
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.session
            .render(&mut self.frame)
            .context("failed to draw the frame")?;
        let scene = Scene::capture(
            self.session.state(),
            self.session.menu_cursor(),
            self.session.show_log(),
        );
        self.backend.present(&self.frame, &scene)
    }
}
