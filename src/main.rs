mod config;
mod locate_sections;
mod materialize_events;
mod open_sheet;
mod slot_times;
mod state;
mod walk_grid;
mod write_calendar;

use clap::Parser;
use miette::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use self::{config::Config, state::MasterState};

fn main() -> miette::Result<()> {
  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(EnvFilter::from_default_env())
    .init();

  let config = Config::parse();

  // drive state machine
  let mut state = MasterState::Start;
  loop {
    match state {
      s if s.completed() => {
        info!("state machine completed");
        break;
      }
      s => {
        state = s.step(&config).context("failed to step state")?;
      }
    }
  }

  Ok(())
}
