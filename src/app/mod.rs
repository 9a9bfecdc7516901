mod config;
mod player;
mod scheduler;
mod timestamp;


use std::io;
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, TimeDelta};

use crate::cli::Cli;

use self::config::{Config, select_player};
use self::player::{PathResolver, PlayerCommand, ProcessLauncher};
use self::scheduler::{RunClock, Scheduler};
use self::timestamp::format_mmss;

pub use self::scheduler::RunOutcome;

pub fn run(cli: Cli) -> Result<RunOutcome> {
    let config = Config::from_cli(&cli)?;
    let player = select_player(&PathResolver::from_env(), config.missing_player)?;
    announce(&config, player.as_ref());

    let started = Instant::now();
    log_due_times(&config);
    let mut scheduler = Scheduler::new(
        RunClock::new(started),
        ProcessLauncher::default(),
        io::stdout(),
        config.countdown,
    );
    scheduler.run(&config.first, &config.second, player.as_ref())
}

fn announce(config: &Config, player: Option<&PlayerCommand>) {
    match player {
        Some(player) => log::info!("Using audio player: {}", player.display()),
        None => {
            log::warn!("No audio player found (ffplay/mpg123/aplay/paplay), playback disabled.")
        }
    }
    log::info!(
        "First warning:  {} -> {}",
        format_mmss(config.first.offset_seconds),
        config.first.audio_path.display()
    );
    log::info!(
        "Second warning: {} -> {}",
        format_mmss(config.second.offset_seconds),
        config.second.audio_path.display()
    );
}

fn log_due_times(config: &Config) {
    let now = Local::now();
    let due = |offset: u32| {
        (now + TimeDelta::seconds(i64::from(offset)))
            .format("%H:%M:%S")
            .to_string()
    };
    log::info!(
        "Starting timer at {} (warnings due {} and {})",
        now.format("%H:%M:%S"),
        due(config.first.offset_seconds),
        due(config.second.offset_seconds)
    );
}
