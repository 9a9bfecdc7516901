mod app;
mod cli;
mod error;

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;

use crate::app::RunOutcome;

/// Conventional exit status for a run stopped by Ctrl-C or another stop signal.
const EXIT_INTERRUPTED: i32 = 130;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logger(cli.verbose)?;

    match app::run(cli)? {
        RunOutcome::Completed => Ok(()),
        RunOutcome::Interrupted { .. } => {
            log::logger().flush();
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}

fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_level(simplelog::LevelFilter::Off)
            .set_target_level(simplelog::LevelFilter::Off)
            .add_filter_allow("audiowarn".to_owned())
            .build(),
        simplelog::TerminalMode::Mixed,
        color_choice(io::stdout().is_terminal()),
    )?;
    Ok(())
}

// termcolor's Auto only looks at TERM, so redirected output would still
// get escape codes.
fn color_choice(stdout_is_terminal: bool) -> simplelog::ColorChoice {
    if stdout_is_terminal {
        simplelog::ColorChoice::Auto
    } else {
        simplelog::ColorChoice::Never
    }
}
