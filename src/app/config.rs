use std::path::Path;

use super::player::{PlayerCommand, PlayerResolver};
use super::scheduler::Warning;
use super::timestamp::parse_mmss;
use crate::cli::Cli;
use crate::error::WarnError;

/// What to do when no supported player is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingPlayerPolicy {
    Fail,
    /// Keep the timer running and skip playback.
    Skip,
}

/// Validated run configuration; building one performs every startup check.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) first: Warning,
    pub(crate) second: Warning,
    pub(crate) countdown: bool,
    pub(crate) missing_player: MissingPlayerPolicy,
}

impl Config {
    pub(crate) fn from_cli(cli: &Cli) -> Result<Self, WarnError> {
        let t1 = parse_mmss(&cli.t1)?;
        let t2 = parse_mmss(&cli.t2)?;
        if t2 <= t1 {
            return Err(WarnError::OffsetOrder {
                t1: cli.t1.clone(),
                t2: cli.t2.clone(),
            });
        }

        for audio in [&cli.a1, &cli.a2] {
            ensure_audio_exists(audio)?;
        }

        Ok(Self {
            first: Warning {
                index: 1,
                offset_seconds: t1,
                audio_path: cli.a1.clone(),
            },
            second: Warning {
                index: 2,
                offset_seconds: t2,
                audio_path: cli.a2.clone(),
            },
            countdown: !cli.no_countdown,
            missing_player: if cli.allow_missing_player {
                MissingPlayerPolicy::Skip
            } else {
                MissingPlayerPolicy::Fail
            },
        })
    }
}

fn ensure_audio_exists(path: &Path) -> Result<(), WarnError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WarnError::MissingAudio(path.to_path_buf()))
    }
}

pub(crate) fn select_player(
    resolver: &dyn PlayerResolver,
    policy: MissingPlayerPolicy,
) -> Result<Option<PlayerCommand>, WarnError> {
    match (resolver.resolve(), policy) {
        (Some(player), _) => Ok(Some(player)),
        (None, MissingPlayerPolicy::Fail) => Err(WarnError::PlayerUnavailable),
        (None, MissingPlayerPolicy::Skip) => Ok(None),
    }
}
