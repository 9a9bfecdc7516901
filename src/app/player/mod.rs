mod process;
mod resolve;

use std::path::Path;

use anyhow::Result;

pub(crate) use process::*;
pub(crate) use resolve::*;

/// Base invocation of an audio player; the audio path is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlayerCommand {
    pub(crate) executable_name: String,
    pub(crate) fixed_arguments: Vec<String>,
}

impl PlayerCommand {
    pub(crate) fn new(executable_name: &str, fixed_arguments: &[&str]) -> Self {
        Self {
            executable_name: executable_name.to_string(),
            fixed_arguments: fixed_arguments.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub(crate) fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.fixed_arguments.len() + 1);
        parts.push(self.executable_name.as_str());
        parts.extend(self.fixed_arguments.iter().map(String::as_str));
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaybackOutcome {
    Finished { success: bool },
    /// Interrupted; the player exited on its own after SIGTERM.
    Terminated,
    /// Interrupted; the player outlived the grace period and was killed.
    Killed,
}

pub(crate) trait PlayerResolver {
    fn resolve(&self) -> Option<PlayerCommand>;
}

pub(crate) trait PlaybackLauncher {
    fn play(&mut self, player: &PlayerCommand, audio: &Path) -> Result<PlaybackOutcome>;
}

impl<L: PlaybackLauncher + ?Sized> PlaybackLauncher for &mut L {
    fn play(&mut self, player: &PlayerCommand, audio: &Path) -> Result<PlaybackOutcome> {
        (**self).play(player, audio)
    }
}
