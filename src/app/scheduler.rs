use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::player::{PlaybackLauncher, PlaybackOutcome, PlayerCommand};
use super::timestamp::format_mmss;

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// One scheduled alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Warning {
    /// 1-based position, used in messages.
    pub(crate) index: usize,
    pub(crate) offset_seconds: u32,
    pub(crate) audio_path: PathBuf,
}

impl Warning {
    fn offset(&self) -> Duration {
        Duration::from_secs(u64::from(self.offset_seconds))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Playback of `warning` was interrupted; later warnings were not attempted.
    Interrupted { warning: usize },
}

pub(crate) trait Clock {
    /// Time since the run started.
    fn elapsed(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Monotonic clock anchored at the instant the run started.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunClock {
    started: Instant,
}

impl RunClock {
    pub(crate) fn new(started: Instant) -> Self {
        Self { started }
    }
}

impl Clock for RunClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

pub(crate) struct Scheduler<C, L, W> {
    clock: C,
    launcher: L,
    out: W,
    countdown: bool,
}

impl<C, L, W> Scheduler<C, L, W>
where
    C: Clock,
    L: PlaybackLauncher,
    W: Write,
{
    pub(crate) fn new(clock: C, launcher: L, out: W, countdown: bool) -> Self {
        Self {
            clock,
            launcher,
            out,
            countdown,
        }
    }

    pub(crate) fn run(
        &mut self,
        first: &Warning,
        second: &Warning,
        player: Option<&PlayerCommand>,
    ) -> Result<RunOutcome> {
        debug_assert!(second.offset_seconds > first.offset_seconds);

        for warning in [first, second] {
            self.wait_for(warning)?;
            log::info!(
                "Playing warning {} at {}",
                warning.index,
                format_mmss(warning.offset_seconds)
            );

            let Some(player) = player else {
                log::warn!(
                    "No audio player available, skipping {}",
                    warning.audio_path.display()
                );
                continue;
            };
            let outcome = self.launcher.play(player, &warning.audio_path)?;
            match outcome {
                PlaybackOutcome::Finished { success: true } => {}
                PlaybackOutcome::Finished { success: false } => log::warn!(
                    "{} exited with an error while playing {}",
                    player.executable_name,
                    warning.audio_path.display()
                ),
                PlaybackOutcome::Terminated | PlaybackOutcome::Killed => {
                    log::warn!("Stopping after warning {}.", warning.index);
                    return Ok(RunOutcome::Interrupted {
                        warning: warning.index,
                    });
                }
            }
        }

        Ok(RunOutcome::Completed)
    }

    fn wait_for(&mut self, warning: &Warning) -> Result<()> {
        if self.countdown {
            self.count_down(warning)?;
        }
        // Without a countdown this is the whole wait; after one it only
        // covers the sub-second part the rounded display skipped.
        let remaining = warning.offset().saturating_sub(self.clock.elapsed());
        if !remaining.is_zero() {
            self.clock.sleep(remaining);
        }
        Ok(())
    }

    fn count_down(&mut self, warning: &Warning) -> Result<()> {
        let label = format!("Time until warning {}", warning.index);
        loop {
            let remaining = rounded_remaining(warning.offset(), self.clock.elapsed());
            if remaining == 0 {
                writeln!(self.out, "\r{label}: {}   ", format_mmss(0))
                    .context("failed writing countdown")?;
                self.out.flush().context("failed writing countdown")?;
                return Ok(());
            }

            write!(self.out, "\r{label}: {}   ", format_mmss(remaining))
                .context("failed writing countdown")?;
            self.out.flush().context("failed writing countdown")?;
            self.clock.sleep(COUNTDOWN_TICK);
        }
    }
}

/// Whole seconds left until `offset`, rounded to nearest and clamped at zero.
pub(crate) fn rounded_remaining(offset: Duration, elapsed: Duration) -> u32 {
    let remaining = offset.as_secs_f64() - elapsed.as_secs_f64();
    if remaining <= 0.0 {
        return 0;
    }
    remaining.round() as u32
}
