use std::io;
use std::path::Path;
use std::process::{Child, Command as ProcessCommand, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

#[cfg(unix)]
use anyhow::anyhow;
#[cfg(unix)]
use std::os::unix::process::CommandExt;

use super::{PlaybackLauncher, PlaybackOutcome, PlayerCommand};

pub(crate) const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Signals that stop a run while a player is up. Each would otherwise kill
/// audiowarn outright and orphan the player in its own process group.
#[cfg(unix)]
const STOP_SIGNALS: [libc::c_int; 4] =
    [libc::SIGINT, libc::SIGTERM, libc::SIGHUP, libc::SIGQUIT];

/// Set by the stop-signal handler while a player is running.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn record_interrupt(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
struct ScopedSigaction {
    signum: libc::c_int,
    old_action: libc::sigaction,
}

#[cfg(unix)]
impl ScopedSigaction {
    fn catch(signum: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<Self> {
        unsafe {
            let mut new_action: libc::sigaction = std::mem::zeroed();
            new_action.sa_sigaction = handler as libc::sighandler_t;
            libc::sigemptyset(&mut new_action.sa_mask);
            new_action.sa_flags = libc::SA_RESTART;

            let mut old_action: libc::sigaction = std::mem::zeroed();
            if libc::sigaction(signum, &new_action, &mut old_action) != 0 {
                return Err(anyhow!("failed to update signal action for {signum}"));
            }

            Ok(Self { signum, old_action })
        }
    }
}

#[cfg(unix)]
impl Drop for ScopedSigaction {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::sigaction(self.signum, &self.old_action, std::ptr::null_mut());
        }
    }
}

#[cfg(unix)]
fn with_stop_signals_recorded<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    INTERRUPTED.store(false, Ordering::SeqCst);
    let _signal_guards = STOP_SIGNALS
        .iter()
        .map(|&signum| ScopedSigaction::catch(signum, record_interrupt))
        .collect::<Result<Vec<_>>>()?;
    f()
}

// Interrupting playback is unix-only: elsewhere Ctrl-C keeps its default
// behaviour and nothing sets INTERRUPTED. ChildGuard still stops the
// player when supervision bails out with an error.
#[cfg(not(unix))]
fn with_stop_signals_recorded<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    f()
}

/// Launches real player processes, one at a time.
#[derive(Debug, Clone)]
pub(crate) struct ProcessLauncher {
    grace_period: Duration,
}

impl ProcessLauncher {
    pub(crate) fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

impl PlaybackLauncher for ProcessLauncher {
    fn play(&mut self, player: &PlayerCommand, audio: &Path) -> Result<PlaybackOutcome> {
        let cmd = player_process(player, audio);
        with_stop_signals_recorded(|| run_supervised(cmd, &INTERRUPTED, self.grace_period))
    }
}

fn player_process(player: &PlayerCommand, audio: &Path) -> ProcessCommand {
    let mut cmd = ProcessCommand::new(&player.executable_name);
    cmd.args(&player.fixed_arguments)
        .arg(audio)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Runs `cmd` to completion unless `interrupted` becomes set, in which case
/// the child is terminated (and killed after `grace_period`).
pub(crate) fn run_supervised(
    mut cmd: ProcessCommand,
    interrupted: &AtomicBool,
    grace_period: Duration,
) -> Result<PlaybackOutcome> {
    let program = cmd.get_program().to_string_lossy().into_owned();

    #[cfg(unix)]
    detach_process_group(&mut cmd);

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;
    log::debug!("spawned {program} (pid {})", child.id());
    let mut guard = ChildGuard::new(child, grace_period);

    loop {
        // Checked before the exit status so an interrupt that races the
        // player's own exit still stops the run.
        if interrupted.load(Ordering::SeqCst) {
            log::warn!("Playback interrupted, stopping {program}.");
            return guard
                .shutdown()
                .with_context(|| format!("failed stopping {program}"));
        }
        if let Some(status) = guard
            .try_wait()
            .with_context(|| format!("failed waiting on {program}"))?
        {
            log::debug!("{program} exited with {status}");
            return Ok(PlaybackOutcome::Finished {
                success: status.success(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

// Own process group: the terminal's Ctrl-C reaches only us, and we
// decide how the player is shut down.
#[cfg(unix)]
fn detach_process_group(cmd: &mut ProcessCommand) {
    unsafe {
        cmd.pre_exec(|| {
            if libc::setpgid(0, 0) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Owns a running child; whatever path drops it, the child is stopped and reaped.
struct ChildGuard {
    child: Option<Child>,
    grace_period: Duration,
}

impl ChildGuard {
    fn new(child: Child, grace_period: Duration) -> Self {
        Self {
            child: Some(child),
            grace_period,
        }
    }

    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        let status = child.try_wait()?;
        if status.is_some() {
            self.child = None;
        }
        Ok(status)
    }

    fn shutdown(&mut self) -> io::Result<PlaybackOutcome> {
        match self.child.take() {
            Some(mut child) => stop_child(&mut child, self.grace_period),
            None => Ok(PlaybackOutcome::Terminated),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = stop_child(&mut child, self.grace_period);
        }
    }
}

fn stop_child(child: &mut Child, grace_period: Duration) -> io::Result<PlaybackOutcome> {
    request_terminate(child)?;

    let deadline = Instant::now() + grace_period;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(PlaybackOutcome::Terminated);
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    log::debug!(
        "pid {} still running after {:?}, killing",
        child.id(),
        grace_period
    );
    match child.kill() {
        Ok(()) => {}
        // Exited between the last poll and the kill.
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => {}
        Err(err) => return Err(err),
    }
    child.wait()?;
    Ok(PlaybackOutcome::Killed)
}

#[cfg(unix)]
fn request_terminate(child: &Child) -> io::Result<()> {
    let pid = child.id() as libc::pid_t;
    if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
        let err = io::Error::last_os_error();
        // ESRCH: already gone, the next try_wait reaps it.
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn request_terminate(child: &mut Child) -> io::Result<()> {
    match child.kill() {
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
        other => other,
    }
}
