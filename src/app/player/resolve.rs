use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PlayerCommand, PlayerResolver};

/// Known players in priority order, with the flags that keep them quiet
/// and make them exit when the file ends.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "error"]),
    ("mpg123", &["-q"]),
    ("aplay", &["-q"]),
    ("paplay", &[]),
];

#[derive(Debug, Clone)]
pub(crate) struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    pub(crate) fn new(search_path: Option<OsString>) -> Self {
        Self { search_path }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(env::var_os("PATH"))
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

impl PlayerResolver for PathResolver {
    fn resolve(&self) -> Option<PlayerCommand> {
        CANDIDATES.iter().find_map(|(name, args)| {
            let found = self.find_executable(name)?;
            log::debug!("found {name} at {}", found.display());
            Some(PlayerCommand::new(name, args))
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    if fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false) {
        return true;
    }
    fs::metadata(path.with_extension("exe"))
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
