use crate::source::SourceError;
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// True if a process with this pid exists, whoever owns it.
pub fn is_alive(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    matches!(kill(Pid::from_raw(raw), None), Ok(()) | Err(Errno::EPERM))
}

/// `<tabulate_dir>/<log>.pid`: the worker currently tabulating a log.
#[derive(Debug, Clone)]
pub struct PidMarker {
    path: PathBuf,
}

impl PidMarker {
    pub fn new(tabulate_dir: &Path, log: &str) -> Self {
        Self {
            path: tabulate_dir.join(format!("{log}.pid")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded worker, if it is still running. Stale markers are removed.
    pub fn running(&self) -> Result<Option<u32>, SourceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SourceError::io(&self.path, e)),
        };

        match text.trim().parse::<u32>() {
            Ok(pid) if is_alive(pid) => Ok(Some(pid)),
            _ => {
                tracing::debug!(marker = %self.path.display(), "removing stale pid marker");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn write(&self, pid: u32) -> Result<(), SourceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| SourceError::io(dir, e))?;
        }
        fs::write(&self.path, format!("{pid}\n")).map_err(|e| SourceError::io(&self.path, e))
    }

    pub fn clear(&self) -> Result<(), SourceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SourceError::io(&self.path, e)),
        }
    }
}
