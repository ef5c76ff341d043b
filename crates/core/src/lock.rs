use crate::error::LockError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Exclusive single-run lock. Two pipeline runs over the same artifact
/// paths are undefined, so the CLI takes this lock before any mutating
/// command. The lock file holds the owning PID and is removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|error| {
                if error.kind() == std::io::ErrorKind::AlreadyExists {
                    LockError::Held(path.to_path_buf())
                } else {
                    LockError::Io(error)
                }
            })?;

        writeln!(file, "{}", std::process::id())?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %error, "could not remove lock file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunLock;
    use crate::error::LockError;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_while_lock_is_held() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("run.lock");

        let held = RunLock::acquire(&path)?;
        let second = RunLock::acquire(&path);

        assert!(matches!(second, Err(LockError::Held(_))));
        drop(held);
        Ok(())
    }

    #[test]
    fn dropping_the_lock_releases_it() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("run.lock");

        drop(RunLock::acquire(&path)?);
        let reacquired = RunLock::acquire(&path)?;

        assert_eq!(reacquired.path(), path);
        Ok(())
    }
}
