//! Background `go mod tidy` after scaffolding.
//!
//! The task is best effort. It never changes the outcome of a generation run;
//! a failure is logged as a warning. Callers that want to wait may [`TidyHandle::wait`].

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Environment variable overriding the `go` binary used for tidying.
pub const GO_BIN_ENV: &str = "GOSTART_GO_BIN";

/// Outcome of a finished tidy task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TidyOutcome {
    Succeeded,
    Failed(String),
}

/// Handle to a running `go mod tidy`.
pub struct TidyHandle {
    dir: PathBuf,
    handle: JoinHandle<TidyOutcome>,
}

impl std::fmt::Debug for TidyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidyHandle")
            .field("dir", &self.dir)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

impl TidyHandle {
    /// Spawn `<go_bin> mod tidy` in `dir`. `GOSTART_GO_BIN` wins over `go_bin`.
    pub fn spawn(dir: &Path, go_bin: &str) -> Self {
        let bin = env::var(GO_BIN_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| go_bin.to_string());
        let dir = dir.to_path_buf();
        let work_dir = dir.clone();
        let handle = thread::spawn(move || run_tidy(&bin, &work_dir));
        TidyHandle { dir, handle }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Block until the task finishes.
    pub fn wait(self) -> TidyOutcome {
        match self.handle.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                let msg = "tidy task panicked".to_string();
                warn!(dir = %self.dir.display(), "{msg}");
                TidyOutcome::Failed(msg)
            }
        }
    }
}

fn run_tidy(bin: &str, dir: &Path) -> TidyOutcome {
    let output = Command::new(bin)
        .args(["mod", "tidy"])
        .current_dir(dir)
        .output();
    match output {
        Ok(out) if out.status.success() => {
            info!(dir = %dir.display(), "go mod tidy finished");
            TidyOutcome::Succeeded
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            warn!(dir = %dir.display(), status = %out.status, %stderr, "go mod tidy failed");
            TidyOutcome::Failed(format!("{}: {stderr}", out.status))
        }
        Err(e) => {
            warn!(dir = %dir.display(), bin, error = %e, "could not run go mod tidy");
            TidyOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, OnceLock};

    // Serialize environment mutations to avoid test races
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn stub(dir: &Path, exit_code: i32) -> PathBuf {
        let stub = dir.join("go");
        fs::write(
            &stub,
            format!(
                "#!/bin/sh\nif [ \"$1\" = \"mod\" ] && [ \"$2\" = \"tidy\" ]; then\n    echo tidy >&2\n    exit {exit_code}\nfi\nexit 2\n"
            ),
        )
        .unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();
        stub
    }

    #[test]
    fn test_tidy_succeeds_with_stub() {
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), 0);
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let handle = TidyHandle::spawn(dir.path(), bin.to_str().unwrap());
        assert_eq!(handle.dir(), dir.path());
        assert_eq!(handle.wait(), TidyOutcome::Succeeded);
    }

    #[test]
    fn test_tidy_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), 1);
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let outcome = TidyHandle::spawn(dir.path(), bin.to_str().unwrap()).wait();
        assert!(matches!(outcome, TidyOutcome::Failed(ref msg) if msg.contains("tidy")));
    }

    #[test]
    fn test_missing_binary_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let missing = dir.path().join("no-such-go");
        let outcome = TidyHandle::spawn(dir.path(), missing.to_str().unwrap()).wait();
        assert!(matches!(outcome, TidyOutcome::Failed(_)));
    }

    #[test]
    fn test_env_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), 0);
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let old_bin = env::var(GO_BIN_ENV).ok();
        env::set_var(GO_BIN_ENV, &bin);
        let handle = TidyHandle::spawn(dir.path(), "definitely-not-go");
        match old_bin {
            Some(v) => env::set_var(GO_BIN_ENV, v),
            None => env::remove_var(GO_BIN_ENV),
        }
        assert_eq!(handle.wait(), TidyOutcome::Succeeded);
    }
}
