//! Hand a file off to an external editor.
//!
//! An [`ExternalEditor`] holds an ordered list of [`EditorImpl`]s. The
//! first one whose probe command succeeds is picked the first time the
//! service is used and remembered for the life of the value. Opening a
//! file runs the editor through `sh -c` with `FILE_PATH` set, drains its
//! stderr on a scoped thread, and maps the exit status to a
//! [`LaunchError`].

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One way of launching an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorImpl {
    pub name: String,
    /// Shell command whose success means the editor is installed
    pub test_command: String,
    /// Shell command template; `$FILE_PATH` names the file to edit
    pub command: String,
}

impl EditorImpl {
    pub fn new(
        name: impl Into<String>,
        test_command: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            test_command: test_command.into(),
            command: command.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no external editor found")]
    NoEditorAvailable,
    #[error("failed to start editor: {0}")]
    SpawnFailure(#[from] io::Error),
    #[error("editor failed with signal {signal}")]
    SignalTermination { signal: i32 },
    #[error("editor failed with status {status} -- {diagnostics}")]
    NonZeroExit { status: i32, diagnostics: String },
}

/// Editor detection and launching.
///
/// Detection runs at most once per value; the result (including "none
/// available") is never recomputed.
#[derive(Debug)]
pub struct ExternalEditor {
    impls: Vec<EditorImpl>,
    detected: OnceLock<Option<EditorImpl>>,
}

static GLOBAL: OnceLock<ExternalEditor> = OnceLock::new();

impl ExternalEditor {
    pub const fn new(impls: Vec<EditorImpl>) -> Self {
        Self {
            impls,
            detected: OnceLock::new(),
        }
    }

    /// Install the process-wide service used by [`open`].
    ///
    /// Only the first call takes effect; later calls return the service
    /// that is already installed.
    pub fn install(impls: Vec<EditorImpl>) -> &'static Self {
        let mut installed = false;
        let editor = GLOBAL.get_or_init(|| {
            installed = true;
            Self::new(impls)
        });
        if !installed {
            tracing::warn!("external editor service already installed");
        }
        editor
    }

    /// The process-wide service, if [`ExternalEditor::install`] ran.
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }

    pub fn impls(&self) -> &[EditorImpl] {
        &self.impls
    }

    /// The editor that will be used, probing on first call.
    pub fn detected(&self) -> Option<&EditorImpl> {
        self.detected.get_or_init(|| detect(&self.impls)).as_ref()
    }

    /// Edit `path` and block until the editor exits.
    pub fn open(&self, path: &Path) -> Result<(), LaunchError> {
        let editor = self.detected().ok_or(LaunchError::NoEditorAvailable)?;
        let path = std::path::absolute(path)?;
        tracing::info!(
            editor = %editor.name,
            command = %editor.command,
            path = %path.display(),
            "opening external editor"
        );

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&editor.command)
            .env("FILE_PATH", &path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;
        tracing::debug!(pid = child.id(), "editor started");

        let (status, diagnostics) = wait_with_diagnostics(&mut child)?;
        check_status(status, diagnostics)
    }
}

/// Open `path` with the installed service.
pub fn open(path: &Path) -> Result<(), LaunchError> {
    ExternalEditor::global()
        .ok_or(LaunchError::NoEditorAvailable)?
        .open(path)
}

fn detect(impls: &[EditorImpl]) -> Option<EditorImpl> {
    tracing::debug!(count = impls.len(), "detecting external editor");
    if impls.is_empty() {
        tracing::error!("no external editor implementations given!");
        return None;
    }
    for candidate in impls {
        let ok = Command::new("sh")
            .arg("-c")
            .arg(&candidate.test_command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        tracing::debug!(name = %candidate.name, ok, "probed editor");
        if ok {
            tracing::info!(name = %candidate.name, "detected external editor");
            return Some(candidate.clone());
        }
    }
    tracing::warn!("none of the external editors are available");
    None
}

// Reading stderr while waiting keeps a chatty editor from blocking on a
// full pipe.
fn wait_with_diagnostics(child: &mut Child) -> io::Result<(ExitStatus, String)> {
    let stderr = child.stderr.take();
    thread::scope(|scope| {
        let reader = stderr.and_then(|pipe| {
            thread::Builder::new()
                .name("editor-stderr".into())
                .spawn_scoped(scope, move || drain(pipe))
                .inspect_err(|err| tracing::warn!(%err, "could not start stderr reader"))
                .ok()
        });
        let status = child.wait()?;
        let diagnostics = reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        tracing::debug!(%status, bytes = diagnostics.len(), "editor stderr closed");
        Ok((status, diagnostics))
    })
}

fn drain(mut pipe: ChildStderr) -> String {
    let mut buf = Vec::new();
    if let Err(err) = pipe.read_to_end(&mut buf) {
        tracing::debug!(%err, "editor stderr read failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn check_status(status: ExitStatus, diagnostics: String) -> Result<(), LaunchError> {
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(LaunchError::NonZeroExit {
            status: code,
            diagnostics,
        }),
        None => Err(LaunchError::SignalTermination {
            signal: termination_signal(status),
        }),
    }
}

#[cfg(unix)]
fn termination_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or_default()
}

#[cfg(not(unix))]
const fn termination_signal(_status: ExitStatus) -> i32 {
    0
}
