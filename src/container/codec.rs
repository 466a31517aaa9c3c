use std::env;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use super::error::{ContainerError, Stage};

#[cfg(windows)]
pub const DEFAULT_TOOL_NAME: &str = "v8unpack_local.exe";
#[cfg(not(windows))]
pub const DEFAULT_TOOL_NAME: &str = "v8unpack";

/// Unpacks a container into a directory and packs a directory back.
pub trait ContainerCodec {
    fn unpack(&self, container: &Path, workspace: &Path) -> Result<(), ContainerError>;
    fn pack(&self, workspace: &Path, output: &Path) -> Result<(), ContainerError>;
}

/// Codec backed by the external `v8unpack` executable.
#[derive(Debug, Clone)]
pub struct V8Unpack {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl V8Unpack {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Resolve the tool (see [`resolve_tool`]) and wrap it.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ContainerError> {
        resolve_tool(explicit).map(Self::new)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `<tool> <mode> <from> <to>`; `Ok(Err(diagnostic))` on a
    /// non-zero exit.
    fn run(
        &self,
        stage: Stage,
        mode: &str,
        from: &Path,
        to: &Path,
    ) -> Result<Result<(), String>, ContainerError> {
        let args = [OsStr::new(mode), from.as_os_str(), to.as_os_str()];
        debug!(command = %render_command(&self.program, &args), "running {stage}");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ContainerError::io(stage, &self.program))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(limit) => match child
                .wait_timeout(limit)
                .map_err(ContainerError::io(stage, &self.program))?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ContainerError::TimedOut {
                        stage,
                        after: limit,
                    });
                }
            },
            None => child
                .wait()
                .map_err(ContainerError::io(stage, &self.program))?,
        };

        if status.success() {
            return Ok(Ok(()));
        }
        Ok(Err(diagnostic(status, collect(stdout), collect(stderr))))
    }
}

impl ContainerCodec for V8Unpack {
    fn unpack(&self, container: &Path, workspace: &Path) -> Result<(), ContainerError> {
        self.run(Stage::Unpack, "-unpack", container, workspace)?
            .map_err(|diagnostic| ContainerError::UnpackFailed {
                container: container.to_path_buf(),
                diagnostic,
            })
    }

    fn pack(&self, workspace: &Path, output: &Path) -> Result<(), ContainerError> {
        self.run(Stage::Pack, "-pack", workspace, output)?
            .map_err(|diagnostic| ContainerError::PackFailed {
                workspace: workspace.to_path_buf(),
                diagnostic,
            })
    }
}

/// Find the unpack tool.
///
/// An explicit setting wins (as a path, or as a name looked up on `PATH`).
/// Otherwise the default name is searched on `PATH`, next to the running
/// executable, then in the current directory.
pub fn resolve_tool(explicit: Option<&Path>) -> Result<PathBuf, ContainerError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return which::which(path).map_err(|_| ContainerError::ToolNotFound {
            name: path.display().to_string(),
            remediation: "check the configured tool path".to_string(),
        });
    }

    if let Ok(found) = which::which(DEFAULT_TOOL_NAME) {
        return Ok(found);
    }

    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_TOOL_NAME)));
    let in_cwd = env::current_dir()
        .ok()
        .map(|dir| dir.join(DEFAULT_TOOL_NAME));

    beside_exe
        .into_iter()
        .chain(in_cwd)
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ContainerError::ToolNotFound {
            name: DEFAULT_TOOL_NAME.to_string(),
            remediation: "add it to PATH, put it next to this executable or in the working \
                          directory, or set `tool` in the settings file"
                .to_string(),
        })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default()
}

fn diagnostic(status: ExitStatus, stdout: String, stderr: String) -> String {
    if !stderr.is_empty() {
        stderr
    } else if !stdout.is_empty() {
        stdout
    } else {
        format!("tool exited with {status}")
    }
}

fn render_command(program: &Path, args: &[&OsStr]) -> String {
    let words: Vec<String> = std::iter::once(program.as_os_str())
        .chain(args.iter().copied())
        .map(|w| w.to_string_lossy().into_owned())
        .collect();
    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}
