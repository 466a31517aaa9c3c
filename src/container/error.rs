use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Step of a container transaction, carried by errors for context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Workspace,
    Unpack,
    ReadModule,
    WriteModule,
    Pack,
    Replace,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Workspace => "workspace setup",
            Stage::Unpack => "unpack",
            Stage::ReadModule => "module read",
            Stage::WriteModule => "module write",
            Stage::Pack => "pack",
            Stage::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// Everything that can go wrong while round-tripping a container.
///
/// The original container is untouched for every variant except an
/// [`Stage::Replace`] I/O failure.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("container not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unpack tool `{name}` not found; {remediation}")]
    ToolNotFound { name: String, remediation: String },

    #[error("failed to unpack {}: {diagnostic}", .container.display())]
    UnpackFailed {
        container: PathBuf,
        diagnostic: String,
    },

    #[error("failed to pack {}: {diagnostic}", .workspace.display())]
    PackFailed {
        workspace: PathBuf,
        diagnostic: String,
    },

    #[error("{stage} timed out after {}s", .after.as_secs())]
    TimedOut { stage: Stage, after: Duration },

    #[error("no module.data found under {}", .0.display())]
    ModuleNotFound(PathBuf),

    #[error("{} module.data files found under {}", .candidates.len(), .workspace.display())]
    AmbiguousModule {
        workspace: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("{stage} failed for {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContainerError {
    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ContainerError::Io {
            stage,
            path,
            source,
        }
    }
}
