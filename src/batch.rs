//! Applies one transform over a file tree.
//!
//! Plain module files are rewritten in place; container files go through
//! [`transact`]. A file that fails is recorded and the walk goes on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cleanup::Transform;
use crate::config::Settings;
use crate::container::{transact, ContainerCodec, ContainerError, V8Unpack};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Changed,
    Unchanged,
    /// A container that is not the configured module container.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub transform: String,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_skipped: usize,
    pub changed: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    fn record(&mut self, path: &Path, result: Result<FileOutcome, ProcessError>) {
        self.files_scanned += 1;
        match result {
            Ok(FileOutcome::Changed) => {
                self.files_changed += 1;
                self.changed.push(path.to_path_buf());
            }
            Ok(FileOutcome::Unchanged) => {}
            Ok(FileOutcome::Skipped) => self.files_skipped += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "file failed");
                self.failures.push(Failure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }
}

pub struct BatchRunner<'a> {
    transform: Transform,
    settings: &'a Settings,
    codec: Option<Box<dyn ContainerCodec + 'a>>,
    dry_run: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(transform: Transform, settings: &'a Settings) -> Self {
        Self {
            transform,
            settings,
            codec: None,
            dry_run: false,
        }
    }

    /// Use `codec` for containers instead of resolving the external tool.
    pub fn with_codec(mut self, codec: Box<dyn ContainerCodec + 'a>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Walk `root` (a file or a directory) and process every matching file.
    pub fn run(&self, root: &Path) -> BatchReport {
        let mut report = BatchReport {
            transform: self.transform.name().to_string(),
            dry_run: self.dry_run,
            ..BatchReport::default()
        };

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    warn!(path = %path.display(), error = %e, "cannot walk");
                    report.failures.push(Failure {
                        path,
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.settings.wants_extension(entry.path()) {
                continue;
            }
            let result = self.process_file(entry.path());
            report.record(entry.path(), result);
        }

        info!(
            transform = %report.transform,
            scanned = report.files_scanned,
            changed = report.files_changed,
            failed = report.failures.len(),
            "run finished"
        );
        report
    }

    pub fn process_file(&self, path: &Path) -> Result<FileOutcome, ProcessError> {
        let outcome = if self.settings.is_container(path) {
            if !self.settings.is_target_container(path) {
                debug!(path = %path.display(), "not a module container, skipped");
                return Ok(FileOutcome::Skipped);
            }
            self.process_container(path)?
        } else {
            self.process_plain(path)?
        };

        if outcome == FileOutcome::Changed {
            info!(path = %path.display(), dry_run = self.dry_run, "changed");
        }
        Ok(outcome)
    }

    fn process_plain(&self, path: &Path) -> Result<FileOutcome, ProcessError> {
        let bytes = fs::read(path).map_err(|source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let (modified, changed) = self.transform.apply(&text, &self.settings.dialect);
        if !changed {
            return Ok(FileOutcome::Unchanged);
        }
        if !self.dry_run {
            fs::write(path, modified.as_bytes()).map_err(|source| ProcessError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(FileOutcome::Changed)
    }

    fn process_container(&self, path: &Path) -> Result<FileOutcome, ProcessError> {
        let changed = match &self.codec {
            Some(codec) => self.transact_with(codec.as_ref(), path)?,
            None => {
                let tool = V8Unpack::locate(self.settings.tool.as_deref())?
                    .with_timeout(self.settings.tool_timeout());
                self.transact_with(&tool, path)?
            }
        };
        Ok(if changed {
            FileOutcome::Changed
        } else {
            FileOutcome::Unchanged
        })
    }

    fn transact_with<C>(&self, codec: &C, path: &Path) -> Result<bool, ContainerError>
    where
        C: ContainerCodec + ?Sized,
    {
        let mut would_change = false;
        let written = transact(codec, path, |text| {
            let (modified, changed) = self.transform.apply(text, &self.settings.dialect);
            if self.dry_run {
                // report the change but take the no-op path
                would_change = changed;
                (modified, false)
            } else {
                (modified, changed)
            }
        })?;
        Ok(written || would_change)
    }
}
