//! Transactional edit of the text module embedded in a container file.
//!
//! The container is unpacked into a private workspace, the module text is
//! handed to a callback, and only a successfully repacked replacement is
//! copied over the original. The workspace and the repacked temporary are
//! removed on every exit path.

mod codec;
mod error;
mod module;

pub use codec::{resolve_tool, ContainerCodec, V8Unpack, DEFAULT_TOOL_NAME};
pub use error::{ContainerError, Stage};
pub use module::{find_module_file, MODULE_FILE_NAME};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Apply `modify` to the container's text module.
///
/// `modify` gets the module text and returns the new text plus whether it
/// changed. Returns `Ok(false)` for a no-op, in which case the container is
/// not rewritten at all.
pub fn transact<C, F>(codec: &C, container: &Path, modify: F) -> Result<bool, ContainerError>
where
    C: ContainerCodec + ?Sized,
    F: FnOnce(&str) -> (String, bool),
{
    if !container.is_file() {
        return Err(ContainerError::NotFound(container.to_path_buf()));
    }

    // Dropped (and deleted) on every return below.
    let workspace = tempfile::Builder::new()
        .prefix("v8unpack_")
        .tempdir()
        .map_err(ContainerError::io(Stage::Workspace, env::temp_dir()))?;

    codec.unpack(container, workspace.path())?;

    let module = find_module_file(workspace.path())?;
    let bytes = fs::read(&module).map_err(ContainerError::io(Stage::ReadModule, &module))?;
    let text = String::from_utf8_lossy(&bytes);

    let (modified, changed) = modify(&text);
    if !changed {
        debug!(container = %container.display(), "module unchanged, skipping repack");
        return Ok(false);
    }

    fs::write(&module, modified.as_bytes())
        .map_err(ContainerError::io(Stage::WriteModule, &module))?;

    let repacked = ScratchFile::new(repacked_path(container));
    codec.pack(workspace.path(), repacked.path())?;

    fs::copy(repacked.path(), container).map_err(ContainerError::io(Stage::Replace, container))?;
    debug!(container = %container.display(), "container replaced");
    Ok(true)
}

/// Sibling path the repacked container is written to, `Form.bin` ->
/// `Form.new.bin`.
pub fn repacked_path(container: &Path) -> PathBuf {
    let stem = container
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match container.extension() {
        Some(ext) => format!("{stem}.new.{}", ext.to_string_lossy()),
        None => format!("{stem}.new"),
    };
    container.with_file_name(name)
}

/// A path that is deleted (if it exists) when the guard goes out of scope.
#[derive(Debug)]
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
