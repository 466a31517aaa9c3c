use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::ContainerError;

pub const MODULE_FILE_NAME: &str = "module.data";

/// Locate the single text module in an unpacked container.
///
/// `src/module.data` is taken as is; otherwise the whole tree is searched
/// and exactly one match is required.
pub fn find_module_file(workspace: &Path) -> Result<PathBuf, ContainerError> {
    let fixed = workspace.join("src").join(MODULE_FILE_NAME);
    if fixed.is_file() {
        return Ok(fixed);
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(workspace)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == MODULE_FILE_NAME)
        .map(|e| e.into_path())
        .collect();

    match candidates.len() {
        0 => Err(ContainerError::ModuleNotFound(workspace.to_path_buf())),
        1 => Ok(candidates.remove(0)),
        _ => {
            candidates.sort();
            Err(ContainerError::AmbiguousModule {
                workspace: workspace.to_path_buf(),
                candidates,
            })
        }
    }
}
