use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ts_api::SCRIPT_EXTENSION;
use ts_core::TickScriptError;
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan};

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, TickScriptError> {
    let path = PathBuf::from(scripts_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(TickScriptError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(TickScriptError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

/// Reads every `.tks` file below `scripts_dir`, keyed by relative path.
pub(crate) fn read_scripts_from_dir(
    scripts_dir: &Path,
) -> Result<BTreeMap<String, String>, TickScriptError> {
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(scripts_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
        scripts.insert(relative, content);
    }

    if scripts.is_empty() {
        return Err(TickScriptError::new(
            "CLI_SOURCE_EMPTY",
            format!(
                "No .{} files under {}",
                SCRIPT_EXTENSION,
                scripts_dir.display()
            ),
        ));
    }

    tracing::debug!(dir = %scripts_dir.display(), files = scripts.len(), "loaded scripts");
    Ok(scripts)
}

pub(crate) fn load_scripts_dir(
    scripts_dir: &str,
) -> Result<BTreeMap<String, String>, TickScriptError> {
    let root = resolve_scripts_dir(scripts_dir)?;
    read_scripts_from_dir(&root)
}
