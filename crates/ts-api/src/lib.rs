use std::collections::BTreeMap;

use ts_core::TickScriptError;
use ts_runtime::{CommandRegistry, Engine, EngineOptions, DEFAULT_SCRIPT_NAME};

mod stdlib;

pub use stdlib::{standard_registry, LOG_KEY};

pub const SCRIPT_EXTENSION: &str = "tks";

pub struct CreateEngineOptions {
    /// Script sources keyed by path; the script name is the file stem.
    pub scripts: BTreeMap<String, String>,
    pub entry_script: Option<String>,
    pub registry: Option<CommandRegistry>,
    pub engine_options: Option<EngineOptions>,
}

/// Parses `source` and appends the commands to `script_name` in `engine`.
pub fn load_script(
    engine: &mut Engine,
    registry: &CommandRegistry,
    source: &str,
    file: &str,
    script_name: Option<&str>,
) -> Result<usize, TickScriptError> {
    let commands = ts_parser::parse_script(registry, source, file)?;
    let count = commands.len();
    engine.register(commands, script_name);
    Ok(count)
}

/// Builds an engine from a set of script files.
///
/// Every file is parsed before anything is registered, and the entry script
/// is registered first so it owns the initial player.
pub fn create_engine(options: CreateEngineOptions) -> Result<Engine, TickScriptError> {
    let registry = options.registry.unwrap_or_else(standard_registry);
    let mut parsed = BTreeMap::new();
    for (path, source) in &options.scripts {
        let script_name = script_name_from_path(path);
        if parsed.contains_key(&script_name) {
            return Err(TickScriptError::new(
                "API_SCRIPT_DUPLICATE",
                format!("Script \"{}\" is defined by more than one file.", script_name),
            ));
        }
        let commands = ts_parser::parse_script(&registry, source, path)?;
        parsed.insert(script_name, commands);
    }

    let entry_script = resolve_entry_script(&parsed, options.entry_script)?;
    let mut engine = Engine::with_options(options.engine_options.unwrap_or_default());
    if let Some(commands) = parsed.remove(&entry_script) {
        engine.register(commands, Some(&entry_script));
    }
    for (script_name, commands) in parsed {
        engine.register(commands, Some(&script_name));
    }
    Ok(engine)
}

pub fn script_name_from_path(path: &str) -> String {
    let file_name = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
    file_name
        .strip_suffix(&format!(".{}", SCRIPT_EXTENSION))
        .unwrap_or(file_name)
        .to_string()
}

fn resolve_entry_script<T>(
    scripts: &BTreeMap<String, T>,
    explicit: Option<String>,
) -> Result<String, TickScriptError> {
    if let Some(entry) = explicit {
        if !scripts.contains_key(&entry) {
            return Err(TickScriptError::new(
                "API_ENTRY_SCRIPT_NOT_FOUND",
                format!("Entry script \"{}\" is not registered.", entry),
            ));
        }
        return Ok(entry);
    }

    if scripts.contains_key(DEFAULT_SCRIPT_NAME) {
        return Ok(DEFAULT_SCRIPT_NAME.to_string());
    }

    Err(TickScriptError::new(
        "API_ENTRY_MAIN_NOT_FOUND",
        format!(
            "Expected a script named \"{}\" as default entry.",
            DEFAULT_SCRIPT_NAME
        ),
    ))
}
