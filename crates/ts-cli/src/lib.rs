use std::ffi::OsString;

use clap::Parser;
use ts_api::{create_engine, standard_registry, CreateEngineOptions};
use ts_core::TickScriptError;
use ts_runtime::EngineOptions;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod error_map;
mod source_loader;
mod tick_runner;

pub(crate) use cli_args::{CheckArgs, Cli, Mode, RunArgs};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    map_cli_values_json,
};
pub(crate) use source_loader::load_scripts_dir;
#[cfg(test)]
pub(crate) use source_loader::{read_scripts_from_dir, resolve_scripts_dir};
pub(crate) use tick_runner::{emit_report, run_ticks};

/// Environment variable holding the log filter, e.g. `TICKSCRIPT_LOG=debug`.
pub const LOG_ENV: &str = "TICKSCRIPT_LOG";

/// Installs a stderr subscriber so stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, TickScriptError> {
    match cli.command {
        Mode::Run(args) => run_scripts(args),
        Mode::Check(args) => check_scripts(args),
    }
}

fn run_scripts(args: RunArgs) -> Result<i32, TickScriptError> {
    let scripts = load_scripts_dir(&args.scripts_dir)?;
    let mut engine_options = EngineOptions::default();
    if let Some(tick_guard) = args.tick_guard {
        engine_options.tick_guard = tick_guard;
    }

    let mut engine = create_engine(CreateEngineOptions {
        scripts,
        entry_script: args.entry_script,
        registry: None,
        engine_options: Some(engine_options),
    })?;

    let report = run_ticks(&mut engine, args.max_ticks)?;
    emit_report(&report)?;
    Ok(0)
}

fn check_scripts(args: CheckArgs) -> Result<i32, TickScriptError> {
    let scripts = load_scripts_dir(&args.scripts_dir)?;
    let registry = standard_registry();
    let mut commands = 0;
    for (path, source) in &scripts {
        commands += ts_parser::parse_script(&registry, source, path)?.len();
    }

    println!("RESULT:OK");
    println!("SCRIPTS:{}", scripts.len());
    println!("COMMANDS:{}", commands);
    Ok(0)
}
