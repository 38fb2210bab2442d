use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tickscript")]
#[command(about = "Tick-driven command script runner")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Run(RunArgs),
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "entry-script")]
    pub(crate) entry_script: Option<String>,
    #[arg(long = "max-ticks", default_value_t = 1000)]
    pub(crate) max_ticks: usize,
    #[arg(long = "tick-guard")]
    pub(crate) tick_guard: Option<usize>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
}
