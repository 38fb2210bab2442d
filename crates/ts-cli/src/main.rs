fn main() {
    ts_cli::init_tracing();
    let exit_code = ts_cli::run_cli_from_args(std::env::args_os());
    std::process::exit(exit_code);
}
