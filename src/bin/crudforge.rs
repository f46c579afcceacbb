use clap::Parser;
use crudforge::cli::{run_cli, Cli};
use crudforge::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(e) = init_logging_with_config(&log_config) {
        eprintln!("Warning: {e:#}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(run_cli(cli))?;
    std::process::exit(code);
}
