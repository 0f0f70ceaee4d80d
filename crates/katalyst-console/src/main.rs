use clap::Parser;
use katalyst_console::{commands, console, logging, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.is_console() {
        let log_file = config.log_file_path();
        logging::init_file(&config.log_level, &log_file)?;
        tracing::info!(log_file = %log_file.display(), "logging to file");
        return console::run(config).await;
    }

    logging::init_stderr(&config.log_level);
    commands::run(cli.command(), &config, cli.json).await
}
