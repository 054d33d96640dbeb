use anyhow::Result;
use clap::Parser;
use famplan::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = famplan::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    famplan::observability::init_observability(
        "famplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    let mut stdout = std::io::stdout().lock();
    famplan::cli::run(cli, config, &mut stdout).await
}
