use famplan::{
    Config,
    cli::Cli,
    config::{DatabaseConfig, ObservabilityConfig, ShoppingConfig},
};
use clap::Parser;
use temp_dir::TempDir;

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("famplan.db").display()),
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        shopping: ShoppingConfig::default(),
    }
}

/// Runs the CLI with `args` and returns what it printed.
pub async fn famplan(config: &Config, args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("famplan").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    famplan::cli::run(cli, config.clone(), &mut out).await?;

    Ok(String::from_utf8(out)?)
}
