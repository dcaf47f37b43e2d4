use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sw_client::{ClientConfig, HttpRecordRepository, API_URL_ENV};
use sw_menu::StdConsole;
use sw_tui::{App, SimulatedSensors};

#[derive(Parser, Debug)]
#[command(name = "secure-weather", version, about = "Secure Weather record console")]
struct Cli {
    /// Root of the record service API, overriding the environment and config file.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
    /// Log debug output to stderr.
    #[arg(long, short)]
    verbose: bool,
    /// Save the resolved settings to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = ClientConfig::default_path().context("failed to locate config file")?;
    let config = ClientConfig::resolve(&path, std::env::var(API_URL_ENV).ok(), cli.api_url)
        .context("invalid client configuration")?;

    if cli.save_config {
        return save_config(&config, &path);
    }

    tracing::debug!(api_url = %config.api_url, "starting session");
    let repository =
        HttpRecordRepository::new(&config).context("failed to create record client")?;
    let mut app = App::new(repository, SimulatedSensors::new()).context("failed to build menu")?;
    let mut console = StdConsole::stdio();
    app.run(&mut console)
}

fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    config.save(path).context("failed to save config")?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(default_directive(true))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
