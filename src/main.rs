use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use btcprice::config::{default_config_path, Config};
use btcprice::duration::format_duration;
use btcprice::market_data::{PriceService, StaticTickerSource};
use chrono::{Local, SecondsFormat};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    btcprice::duration::parse_duration(s).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "btcprice")]
#[command(about = "Fetch the current Bitcoin price from the Blockchain.com ticker")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
)]
struct Cli {
    /// Path to config file (defaults to ./btcprice.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Currency to report, overriding the config file
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Request timeout (e.g. "2s", "500ms"), overriding the config file
    #[arg(long, global = true, value_parser = parse_duration_arg)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current quotation once
    Price {
        /// Read the ticker payload from this file instead of the network
        #[arg(long)]
        payload: Option<PathBuf>,

        /// Print the quotation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll the ticker and print the last price whenever it changes
    Watch {
        /// Delay between refreshes (e.g. "60s", "5m")
        #[arg(long, value_parser = parse_duration_arg)]
        interval: Option<Duration>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    if let Some(currency) = cli.currency {
        config.currency = currency;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }

    match cli.command.unwrap_or(Command::Price {
        payload: None,
        json: false,
    }) {
        Command::Price { payload, json } => price(&config, payload, json).await,
        Command::Watch { interval } => {
            let interval = interval.unwrap_or(config.watch.interval);
            watch(&config, interval).await
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            print!("{}", toml::to_string(&config)?);
            Ok(())
        }
    }
}

async fn price(config: &Config, payload: Option<PathBuf>, json: bool) -> Result<()> {
    let service = match payload {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
            PriceService::with_source(StaticTickerSource::new(bytes), &config.currency).await?
        }
        None => PriceService::new(config)
            .await
            .with_context(|| format!("Failed to fetch price from {}", config.endpoint))?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(service.view())?);
        return Ok(());
    }

    let quotation = service.quotation();
    let symbol = quotation.symbol.as_deref().unwrap_or("");
    println!("Bitcoin price ({})", service.currency());
    println!("  last:       {symbol}{}", quotation.last);
    println!("  15m market: {symbol}{}", quotation.market);
    println!("  buy:        {symbol}{}", quotation.buy);
    println!("  sell:       {symbol}{}", quotation.sell);
    Ok(())
}

async fn watch(config: &Config, interval: Duration) -> Result<()> {
    // A zero delay would poll the endpoint in a tight loop.
    if interval.is_zero() {
        bail!("watch interval must be greater than zero");
    }

    let mut service = PriceService::new(config)
        .await
        .with_context(|| format!("Failed to fetch price from {}", config.endpoint))?;

    let mut last = service.last();
    print_tick(last);
    info!(
        currency = %service.currency(),
        interval = %format_duration(interval),
        "watching Bitcoin price"
    );

    loop {
        let sleep = tokio::time::sleep(interval);
        tokio::pin!(sleep);

        tokio::select! {
            _ = &mut sleep => {
                if let Err(err) = service.refresh(None).await {
                    warn!(error = %err, "price refresh failed");
                    continue;
                }
                if service.last() != last {
                    last = service.last();
                    print_tick(last);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping price watch");
                break;
            }
        }
    }

    Ok(())
}

fn print_tick(price: f64) {
    println!("{}", Local::now().to_rfc3339_opts(SecondsFormat::Secs, false));
    println!("Bitcoin price: {price}");
}
