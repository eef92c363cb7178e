mod display;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use futbot_brokers_crypto::{
    place_order, ClientConfig, Credentials, FuturesApi, FuturesClient, API_KEY_ENV, API_SECRET_ENV,
};
use futbot_core::{format_order_response, validate_order, validate_symbol, RawOrderInput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "futbot.log";

#[derive(Parser)]
#[command(name = "futbot")]
#[command(about = "Binance USDT-M Futures testnet trading bot: place orders, inspect the account, serve the web UI")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// TOML file with client settings (base_url, recv_window_ms, request_timeout_s)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the REST base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the signed request validity window (ms)
    #[arg(long)]
    recv_window: Option<u64>,

    /// Override the HTTP timeout (seconds)
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = API_SECRET_ENV, hide_env_values = true)]
    api_secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a MARKET, LIMIT or STOP_MARKET order
    PlaceOrder {
        /// Trading pair (e.g. BTCUSDT)
        #[arg(long)]
        symbol: String,

        /// BUY or SELL
        #[arg(long)]
        side: String,

        /// MARKET, LIMIT or STOP_MARKET
        #[arg(long = "type")]
        order_type: String,

        /// Order quantity
        #[arg(long)]
        qty: String,

        /// Limit price (LIMIT only)
        #[arg(long)]
        price: Option<String>,

        /// Trigger price (STOP_MARKET only)
        #[arg(long)]
        stop_price: Option<String>,

        /// Time in force for LIMIT orders (GTC, IOC, FOK)
        #[arg(long, default_value = "GTC")]
        tif: String,
    },

    /// Show balances and open positions
    Account,

    /// Latest price for a symbol
    Price {
        #[arg(long)]
        symbol: String,
    },

    /// Recent orders
    Orders {
        #[arg(long)]
        symbol: Option<String>,

        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Exchange trading rules and symbols
    ExchangeInfo,

    /// Start the web UI
    Server {
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_tracing(&cli.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("\n  [ERROR]  {err:#}\n");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => {
            tracing::info!("Finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("\n  [ERROR]  {err}\n");
            ExitCode::FAILURE
        }
    }
}

/// Console output at the requested level (`RUST_LOG` wins), plus a debug
/// log under `logs/` that rolls daily.
fn init_tracing(log_level: &str) -> Result<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("invalid log level")?;

    std::fs::create_dir_all(LOG_DIR).context("create log directory")?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, LOG_FILE));
    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .parse_lossy("hyper=info,hyper_util=info,reqwest=info,rustls=info");

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(recv_window) = cli.recv_window {
        config.recv_window_ms = recv_window;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_s = timeout;
    }
    Ok(config)
}

fn credentials(cli: &Cli) -> Result<Credentials> {
    let api_key = cli
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("{API_KEY_ENV} is not set. Export the variable in your shell."))?;
    let api_secret = cli
        .api_secret
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow!("{API_SECRET_ENV} is not set. Export the variable in your shell."))?;
    Ok(Credentials::new(api_key, api_secret)?)
}

fn connect(cli: &Cli) -> Result<FuturesClient> {
    Ok(FuturesClient::with_config(credentials(cli)?, client_config(cli)?)?)
}

async fn run(cli: Cli) -> Result<()> {
    tracing::info!(log_level = %cli.log_level, "Trading bot started");

    match &cli.command {
        Commands::PlaceOrder {
            symbol,
            side,
            order_type,
            qty,
            price,
            stop_price,
            tif,
        } => {
            let raw = RawOrderInput {
                symbol: symbol.clone(),
                side: side.clone(),
                order_type: order_type.clone(),
                quantity: qty.clone(),
                price: price.clone(),
                stop_price: stop_price.clone(),
                time_in_force: Some(tif.clone()),
            };
            // Reject bad input before any network call.
            let order = validate_order(&raw)?;
            println!("{}", display::BANNER);
            println!("{}\n", display::request_summary(&order));

            let client = connect(&cli)?;
            let response = place_order(&client, &order).await?;
            println!("{}", format_order_response(&response));
            println!("\n  [OK]  Order submitted successfully.\n");
            client.close();
        }
        Commands::Account => {
            let client = connect(&cli)?;
            let account = client.account_info().await?;
            println!("\n{}\n", display::account_report(&account));
        }
        Commands::Price { symbol } => {
            let symbol = validate_symbol(symbol)?;
            let client = connect(&cli)?;
            let data = client.symbol_price(&symbol).await?;
            println!(
                "\n  Latest price for {}: {} USDT\n",
                futbot_core::field_text(&data, "symbol").unwrap_or(symbol),
                futbot_core::field_text(&data, "price").unwrap_or_else(|| "N/A".to_string()),
            );
        }
        Commands::Orders { symbol, limit } => {
            let symbol = symbol.as_deref().map(validate_symbol).transpose()?;
            let client = connect(&cli)?;
            let orders = client.all_orders(symbol.as_deref(), *limit).await?;
            println!("\n{}\n", display::orders_report(&orders));
        }
        Commands::ExchangeInfo => {
            let client = connect(&cli)?;
            let info = client.exchange_info().await?;
            println!("\n{}\n", display::exchange_report(&info));
        }
        Commands::Server { bind } => {
            let credentials = credentials(&cli)
                .map_err(|err| tracing::warn!(error = %err, "Starting without credentials"))
                .ok();
            futbot_api::start_server(bind, client_config(&cli)?, credentials).await?;
        }
    }

    Ok(())
}
