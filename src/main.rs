//! Goal sniper entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use goal_sniper::catalog::{CatalogResolver, GammaResolver};
use goal_sniper::config::Config;
use goal_sniper::execution::{ClobGateway, Dispatcher};
use goal_sniper::metrics;
use goal_sniper::server::{create_router, ServerContext, Session};
use goal_sniper::signing::address_from_private_key;
use goal_sniper::utils::shutdown_signal;

/// Goal-triggered Polymarket sniper for live football matches.
#[derive(Parser, Debug)]
#[command(name = "goal-sniper")]
#[command(about = "Snipe conditional football markets the moment a goal goes in")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the operator server (default).
    Run {
        /// Listen port override.
        #[arg(short, long)]
        port: Option<u16>,

        /// Run in dry-run mode (no real orders).
        #[arg(long)]
        dry_run: Option<bool>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Check wallet address and USDC balance.
    CheckBalance,

    /// Resolve an event slug and print its tradable markets.
    ResolveEvent {
        /// Event slug or full event URL.
        slug: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("goal_sniper=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckBalance) => cmd_check_balance().await,
        Some(Command::ResolveEvent { slug }) => cmd_resolve_event(&slug).await,
        Some(Command::Run { port, dry_run }) => cmd_run(port, dry_run).await,
        None => cmd_run(None, None).await,
    }
}

/// Load and validate configuration; failures here are fatal.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("failed to load configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    if let Err(e) = config.validate() {
        error!("invalid configuration: {}", e);
        return Err(anyhow::anyhow!("configuration validation failed: {e}"));
    }

    Ok(config)
}

/// Run the operator server.
async fn cmd_run(port_override: Option<u16>, dry_run_override: Option<bool>) -> anyhow::Result<()> {
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(dry_run) = dry_run_override {
        config.dry_run = dry_run;
    }

    info!("configuration loaded");
    info!(
        "mode: {}",
        if config.dry_run { "SIMULATION" } else { "LIVE TRADING" }
    );
    info!("per-order deadline: {}ms", config.execution_timeout_ms);

    if config.metrics_enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!("prometheus exporter on {}", addr);
    }

    let resolver: Arc<dyn CatalogResolver> = Arc::new(GammaResolver::new(&config));
    let gateway = Arc::new(ClobGateway::new(&config));
    info!("wallet: {}", gateway.address()?);

    let dispatcher = Dispatcher::new(
        gateway,
        Duration::from_millis(config.execution_timeout_ms),
    );
    let session = Arc::new(Session::new(resolver, dispatcher));

    let router = create_router(ServerContext::new(session));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("operator console on http://localhost:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GOAL SNIPER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("configuration validation failed"));
        }
    }

    print!("Checking private key... ");
    match address_from_private_key(&config.private_key) {
        Ok(addr) => {
            println!("OK");
            println!("  Wallet address: {}", addr);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("private key invalid"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  Signature Type: {} ({})",
        config.signature_type,
        match config.signature_type {
            0 => "EOA - Standard wallet",
            1 => "Magic.link - Proxy wallet",
            2 => "Gnosis Safe - Multi-sig",
            _ => "Unknown",
        }
    );

    if config.is_magic_link() {
        match &config.funder {
            Some(funder) => println!("  Funder Address: {}", funder),
            None => println!("  WARNING: Magic.link requires FUNDER to be set!"),
        }
    }

    println!("  CLOB URL: {}", config.clob_url);
    println!("  Gamma URL: {}", config.gamma_url);
    println!("  Per-order Deadline: {}ms", config.execution_timeout_ms);
    println!("  Dry Run: {}", config.dry_run);
    println!("  Listen Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check wallet address and USDC balance.
async fn cmd_check_balance() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GOAL SNIPER - BALANCE CHECK");
    println!("======================================================================");

    let config = load_config()?;

    println!("Host: {}", config.clob_url);
    println!("Signature Type: {}", config.signature_type);

    print!("\n1. Creating gateway... ");
    let gateway = ClobGateway::new(&config);
    println!("OK");

    print!("\n2. Getting wallet address... ");
    let address = gateway.address()?;
    println!("OK");
    println!("   Address: {}", address);

    print!("\n3. Getting USDC balance... ");
    match gateway.balance().await {
        Ok(balance) => {
            println!("OK");
            println!("   USDC Balance: ${}", balance);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    println!("\n======================================================================");
    println!("BALANCE CHECK COMPLETED");
    println!("======================================================================");

    Ok(())
}

/// Resolve an event and print its tradable markets.
async fn cmd_resolve_event(slug: &str) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GOAL SNIPER - EVENT RESOLUTION");
    println!("======================================================================");

    let config = load_config()?;
    let resolver = GammaResolver::new(&config);

    println!("\nResolving: {}\n", slug);

    match resolver.resolve(slug).await {
        Ok(event) => {
            println!("EVENT FOUND");
            println!("----------------------------------------------------------------------");
            println!("  Slug: {}", event.slug);
            println!("  Teams: {} vs {}", event.teams.local, event.teams.visitante);
            println!("  Tradable markets: {}", event.markets.len());
            for market in &event.markets {
                println!(
                    "   - [{}] {} (yes ${} / no ${})",
                    market.key, market.title, market.yes_price, market.no_price
                );
            }
            println!("======================================================================");
        }
        Err(e) => {
            println!("RESOLUTION FAILED");
            println!("  Error: {}", e);
            println!("======================================================================");
        }
    }

    Ok(())
}
