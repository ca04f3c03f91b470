use anyhow::{anyhow, Result};
use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use accounts::domain::service::{Service, ServiceConfig};
use accounts::infra::crypto::BcryptPasswordHasher;
use accounts::infra::storage::migrations::Migrator;
use accounts::infra::storage::repo::{SeaOrmItemsRepository, SeaOrmUsersRepository};

/// Trove Server - users, items and login over HTTP
#[derive(Parser)]
#[command(name = "trove-server")]
#[command(about = "Trove Server - users, items and login over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Figment skips absent YAML files silently; an explicitly named config
    // that does not exist is an operator mistake and must fail loudly.
    if let Some(path) = cli.config.as_deref() {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
    }

    // Load configuration and apply CLI overrides (port / verbosity)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Keep the guard alive so buffered file-log lines survive until exit.
    let _log_guard = runtime::logging::init_logging(&config.logging);
    tracing::info!("Trove Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Build the connection pool from config. The pool is the only database
/// handle in the process; repositories borrow it, nothing global.
async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let url = config.database.url.trim();
    if url.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let mut opts = ConnectOptions::new(url.to_owned());
    if let Some(max_conns) = config.database.max_conns {
        opts.max_connections(max_conns);
    }
    if let Some(secs) = config.database.connect_timeout_sec {
        opts.connect_timeout(Duration::from_secs(secs));
    }

    tracing::info!("Connecting to database");
    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Welcome message on the server root.
async fn read_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the Trove server!" }))
}

fn build_router(service: Arc<Service>, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(read_root))
        .merge(accounts::api::rest::routes::router(service))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    if config.server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    router
}

async fn run_server(config: AppConfig) -> Result<()> {
    let db = connect_database(&config).await?;

    tracing::info!("Running migrations");
    Migrator::up(&db, None).await?;

    let service = Arc::new(Service::new(
        Arc::new(SeaOrmUsersRepository::new(db.clone())),
        Arc::new(SeaOrmItemsRepository::new(db.clone())),
        Arc::new(BcryptPasswordHasher::default()),
        ServiceConfig::default(),
    ));

    let router = build_router(service, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow!("Invalid bind address: {}", e))?;

    // Bind the socket, only now consider the service ready
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))?;

    tracing::info!("HTTP server stopped");
    db.close().await?;
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("HTTP server shutting down gracefully (Ctrl+C)"),
        _ = terminate => tracing::info!("HTTP server shutting down gracefully (SIGTERM)"),
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    format!("{}:{}", config.server.host, config.server.port)
        .parse::<SocketAddr>()
        .map_err(|e| anyhow!("Invalid bind address: {}", e))?;
    if config.database.url.trim().is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
