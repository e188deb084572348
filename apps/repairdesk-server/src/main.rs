use anyhow::{anyhow, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use repairs::{config::RepairsConfig, RepairsModule};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const API_INGRESS: &str = "api_ingress";
const REPAIRS: &str = "repairs";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Adds `mode=rwc` so a missing database file is created.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.contains("mode=") => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// RepairDesk Server - repair shop tickets, customers and accounts
#[derive(Parser)]
#[command(name = "repairdesk-server")]
#[command(about = "RepairDesk Server - repair shop tickets, customers and accounts")]
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

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Create the first admin account unless the email is already registered
    SeedAdmin {
        #[arg(long, default_value = "admin@example.com")]
        email: String,
        #[arg(long, default_value = "admin123")]
        password: String,
        #[arg(long, default_value = "Admin User")]
        full_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("RepairDesk Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
        Commands::SeedAdmin {
            email,
            password,
            full_name,
        } => seed_admin(config, args, &email, &password, &full_name).await,
    }
}

/// Only SQLite is wired; other schemes are rejected up front.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

async fn connect_db(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let base_dir = config.home_dir();

    let (dsn, max_conns) = if args.mock {
        ("sqlite::memory:".to_string(), Some(1))
    } else {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("No database configuration found"))?;
        detect_from_dsn(db_config)?;
        (
            absolutize_sqlite_dsn(db_config.url.trim(), &base_dir, true)?,
            db_config.max_conns,
        )
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if let Some(n) = max_conns {
        opts.max_connections(n);
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts).await?;
    tracing::info!("Connected to database");
    Ok(db)
}

async fn init_repairs(config: &AppConfig, args: &CliArgs) -> Result<RepairsModule> {
    let db = connect_db(config, args).await?;
    let repairs_cfg: RepairsConfig = config.module_config(REPAIRS)?;
    RepairsModule::init(db, repairs_cfg, &config.home_dir()).await
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let ingress_cfg: ApiIngressConfig = config.module_config(API_INGRESS)?;
    let mut ingress = ApiIngress::new(ingress_cfg).with_openapi(&RepairsModule::openapi())?;
    if config.server.timeout_sec > 0 {
        ingress = ingress.with_timeout(Duration::from_secs(config.server.timeout_sec));
    }
    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;

    let repairs = init_repairs(&config, &args).await?;
    let router = ingress.build_router(repairs.register_rest(axum::Router::new()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = async {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!("Signal handling failed: {e:#}");
        }
    };

    ApiIngress::serve(listener, router, shutdown).await?;
    tracing::info!("RepairDesk Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let ingress_cfg: ApiIngressConfig = config.module_config(API_INGRESS)?;
    ApiIngress::new(ingress_cfg).bind_addr(&config.server.host, config.server.port)?;
    let _: RepairsConfig = config.module_config(REPAIRS)?;
    if !args.mock {
        if let Some(db) = &config.database {
            detect_from_dsn(db)?;
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

async fn seed_admin(
    config: AppConfig,
    args: CliArgs,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<()> {
    let repairs = init_repairs(&config, &args).await?;
    let (user, created) = repairs
        .client()
        .ensure_admin(email, password, full_name)
        .await?;

    if created {
        println!("Admin user created: {} ({})", user.email, user.id);
    } else {
        println!("User {} already exists", user.email);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_dsn_is_made_absolute() {
        let base = Path::new("/srv/repairdesk");
        let dsn = absolutize_sqlite_dsn("sqlite://database/app.db", base, false).unwrap();
        assert_eq!(dsn, "sqlite:///srv/repairdesk/database/app.db?mode=rwc");

        let dsn = absolutize_sqlite_dsn("sqlite:///tmp/x.db?mode=ro", base, false).unwrap();
        assert_eq!(dsn, "sqlite:///tmp/x.db?mode=ro");

        let dsn = absolutize_sqlite_dsn("sqlite:///tmp/x.db?cache=shared", base, false).unwrap();
        assert_eq!(dsn, "sqlite:///tmp/x.db?cache=shared&mode=rwc");

        assert_eq!(
            absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(),
            "sqlite::memory:"
        );
        assert!(absolutize_sqlite_dsn("postgres://x", base, false).is_err());
    }

    #[test]
    fn only_sqlite_is_supported() {
        let cfg = |url: &str| DatabaseConfig {
            url: url.into(),
            max_conns: None,
        };
        assert_eq!(detect_from_dsn(&cfg("sqlite:///tmp/a.db")).unwrap(), "sqlite");
        assert!(detect_from_dsn(&cfg("postgresql://localhost/db")).is_err());
        assert!(detect_from_dsn(&cfg("")).is_err());
    }
}
