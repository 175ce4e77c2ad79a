use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presence_agent::api::routes::export::render_period_csv;
use presence_agent::api::state::AppState;
use presence_agent::config::AppConfig;
use presence_agent::models::{PayPeriod, User};
use presence_agent::resolve::{HttpResolver, ResolverConfig};
use presence_agent::storage::{read_users, write_users, JsonlRecordStore, StorageConfig};

#[derive(Parser)]
#[command(name = "presence-agent")]
#[command(about = "Attendance tracker with geofenced check-ins")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port number
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Create a user account
    AddUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Grant all administrative capabilities
        #[arg(long)]
        admin: bool,
    },

    /// Export one pay period as CSV
    Export {
        /// Any date inside the period (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,

        /// Restrict to one user
        #[arg(long)]
        user: Option<String>,

        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting presence-agent v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    let storage = StorageConfig::new(PathBuf::from(&cli.data_dir));

    match cli.command {
        Commands::Serve { host, port } => {
            let resolver = HttpResolver::new(ResolverConfig {
                timeout: Duration::from_secs(config.resolver.timeout_seconds),
                user_agent: config.resolver.user_agent.clone(),
            })?;

            let state = AppState::new(storage, Arc::new(resolver), config.geofence.clone())
                .with_cors_origin(config.server.cors_origin.clone());
            let app = presence_agent::api::build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::AddUser {
            username,
            password,
            admin,
        } => {
            let mut users = read_users(&storage)?;
            if users.iter().any(|u| u.username == username) {
                anyhow::bail!("Username {} is already taken", username);
            }

            let user = if admin {
                User::new_admin(username, password)
            } else {
                User::new(username, password)
            };
            tracing::info!(user = %user.username, admin = user.is_admin, "Creating user");
            users.push(user);
            write_users(&storage, &users)?;
        }
        Commands::Export { date, user, output } => {
            let date = match date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|_| anyhow::anyhow!("Invalid --date (expected YYYY-MM-DD): {}", s))?,
                None => Utc::now().date_naive(),
            };
            let period = PayPeriod::containing(date);

            let store = JsonlRecordStore::new(storage);
            let mut records = store.read_all()?;
            records.retain(|r| period.contains(r.calendar_date()));
            if let Some(user) = &user {
                records.retain(|r| &r.user_name == user);
            }
            records.sort_by(|a, b| a.date.cmp(&b.date));

            tracing::info!(
                period = %period.label(),
                records = records.len(),
                "Exporting period"
            );
            let csv = render_period_csv(&period, &records);

            match output {
                Some(path) => std::fs::write(&path, csv)?,
                None => print!("{}", csv),
            }
        }
    }

    Ok(())
}
