use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};

use webwarden::db::store::SeaOrmStore;
use webwarden::monitor::probe::HttpProber;
use webwarden::notifications::mailer::SmtpMailer;
use webwarden::server::config::EngineConfig;
use webwarden::server::scheduler::Scheduler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an env file to load instead of `.env`
    #[arg(short, long)]
    env_file: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "webwarden.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    init_logging();
    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path).ok();
        }
        None => {
            dotenv().ok();
        }
    }
    info!("Starting webwarden monitoring engine.");

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load engine configuration: {}", e);
            return Err(e.into());
        }
    };

    let database_url =
        env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set in .env file")?;
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10);
    let db_pool: DatabaseConnection = Database::connect(opt).await?;

    let store = Arc::new(SeaOrmStore::new(Arc::new(db_pool)));

    let prober = Arc::new(HttpProber::new(Duration::from_secs(
        config.uptime_probe_timeout_secs,
    ))?);
    let mailer = match SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.smtp_credentials(),
        &config.alert_from_email,
    ) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            error!("Failed to configure SMTP transport: {}", e);
            return Err(e.into());
        }
    };

    let scheduler = Scheduler::new(&config, store.clone(), store, prober, mailer);
    let handles = scheduler.spawn();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping background services.");
    for handle in &handles {
        handle.abort();
    }

    Ok(())
}
