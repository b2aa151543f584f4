use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use salesforge_api::{
    build_router,
    config::AppConfig,
    database::models::{Role, UnknownVariant},
    database::{schema, DatabaseManager, PgLeadStore, PgUserStore},
    services::AuthService,
    AppState,
};

#[derive(Parser)]
#[command(name = "salesforge-api", version, about = "SalesForge CRM API server")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the HTTP server (default)
    Serve,
    /// Create or update the database schema and exit
    Migrate,
    /// Create an active user account
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SALESFORGE_USER_PASSWORD")]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "SALES_REP", value_parser = parse_role)]
        role: Role,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.to_uppercase().parse().map_err(|e: UnknownVariant| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    info!("Starting SalesForge API in {:?} mode", config.environment);

    let db = DatabaseManager::connect(&config.database).context("database configuration")?;

    match cli.cmd.unwrap_or(Cmd::Serve) {
        Cmd::Serve => serve(config, db).await?,
        Cmd::Migrate => {
            schema::migrate(db.pool()).await.context("migration failed")?;
            info!("Schema is up to date");
            db.close().await;
        }
        Cmd::CreateUser {
            email,
            password,
            first_name,
            last_name,
            role,
        } => {
            let auth = AuthService::new(Arc::new(PgUserStore::new(db.pool().clone())), config.security.clone());
            let user = auth
                .create_user(first_name, last_name, email, &password, role)
                .await
                .context("could not create user")?;
            println!("Created user {} <{}> with role {}", user.id, user.email, user.role);
            db.close().await;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig, db: DatabaseManager) -> anyhow::Result<()> {
    if config.database.auto_migrate {
        // Keep serving without a database; /health reports it
        if let Err(e) = schema::migrate(db.pool()).await {
            error!("Automatic migration failed: {}", e);
        }
    }

    let state = AppState::new(
        config.clone(),
        Arc::new(PgLeadStore::new(db.pool().clone())),
        Arc::new(PgUserStore::new(db.pool().clone())),
    );
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("SalesForge API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
