/// Shelf Server - multi-user album catalogue
use clap::{Parser, Subcommand};
use shelf_core::UserStore;
use shelf_server::{api, config::ServerConfig, seed, services::AuthService, state::AppState};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf-server")]
#[command(about = "Shelf multi-user album catalogue", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Replace all users and albums with sample data
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::AddUser { username, password } => add_user(config, &username, &password).await?,
        Commands::ListUsers => list_users(config).await?,
        Commands::Seed => seed_database(config).await?,
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.cookie_secret.clone(),
        config.auth.session_days,
        config.auth.bcrypt_cost,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Shelf Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let store = Arc::new(shelf_storage::connect(&config.storage.database_url).await?);
    tracing::info!("Database connected");

    let auth_service = Arc::new(auth_service(&config));

    // Build router
    let app = api::router(AppState::new(store, auth_service));

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config: ServerConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let store = shelf_storage::connect(&config.storage.database_url).await?;

    let user = auth_service(&config)
        .register(&store, username, password, password)
        .await?;

    println!("Created user {}", user.username);
    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let store = shelf_storage::connect(&config.storage.database_url).await?;
    let users = store.list_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - created {}", user.username, user.created_at.format("%Y-%m-%d"));
    }

    Ok(())
}

async fn seed_database(config: ServerConfig) -> anyhow::Result<()> {
    let store = shelf_storage::connect(&config.storage.database_url).await?;
    let report = seed::reseed(&store, &auth_service(&config)).await?;

    println!(
        "Seeded {} users and {} albums",
        report.db_users_count, report.db_albums_count
    );
    Ok(())
}
