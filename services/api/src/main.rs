use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{health_check, init_pool, run_migrations};
use giftr_api::{
    AppState, Config,
    auth::JwtService,
    config::{DEFAULT_JWT_SECRET, StorageBackend},
    routes,
};

fn init_tracing(log_level: &str) {
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.logging.level);

    info!("Starting Giftr user service");

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the built-in JWT secret; set GIFTR__AUTH__JWT_SECRET outside development");
    }
    let jwt_service = JwtService::new(&config.auth);

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            let pool = init_pool(&config.database).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;
            AppState::postgres(pool, jwt_service)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(jwt_service)
        }
    };

    info!("Giftr user service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Giftr user service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
