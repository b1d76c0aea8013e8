use pet_adoption::{app_routes, apply_migrations, connect, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.telemetry.log_level)),
        )
        .init();

    let pool = connect(&config.database).await?;
    apply_migrations(&pool).await?;
    let app = app_routes(AppState::new(pool));

    let listener = TcpListener::bind(config.server.socket_addr()?).await?;
    tracing::info!("pet adoption listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
