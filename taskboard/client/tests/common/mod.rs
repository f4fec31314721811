use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database};
use taskboard_server::web::create_app;

/// Serves the real task API on an ephemeral port backed by an in-memory
/// database, returning its base URL.
pub async fn spawn_server() -> anyhow::Result<String> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, create_app(db)).await });
    Ok(format!("http://{}", address))
}
