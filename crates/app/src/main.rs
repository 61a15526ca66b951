use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerboard={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = sea_orm::Database::connect(&settings.database.url)
        .await
        .inspect_err(|err| tracing::error!("failed to connect to database: {err}"))?;
    Migrator::up(&db, None)
        .await
        .inspect_err(|err| tracing::error!("failed to run migrations: {err}"))?;
    tracing::info!("database ready at {}", settings.database.url);

    let engine = engine::Engine::builder().database(db).build().await?;

    if settings.seed.demo_users {
        let created = engine.seed_demo_users().await?;
        tracing::info!("seeded {created} demo users");
    }

    let auth = server::AuthConfig::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours);
    let state = server::ServerState::new(engine, auth);

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}
