mod catalog;
mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");
    let catalog = catalog::RawgClient::new(&config.catalog).expect("catalog client init failed");
    let state = state::AppState::new(pool, Arc::new(catalog));

    // Spawn background release watcher.
    let _release_watch = services::release_watch::spawn_release_watch_task(
        state.clone(),
        config.release_check_interval_secs,
    );

    let app = routes::app(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, static_dir = %config.static_dir.display(), "gameshelf listening");
    axum::serve(listener, app).await.expect("server failed");
}
