mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    tracing::info!(
        restaurant = %config.restaurant.name,
        columns = config.restaurant.ticket_columns,
        utc_offset = %config.restaurant.utc_offset,
        "restaurant settings loaded"
    );
    let state = state::AppState::new(pool, config.restaurant, config.order_feed_capacity);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "pos server listening");
    axum::serve(listener, app).await.expect("server failed");
}
