use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolbell_api::{config::Config, db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let state = AppState::new(pool);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/announcements",
            get(routes::announcements::list_announcements)
                .post(routes::announcements::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("schoolbell API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
