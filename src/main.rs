mod assets;
mod compose;
mod config;
mod error;
mod mail;
mod pipeline;
mod qr;
mod render;
mod routes;
mod state;
mod storage;
mod templates;

use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sijill=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(config::Config::from_env()?);

    storage::ensure_dirs(&config.assets_folder, &config.output_folder)?;

    let mailer = mail::SmtpMailer::from_config(&config.smtp)?;

    let state = Arc::new(state::AppState {
        config: config.clone(),
        renderer: Arc::new(render::ChromeRenderer::new()),
        mailer: Arc::new(mailer),
    });

    let app = Router::new()
        .route("/generate-pdf", post(routes::generate_pdf))
        .route("/send-email", post(routes::send_email))
        .nest_service("/assets", ServeDir::new(&config.assets_folder))
        .nest_service("/output", ServeDir::new(&config.output_folder))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Sijill listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
