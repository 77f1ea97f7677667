//! Heart Disease Risk Server
//!
//! Web form that scores a patient's heart disease risk with a tree
//! ensemble and explains the prediction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HEART RISK SERVER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────────────────────────────────┐ │
//! │  │  Routes   │  │  Pipeline                               │ │
//! │  │  (Axum)   │─▶│  encode ─▶ predict ─▶ explain ─▶ narrate │ │
//! │  └─────┬─────┘  └────────────────────┬────────────────────┘ │
//! │        │                             ▼                      │
//! │        │                    ┌─────────────────┐             │
//! │        └──── views ◀────────│  RiskModel      │             │
//! │         (HTML/SVG/CSV)      │  (Arc, loaded   │             │
//! │                             │   once)         │             │
//! │                             └─────────────────┘             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;
mod views;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::logic::model::RiskModel;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "heart_risk=debug,tower_http=debug".into()),
    );
    if config::is_production(&config::environment()) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = config::Config::from_env();

    tracing::info!("Heart risk server starting ({})...", config.environment);

    // The app is unusable without a model
    let model = RiskModel::load(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path))?;

    let state = AppState {
        model: Arc::new(model),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<RiskModel>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::assess::index))
        .route("/predict", post(handlers::assess::predict))
        .route("/report", post(handlers::report::download))
        .route("/api/v1/predict", post(handlers::assess::predict_json))
        .route("/health", get(handlers::health::check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
