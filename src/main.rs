// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::drug_repository::DrugRepository;
use crate::application::drug_service::DrugService;
use crate::infrastructure::config::{load_dashboard_config, DataSettings, DataSourceKind};
use crate::infrastructure::fs_repository::FsDrugRepository;
use crate::infrastructure::http_repository::HttpDrugRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    drop_chart, drug_comparison, drug_detail, drug_inflation, form_breakdown, get_theme,
    health_check, list_drugs, price_summary, search, set_theme,
};
use crate::presentation::theme::ThemeContext;

fn build_repository(data: &DataSettings) -> anyhow::Result<Arc<dyn DrugRepository>> {
    match data.source {
        DataSourceKind::Fs => {
            let dir = data.dir.clone().unwrap_or_else(|| "data".to_string());
            tracing::info!("Reading drug data from {}", dir);
            Ok(Arc::new(FsDrugRepository::new(dir)))
        }
        DataSourceKind::Http => {
            let base_url = data
                .base_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("data.base_url is required for the http source"))?;
            tracing::info!("Fetching drug data from {}", base_url);
            Ok(Arc::new(HttpDrugRepository::new(
                base_url,
                Duration::from_secs(data.timeout_secs),
            )?))
        }
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/drugs", get(list_drugs))
        .route("/drugs/:rxcui", get(drug_detail))
        .route("/drugs/:rxcui/inflation", get(drug_inflation))
        .route("/drugs/:rxcui/comparison", get(drug_comparison))
        .route("/search", get(search))
        .route("/drops", get(drop_chart))
        .route("/summary", get(price_summary))
        .route("/forms", get(form_breakdown))
        .route("/theme", get(get_theme))
        .route("/theme/:mode", put(set_theme))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = build_repository(&config.data)?;

    // Create services (application layer)
    let drug_service = DrugService::new(repository, config.pipeline);

    // Create application state
    let state = Arc::new(AppState {
        drug_service,
        theme: ThemeContext::default(),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting drug-price-trends service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
