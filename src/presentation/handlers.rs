// HTTP request handlers
use crate::application::aggregator::average_prices;
use crate::application::summary::summarize_index;
use crate::domain::drug::{DrugDetail, DrugIndex, IndexEntry};
use crate::domain::price::AggregatedPoint;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::theme::ThemeMode;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexListing<'a> {
    rxcui: &'a str,
    #[serde(flatten)]
    entry: &'a IndexEntry,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DrugDetailResponse {
    #[serde(flatten)]
    detail: DrugDetail,
    average_prices: Vec<AggregatedPoint>,
}

#[derive(Serialize)]
struct ThemeResponse {
    mode: ThemeMode,
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List every indexed drug
pub async fn list_drugs(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let index = match state.drug_service.load_index().await {
        Ok(index) => index,
        Err(e) => {
            tracing::error!("Error fetching drug index: {:#}", e);
            // Return empty list on error
            DrugIndex::default()
        }
    };

    let listing: Vec<IndexListing> = index
        .iter()
        .map(|(rxcui, entry)| IndexListing { rxcui, entry })
        .collect();
    respond(&listing, &headers).await
}

/// One drug with its per-date averages
pub async fn drug_detail(
    Path(rxcui): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(detail) = state.drug_service.load_drug_detail(&rxcui).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let average_prices = average_prices(&detail.prices);
    respond(&DrugDetailResponse { detail, average_prices }, &headers).await
}

pub async fn drug_inflation(
    Path(rxcui): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let projection = state.drug_service.inflation_for(&rxcui).await;
    respond(&projection, &headers).await
}

pub async fn drug_comparison(
    Path(rxcui): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.drug_service.compare_brand_generic(&rxcui).await {
        Ok(Some(comparison)) => respond(&comparison, &headers).await,
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Error comparing brand/generic for {}: {:#}", rxcui, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Look up drugs by comma-separated partial names
pub async fn search(
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let terms: Vec<String> = query
        .q
        .unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let details = match state.drug_service.search_by_name(&terms).await {
        Ok(details) => details,
        Err(e) => {
            tracing::error!("Error searching drugs: {:#}", e);
            Vec::new()
        }
    };
    respond(&details, &headers).await
}

/// Sampled drugs for the price-drop chart
pub async fn drop_chart(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let drugs = match state.drug_service.load_drop_chart().await {
        Ok(drugs) => drugs,
        Err(e) => {
            tracing::error!("Error building drop chart: {:#}", e);
            Vec::new()
        }
    };
    respond(&drugs, &headers).await
}

pub async fn price_summary(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let summary = match state.drug_service.price_change_summary().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Error summarizing price changes: {:#}", e);
            summarize_index(&DrugIndex::default())
        }
    };
    respond(&summary, &headers).await
}

pub async fn form_breakdown(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let counts = match state.drug_service.form_breakdown().await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::error!("Error counting dosage forms: {:#}", e);
            Vec::new()
        }
    };
    respond(&counts, &headers).await
}

pub async fn get_theme(State(state): State<Arc<AppState>>) -> Response {
    respond(
        &ThemeResponse {
            mode: state.theme.current(),
        },
        &HeaderMap::new(),
    )
    .await
}

pub async fn set_theme(Path(mode): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let mode: ThemeMode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };

    if state.theme.set(mode) {
        tracing::info!("Theme switched to {:?}", mode);
    }
    respond(&ThemeResponse { mode }, &HeaderMap::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::drug_service::DrugService;
    use crate::infrastructure::config::PipelineConfig;
    use crate::infrastructure::fs_repository::FsDrugRepository;
    use crate::presentation::theme::ThemeContext;

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let repository = Arc::new(FsDrugRepository::new(root));
        Arc::new(AppState {
            drug_service: DrugService::new(repository, PipelineConfig::default()),
            theme: ThemeContext::default(),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_drug_detail_includes_averages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("prices")).unwrap();
        std::fs::write(
            dir.path().join("prices/5.json"),
            r#"{"RxCUI": "5", "Name": "Prozac 20 MG Oral Capsule", "IsBrand": true,
                "Form": "Oral Capsule",
                "prices": {"a": {"01/01/2024": 1.0}, "b": {"2024-01-01": 2.0}}}"#,
        )
        .unwrap();
        let state = state(dir.path());

        let response = drug_detail(Path("5".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fullName"], "Prozac 20 MG Oral Capsule");
        assert_eq!(body["formCategory"], "Oral Capsule");
        assert_eq!(body["averagePrices"][0]["date"], "2024-01-01");
        assert_eq!(body["averagePrices"][0]["sampleCount"], 2);
        assert_eq!(body["averagePrices"][0]["averagePrice"], 45.0);

        let missing = drug_detail(Path("6".to_string()), HeaderMap::new(), State(state)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_index_yields_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let listing = body_json(list_drugs(HeaderMap::new(), State(state.clone())).await).await;
        assert_eq!(listing, serde_json::json!([]));

        let summary = body_json(price_summary(HeaderMap::new(), State(state.clone())).await).await;
        assert_eq!(summary["total"], 0);
        assert_eq!(summary["increasedPct"], "0.00");

        let inflation = body_json(
            drug_inflation(Path("1".to_string()), HeaderMap::new(), State(state)).await,
        )
        .await;
        assert_eq!(inflation["oldYear"], 2018);
        assert_eq!(inflation["newYear"], 2025);
    }

    #[tokio::test]
    async fn test_set_theme() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = set_theme(Path("dark".to_string()), State(state.clone())).await;
        assert_eq!(body_json(response).await["mode"], "dark");
        assert_eq!(state.theme.current(), ThemeMode::Dark);

        let rejected = set_theme(Path("neon".to_string()), State(state)).await;
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    }
}
