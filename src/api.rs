//! REST API for the financial metrics extractor
//!
//! Exposes extraction, live lookup and insight generation over HTTP for a
//! frontend collaborator.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analyst::FinancialAnalyst;
use crate::models::FinancialRecord;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InsightRequest {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub revenue: String,
    #[serde(default)]
    pub net_income: String,
    #[serde(default)]
    pub eps: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    found: bool,
    record: Option<FinancialRecord>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub analyst: Arc<FinancialAnalyst>,
}

/// Malformed or incomplete JSON bodies still get the response envelope
fn bad_request(rejection: JsonRejection) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(rejection.body_text())),
    )
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Extraction Endpoint
/// =============================

async fn extract(
    State(state): State<ApiState>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection),
    };

    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Please enter some financial text to extract data.".into(),
            )),
        );
    }

    let span = info_span!("extract", request_id = %Uuid::new_v4());
    let record = async {
        info!(text_chars = req.text.len(), "Received extraction request");
        state.analyst.extract_financial_data(&req.text).await
    }
    .instrument(span)
    .await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(ExtractResponse {
            found: record.is_some(),
            record,
        })),
    )
}

/// =============================
/// Live Lookup Endpoint
/// =============================

async fn live(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    if ticker.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Please enter a ticker symbol.".into())),
        );
    }

    let span = info_span!("live", request_id = %Uuid::new_v4(), ticker = %ticker);
    let record = state
        .analyst
        .get_live_financials(&ticker)
        .instrument(span)
        .await;

    (StatusCode::OK, Json(ApiResponse::success(record)))
}

/// =============================
/// Insight Endpoint
/// =============================

async fn insight(
    State(state): State<ApiState>,
    body: Result<Json<InsightRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection),
    };

    let span = info_span!("insight", request_id = %Uuid::new_v4(), company = %req.company);
    let summary = state
        .analyst
        .generate_insight(&req.company, &req.revenue, &req.net_income, &req.eps)
        .instrument(span)
        .await;

    match summary {
        Some(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "summary": summary }))),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error("Analysis unavailable".into())),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(analyst: Arc<FinancialAnalyst>) -> Router {
    let state = ApiState { analyst };

    Router::new()
        .route("/health", get(health))
        .route("/api/extract", post(extract))
        .route("/api/live/:ticker", get(live))
        .route("/api/insight", post(insight))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    analyst: Arc<FinancialAnalyst>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(analyst);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLanguageModel;
    use crate::market_data::StaticMarketData;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(model: MockLanguageModel, market_data: StaticMarketData) -> Router {
        create_router(Arc::new(FinancialAnalyst::new(
            Arc::new(model),
            Arc::new(market_data),
        )))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(MockLanguageModel::replying(""), StaticMarketData::failing("offline"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_extract_found() {
        let app = router(
            MockLanguageModel::replying(
                "```json\n{\"Company Name\": \"Walmart\", \"Stock Symbol\": \"WMT\", \"Revenue\": \"12.34 million\", \"Net Income\": \"34.78 million\", \"EPS\": \"2.1 $\"}\n```",
            ),
            StaticMarketData::failing("offline"),
        );

        let (status, body) = send(app, post_json("/api/extract", json!({ "text": "Walmart..." }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["found"], true);
        assert_eq!(body["data"]["record"]["Stock Symbol"], "WMT");
        assert_eq!(body["data"]["record"]["EPS"], "2.1 $");
    }

    #[tokio::test]
    async fn test_extract_not_found_and_blank_text() {
        let app = router(
            MockLanguageModel::replying("No figures in this one."),
            StaticMarketData::failing("offline"),
        );

        let (status, body) =
            send(app.clone(), post_json("/api/extract", json!({ "text": "A new store opened." }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["found"], false);
        assert!(body["data"]["record"].is_null());

        let (status, body) = send(app, post_json("/api/extract", json!({ "text": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_envelope() {
        let app = router(MockLanguageModel::replying(""), StaticMarketData::failing("offline"));

        let (status, body) = send(app.clone(), post_json("/api/extract", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("text"));

        let request = Request::builder()
            .method("POST")
            .uri("/api/insight")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_live_lookup_provider_failure_is_blank_record() {
        let app = router(MockLanguageModel::replying(""), StaticMarketData::failing("offline"));
        let request = Request::builder().uri("/api/live/aapl").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["Company Name"], "");
        assert_eq!(body["data"]["Stock Symbol"], "");
    }

    #[tokio::test]
    async fn test_insight_available_and_unavailable() {
        let payload = json!({
            "company": "Apple Inc.",
            "revenue": "$394.33B",
            "net_income": "$99.80B",
            "eps": "$6.11"
        });

        let app = router(
            MockLanguageModel::replying("Apple Inc. has demonstrated strong financial performance."),
            StaticMarketData::failing("offline"),
        );
        let (status, body) = send(app, post_json("/api/insight", payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["summary"],
            "Apple Inc. has demonstrated strong financial performance."
        );

        let app = router(MockLanguageModel::failing("quota"), StaticMarketData::failing("offline"));
        let (status, body) = send(app, post_json("/api/insight", payload)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Analysis unavailable");
    }
}
