use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use crate::spoonacular::SpoonacularClient;
use nosh_core::error::LookupError;
use nosh_core::ledger::DailyMacroTotals;
use nosh_core::models::{DietPreferences, MacroTargets, NutritionRecord, UserProfile};
use nosh_core::normalize::{image_analysis_to_record, search_result_to_record};
use nosh_core::quota::DAILY_CALL_LIMIT;
use nosh_core::service::NoshService;
use nosh_core::streak::StreakState;

const BODY_LIMIT: usize = 1024 * 1024; // 1 MB

#[derive(Clone)]
struct AppState {
    svc: Arc<Mutex<NoshService>>,
    provider: Option<Arc<SpoonacularClient>>,
    api_key: Option<String>,
}

fn lock(state: &AppState) -> MutexGuard<'_, NoshService> {
    state
        .svc
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct LogSearchRequest {
    query: String,
    date: Option<String>,
}

#[derive(Deserialize)]
struct LogPhotoRequest {
    image_url: String,
    date: Option<String>,
}

#[derive(Deserialize)]
struct CreateMealRequest {
    title: String,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    protein_g: f64,
    #[serde(default)]
    carbs_g: f64,
    #[serde(default)]
    fat_g: f64,
    date: Option<String>,
}

#[derive(Deserialize)]
struct CreateWeightRequest {
    weight_kg: f64,
    date: Option<String>,
}

#[derive(Serialize)]
struct LoggedResponse {
    record: NutritionRecord,
    totals: DailyMacroTotals,
}

#[derive(Serialize)]
struct SummaryResponse {
    date: NaiveDate,
    totals: DailyMacroTotals,
    targets: MacroTargets,
    streak: StreakState,
}

#[derive(Serialize)]
struct QuotaResponse {
    date: NaiveDate,
    calls_used: u32,
    remaining: u32,
    limit: u32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    NotFound(String),
    BadRequest(String),
    TooManyRequests(String),
    BadGateway(String),
    Unavailable(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(err) => {
                eprintln!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidInput(msg) => Self::BadRequest(msg),
            LookupError::NoDataFound => {
                Self::NotFound("No nutrition data found for that input".to_string())
            }
            LookupError::QuotaExceeded => Self::TooManyRequests(format!(
                "Daily remote lookup limit of {DAILY_CALL_LIMIT} reached"
            )),
            LookupError::NetworkFailure(msg) | LookupError::UpstreamServerError(msg) => {
                Self::BadGateway(format!("Nutrition service error: {msg}"))
            }
            LookupError::Unknown(err) => Self::Internal(err),
        }
    }
}

// --- Middleware ---

async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(ref expected_key) = state.api_key {
        let authorized = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected_key);

        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid or missing API key".to_string(),
                }),
            )
                .into_response();
        }
    }
    next.run(request).await
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Helpers ---

fn parse_date(input: Option<&str>) -> Result<NaiveDate, ApiError> {
    match input {
        None => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("Invalid date '{s}'. Use YYYY-MM-DD"))),
    }
}

fn provider(state: &AppState) -> Result<Arc<SpoonacularClient>, ApiError> {
    state.provider.clone().ok_or_else(|| {
        ApiError::Unavailable("Remote lookups disabled: no nutrition API key configured".to_string())
    })
}

/// Quota gate shared by the remote-lookup routes. Denies before any
/// network traffic happens.
fn check_quota(svc: &NoshService, today: NaiveDate) -> Result<(), ApiError> {
    if svc.quota(today)?.can_call(today) {
        Ok(())
    } else {
        Err(LookupError::QuotaExceeded.into())
    }
}

/// Count a completed upstream call. Only reached after a successful
/// response, so failed transports never burn quota.
fn consume_quota(svc: &NoshService, today: NaiveDate) -> Result<(), ApiError> {
    let mut quota = svc.quota(today)?;
    quota.record_call(today);
    svc.db().set_quota(&quota)?;
    Ok(())
}

// --- Handlers ---

async fn log_search(
    State(state): State<AppState>,
    Json(req): Json<LogSearchRequest>,
) -> Result<(StatusCode, Json<LoggedResponse>), ApiError> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let today = parse_date(req.date.as_deref())?;
    let client = provider(&state)?;

    // The lock is not held across the upstream await.
    check_quota(&lock(&state), today)?;
    let result = client.search_async(&query).await?;

    let svc = lock(&state);
    consume_quota(&svc, today)?;
    let record = result
        .and_then(search_result_to_record)
        .ok_or_else(|| ApiError::from(LookupError::NoDataFound))?;
    let totals = svc.log_meal(&record, today)?;

    Ok((StatusCode::CREATED, Json(LoggedResponse { record, totals })))
}

async fn log_photo(
    State(state): State<AppState>,
    Json(req): Json<LogPhotoRequest>,
) -> Result<(StatusCode, Json<LoggedResponse>), ApiError> {
    let image_url = req.image_url.trim().to_string();
    if image_url.is_empty() {
        return Err(ApiError::BadRequest(
            "image_url must not be empty".to_string(),
        ));
    }
    let today = parse_date(req.date.as_deref())?;
    let client = provider(&state)?;

    check_quota(&lock(&state), today)?;
    let analysis = client.analyze_image_async(&image_url).await?;

    let svc = lock(&state);
    consume_quota(&svc, today)?;
    let record = image_analysis_to_record(analysis);
    let totals = svc.log_meal(&record, today)?;

    Ok((StatusCode::CREATED, Json(LoggedResponse { record, totals })))
}

async fn create_meal(
    State(state): State<AppState>,
    Json(req): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<LoggedResponse>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }
    let today = parse_date(req.date.as_deref())?;
    let record = NutritionRecord::new(
        req.title.trim(),
        req.calories,
        req.protein_g,
        req.carbs_g,
        req.fat_g,
    );

    let svc = lock(&state);
    let totals = svc.log_meal(&record, today)?;

    Ok((StatusCode::CREATED, Json(LoggedResponse { record, totals })))
}

async fn get_summary_today(state: State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    summary_for(&state, Local::now().date_naive())
}

async fn get_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let date = parse_date(Some(&date))?;
    summary_for(&state, date)
}

fn summary_for(state: &AppState, date: NaiveDate) -> Result<Json<SummaryResponse>, ApiError> {
    let svc = lock(state);
    let totals = svc.totals(date)?;
    let targets = svc.compute_goals()?;
    let streak = svc.streak()?;
    Ok(Json(SummaryResponse {
        date,
        totals,
        targets,
        streak,
    }))
}

async fn get_streak(State(state): State<AppState>) -> Result<Json<StreakState>, ApiError> {
    Ok(Json(lock(&state).streak()?))
}

async fn get_goals(State(state): State<AppState>) -> Result<Json<MacroTargets>, ApiError> {
    Ok(Json(lock(&state).compute_goals()?))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, ApiError> {
    lock(&state)
        .profile()?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No profile set".to_string()))
}

async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, ApiError> {
    if profile.weight_kg < 0.0 || profile.height_cm < 0.0 || profile.goal_weight_kg < 0.0 {
        return Err(ApiError::BadRequest(
            "weight, goal weight and height must not be negative".to_string(),
        ));
    }
    lock(&state).set_profile(&profile)?;
    Ok(Json(profile))
}

async fn get_plan(State(state): State<AppState>) -> Result<Json<DietPreferences>, ApiError> {
    Ok(Json(lock(&state).preferences()?.unwrap_or_default()))
}

async fn put_plan(
    State(state): State<AppState>,
    Json(prefs): Json<DietPreferences>,
) -> Result<Json<DietPreferences>, ApiError> {
    lock(&state).set_preferences(&prefs)?;
    Ok(Json(prefs))
}

async fn create_weight(
    State(state): State<AppState>,
    Json(req): Json<CreateWeightRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if req.weight_kg <= 0.0 {
        return Err(ApiError::BadRequest(
            "weight_kg must be greater than 0".to_string(),
        ));
    }
    let date = parse_date(req.date.as_deref())?;
    let entry = lock(&state).set_weight(date, req.weight_kg)?;
    let value = serde_json::to_value(entry).map_err(anyhow::Error::from)?;
    Ok((StatusCode::CREATED, Json(value)))
}

async fn get_weight_history(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entries = lock(&state).weight_history()?;
    Ok(Json(serde_json::to_value(entries).map_err(anyhow::Error::from)?))
}

async fn get_weight(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let date = parse_date(Some(&date))?;
    let entry = lock(&state)
        .db()
        .get_weight(date)?
        .ok_or_else(|| ApiError::NotFound(format!("No weight entry for {date}")))?;
    Ok(Json(serde_json::to_value(entry).map_err(anyhow::Error::from)?))
}

async fn get_quota(State(state): State<AppState>) -> Result<Json<QuotaResponse>, ApiError> {
    let today = Local::now().date_naive();
    let quota = lock(&state).quota(today)?;
    Ok(Json(QuotaResponse {
        date: today,
        calls_used: quota.usage_for(today),
        remaining: quota.remaining(today),
        limit: DAILY_CALL_LIMIT,
    }))
}

async fn reset_quota(State(state): State<AppState>) -> Result<Json<QuotaResponse>, ApiError> {
    let today = Local::now().date_naive();
    let quota = lock(&state).reset_quota(today)?;
    Ok(Json(QuotaResponse {
        date: today,
        calls_used: quota.usage_for(today),
        remaining: quota.remaining(today),
        limit: DAILY_CALL_LIMIT,
    }))
}

// --- Router ---

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/meals", post(create_meal))
        .route("/api/log/search", post(log_search))
        .route("/api/log/photo", post(log_photo))
        .route("/api/summary", get(get_summary_today))
        .route("/api/summary/{date}", get(get_summary))
        .route("/api/streak", get(get_streak))
        .route("/api/goals", get(get_goals))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/plan", get(get_plan).put(put_plan))
        .route("/api/weight", post(create_weight).get(get_weight_history))
        .route("/api/weight/{date}", get(get_weight))
        .route("/api/quota", get(get_quota))
        .route("/api/quota/reset", post(reset_quota))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(
    svc: NoshService,
    provider: Option<SpoonacularClient>,
    port: u16,
    bind: &str,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let state = AppState {
        svc: Arc::new(Mutex::new(svc)),
        provider: provider.map(Arc::new),
        api_key: api_key.clone(),
    };

    // Midnight-ish scheduler: re-open the remote-lookup budget once a day.
    let scheduler_svc = Arc::clone(&state.svc);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            let today = Local::now().date_naive();
            let svc = scheduler_svc
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Err(e) = svc.reset_quota(today) {
                eprintln!("Quota reset failed: {e:#}");
            }
        }
    });

    let app = build_router(state);

    if let Some(ref key) = api_key {
        eprintln!(
            "API key: {}...{} (see api_key file in data directory)",
            &key[..4],
            &key[key.len() - 4..],
        );
    } else {
        eprintln!("Warning: Authentication disabled (--no-auth). API is open to anyone.");
    }

    if bind != "127.0.0.1" && bind != "localhost" && api_key.is_none() {
        eprintln!(
            "Warning: Listening on {bind} with no authentication. Any device on your network can access this API."
        );
    }

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    eprintln!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state(api_key: Option<String>) -> AppState {
        AppState {
            svc: Arc::new(Mutex::new(NoshService::new_in_memory().unwrap())),
            provider: None,
            api_key,
        }
    }

    fn test_app(api_key: Option<String>) -> Router {
        build_router(test_state(api_key))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn auth_missing_key_returns_401() {
        let app = test_app(Some("test-key-abc123".to_string()));

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid or missing API key");
    }

    #[tokio::test]
    async fn auth_wrong_key_returns_401() {
        let app = test_app(Some("test-key-abc123".to_string()));

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .header("Authorization", "Bearer wrong-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_correct_key_succeeds() {
        let app = test_app(Some("test-key-abc123".to_string()));

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .header("Authorization", "Bearer test-key-abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn no_auth_mode_allows_requests() {
        let app = test_app(None);

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn security_headers_present() {
        let app = test_app(None);

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
        assert_eq!(
            response.headers().get("content-security-policy").unwrap(),
            "default-src 'none'"
        );
    }

    #[tokio::test]
    async fn security_headers_on_auth_failure() {
        let app = test_app(Some("secret".to_string()));

        let response = app
            .oneshot(
                axum::http::Request::get("/api/streak")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn body_size_limit_rejects_oversized() {
        let app = test_app(None);

        let big_body = vec![0u8; BODY_LIMIT + 1];
        let response = app
            .oneshot(
                axum::http::Request::post("/api/meals")
                    .header("content-type", "application/json")
                    .body(Body::from(big_body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn internal_error_does_not_leak_details() {
        let error = ApiError::Internal(anyhow::anyhow!("secret database path /home/user/.nosh/db"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(!json["error"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn create_meal_then_summary_roundtrip() {
        let state = test_state(None);
        let app = build_router(state.clone());

        let body = serde_json::json!({
            "title": "Paneer wrap",
            "calories": 520.0,
            "protein_g": 24.0,
            "carbs_g": 48.0,
            "fat_g": 22.0,
            "date": "2025-03-10",
        });
        let response = app
            .oneshot(
                axum::http::Request::post("/api/meals")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["record"]["title"], "Paneer wrap");
        assert_eq!(json["totals"]["protein_g"], 24.0);

        let app = build_router(state);
        let response = app
            .oneshot(
                axum::http::Request::get("/api/summary/2025-03-10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["totals"]["carbs_g"], 48.0);
        assert_eq!(json["streak"]["count"], 1);
    }

    #[tokio::test]
    async fn create_meal_rejects_blank_title() {
        let app = test_app(None);

        let body = serde_json::json!({ "title": "   " });
        let response = app
            .oneshot(
                axum::http::Request::post("/api/meals")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_rejects_malformed_date() {
        let app = test_app(None);

        let response = app
            .oneshot(
                axum::http::Request::get("/api/summary/not-a-date")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_without_provider_is_unavailable() {
        let app = test_app(None);

        let body = serde_json::json!({ "query": "dal" });
        let response = app
            .oneshot(
                axum::http::Request::post("/api/log/search")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn profile_missing_returns_404() {
        let app = test_app(None);

        let response = app
            .oneshot(
                axum::http::Request::get("/api/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn weight_post_then_get_roundtrip() {
        let state = test_state(None);
        let app = build_router(state.clone());

        let body = serde_json::json!({ "weight_kg": 71.4, "date": "2025-03-10" });
        let response = app
            .oneshot(
                axum::http::Request::post("/api/weight")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let app = build_router(state);
        let response = app
            .oneshot(
                axum::http::Request::get("/api/weight/2025-03-10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["weight_kg"], 71.4);
    }

    #[tokio::test]
    async fn quota_endpoint_survives_over_limit_usage() {
        // Two lookups in flight on the last slot can both pass the
        // gate; the stored count must still read back cleanly
        let state = test_state(None);
        let today = Local::now().date_naive();
        {
            let svc = lock(&state);
            let quota = nosh_core::quota::ApiQuotaState {
                date: today,
                calls_used: DAILY_CALL_LIMIT + 1,
            };
            svc.db().set_quota(&quota).unwrap();
        }

        let app = build_router(state);
        let response = app
            .oneshot(
                axum::http::Request::get("/api/quota")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["remaining"], 0);
    }

    #[tokio::test]
    async fn file_backed_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nosh.db");

        {
            let state = AppState {
                svc: Arc::new(Mutex::new(NoshService::open(&path).unwrap())),
                provider: None,
                api_key: None,
            };
            let app = build_router(state);
            let body = serde_json::json!({
                "title": "Overnight oats",
                "protein_g": 14.0,
                "date": "2025-03-10",
            });
            let response = app
                .oneshot(
                    axum::http::Request::post("/api/meals")
                        .header("content-type", "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let state = AppState {
            svc: Arc::new(Mutex::new(NoshService::open(&path).unwrap())),
            provider: None,
            api_key: None,
        };
        let app = build_router(state);
        let response = app
            .oneshot(
                axum::http::Request::get("/api/summary/2025-03-10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["totals"]["protein_g"], 14.0);
    }

    #[tokio::test]
    async fn quota_endpoint_reports_full_budget() {
        let app = test_app(None);

        let response = app
            .oneshot(
                axum::http::Request::get("/api/quota")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["calls_used"], 0);
        assert_eq!(json["remaining"], i64::from(DAILY_CALL_LIMIT));
        assert_eq!(json["limit"], i64::from(DAILY_CALL_LIMIT));
    }
}
