use axum::{
    Json, Router,
    extract::{Path, Query, Request, State, rejection::QueryRejection},
    http::HeaderValue,
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};
use booking_flow::{BookingStore, Collector, InMemoryBookingStore};
use chrono::Utc;
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    assistant::{CitationLog, KnowledgeBaseResponder, Responder},
    error::{ApiError, ApiResult, ValidationDetail},
    extract::ValidatedJson,
    holiday::create_collector,
    models::{
        BookRequest, BookResponse, DocsResponse, InteractRequest, InteractResponse, RateRequest,
        RateResponse,
    },
    ratings::{MAX_RATING, MIN_RATING, Rating, RatingStore},
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct AppState {
    pub collector: Collector,
    pub responder: Arc<dyn Responder>,
    pub citations: Arc<CitationLog>,
    pub ratings: Arc<RatingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingStore>, responder: Arc<dyn Responder>) -> Self {
        Self {
            collector: create_collector(store),
            responder,
            citations: Arc::new(CitationLog::new()),
            ratings: Arc::new(RatingStore::new()),
        }
    }

    /// In-memory booking store and the built-in holiday desk responder
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBookingStore::new()),
            Arc::new(KnowledgeBaseResponder::holiday_desk()),
        )
    }
}

pub fn create_app() -> Router {
    build_router(AppState::in_memory())
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/tools/holiday/book", post(book_holiday))
        .route("/tools/holiday/book/{request_id}", get(get_booking))
        .route("/interact", post(interact))
        .route("/rate_response", post(rate_response))
        .route("/get_docs", get(get_docs))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag each request with a correlation id, reusing a valid incoming one
async fn correlation_id_middleware(request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Holiday Booking Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Collects holiday booking details one question at a time",
        "endpoints": {
            "POST /tools/holiday/book": "Submit booking params for a request_id",
            "GET /tools/holiday/book/{request_id}": "Get the current state of a booking request",
            "POST /interact": "Ask the holiday desk assistant a question",
            "POST /rate_response": "Rate an assistant answer",
            "GET /get_docs": "List document pages cited to a user",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn book_holiday(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> ApiResult<BookResponse> {
    info!(
        request_id = %request.request_id,
        fields = request.params.len(),
        "booking submission"
    );

    let booking = state
        .collector
        .submit(&request.request_id, request.params)
        .await?;
    Ok(Json(booking.into()))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<BookResponse> {
    match state.collector.get(&request_id).await? {
        Some(booking) => Ok(Json(booking.into())),
        None => Err(ApiError::not_found(format!(
            "Booking request {request_id} not found"
        ))),
    }
}

async fn interact(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<InteractRequest>,
) -> ApiResult<InteractResponse> {
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    info!(
        user_id = %request.user_id,
        channel = %request.channel,
        request_id = %request.request_id,
        "interaction received"
    );

    let started = Instant::now();
    let answer = state.responder.respond(&request).await.map_err(|e| {
        error!("Responder failed for user {}: {}", request.user_id, e);
        ApiError::internal("Failed to produce an answer", e)
    })?;
    let response_duration = started.elapsed().as_secs_f64();

    state.citations.record(&request.user_id, &answer.citations);

    Ok(Json(InteractResponse {
        user_id: request.user_id,
        channel: request.channel,
        request_id: request.request_id,
        response_id: Uuid::new_v4().to_string(),
        agent_answer: answer.text,
        datetime_response: Utc::now().to_rfc3339(),
        response_duration,
    }))
}

async fn rate_response(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RateRequest>,
) -> ApiResult<RateResponse> {
    if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
        return Err(ApiError::validation(ValidationDetail::new(
            ["body", "rating"],
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
            "value_error",
        )));
    }

    let rated_at = Utc::now();
    let replaced = state.ratings.upsert(Rating {
        user_id: request.user_id.clone(),
        channel: request.channel.clone(),
        response_id: request.response_id.clone(),
        rating: request.rating,
        comment: request.comment.clone(),
        rated_at,
    });
    info!(
        user_id = %request.user_id,
        response_id = %request.response_id,
        rating = request.rating,
        replaced = replaced.is_some(),
        "rating stored"
    );

    let message = if replaced.is_some() {
        "Rating updated successfully"
    } else {
        "Rating recorded successfully"
    };
    Ok(Json(RateResponse {
        user_id: request.user_id,
        channel: request.channel,
        response_id: request.response_id,
        rating: request.rating,
        comment: request.comment,
        datetime_rating: rated_at.to_rfc3339(),
        success_code: 200,
        message: message.to_string(),
    }))
}

async fn get_docs(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<DocsResponse> {
    let Query(query) = query.map_err(|e| {
        ApiError::validation(ValidationDetail::new(["query"], e.body_text(), "value_error"))
    })?;
    let Some(user_id) = query.get("user_id") else {
        return Err(ApiError::validation(ValidationDetail::missing(&[
            "query", "user_id",
        ])));
    };

    Ok(Json(DocsResponse {
        user_id: user_id.clone(),
        doc_pages: state.citations.doc_pages(user_id),
    }))
}
