use booking_flow::{BookingRequest, Interaction, Params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extract::RequestBody;

#[derive(Debug, Serialize, Deserialize)]
pub struct BookRequest {
    pub request_id: String,
    pub params: Params,
}

impl RequestBody for BookRequest {
    const REQUIRED: &'static [&'static str] = &["request_id", "params"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub request_id: String,
    pub params: Params,
    pub interactions: Option<Vec<Interaction>>,
    pub complete: bool,
    pub booking_id: Option<String>,
}

impl From<BookingRequest> for BookResponse {
    fn from(request: BookingRequest) -> Self {
        Self {
            request_id: request.request_id,
            params: request.params,
            interactions: request.interactions,
            complete: request.complete,
            booking_id: request.booking_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InteractRequest {
    pub user_id: String,
    pub channel: String,
    pub request_id: String,
    pub message: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl RequestBody for InteractRequest {
    const REQUIRED: &'static [&'static str] = &["user_id", "channel", "request_id", "message"];
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InteractResponse {
    pub user_id: String,
    pub channel: String,
    pub request_id: String,
    pub response_id: String,
    pub agent_answer: String,
    pub datetime_response: String,
    /// Seconds spent producing the answer
    pub response_duration: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateRequest {
    pub user_id: String,
    pub channel: String,
    pub response_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RequestBody for RateRequest {
    const REQUIRED: &'static [&'static str] = &["user_id", "channel", "response_id", "rating"];
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateResponse {
    pub user_id: String,
    pub channel: String,
    pub response_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub datetime_rating: String,
    pub success_code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPages {
    pub doc_name: String,
    pub pages: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocsResponse {
    pub user_id: String,
    pub doc_pages: Vec<DocPages>,
}
