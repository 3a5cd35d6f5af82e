use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::Result, interaction::Interaction, params::Params};

/// Stored state of one booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub request_id: String,
    pub form_id: String,
    pub params: Params,
    pub interactions: Option<Vec<Interaction>>,
    pub complete: bool,
    pub booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRequest {
    pub fn new(request_id: impl Into<String>, form_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            request_id: request_id.into(),
            form_id: form_id.into(),
            params: Params::new(),
            interactions: None,
            complete: false,
            booking_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Complete requests carry a booking id and accept no further changes
    pub fn is_frozen(&self) -> bool {
        self.complete && self.booking_id.is_some()
    }
}

/// Trait for storing and retrieving booking requests
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn save(&self, request: BookingRequest) -> Result<()>;
    async fn get(&self, request_id: &str) -> Result<Option<BookingRequest>>;
}

/// In-memory implementation of BookingStore
#[derive(Default)]
pub struct InMemoryBookingStore {
    requests: Arc<DashMap<String, BookingRequest>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn save(&self, request: BookingRequest) -> Result<()> {
        self.requests.insert(request.request_id.clone(), request);
        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<BookingRequest>> {
        Ok(self.requests.get(request_id).map(|entry| entry.clone()))
    }
}
