//! Collector – loads a booking request, applies **one** submission and persists the result.
//!
//! Each HTTP call maps to one `submit`. The collector serialises submissions that share a
//! `request_id`, so the load → validate → merge → save sequence never interleaves for the same
//! request and a booking id is minted at most once.
//!
//! ```rust,ignore
//! let collector = Collector::new(Arc::new(form), Arc::new(InMemoryBookingStore::new()));
//! let outcome = collector.submit("s1", params).await?;
//! if outcome.complete {
//!     println!("booked: {:?}", outcome.booking_id);
//! }
//! ```

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{BookingError, Result},
    form::Form,
    params::Params,
    storage::{BookingRequest, BookingStore},
};

const MAX_REQUEST_ID_LEN: usize = 64;

/// High-level helper that orchestrates the _load → validate → merge → save_ pattern.
#[derive(Clone)]
pub struct Collector {
    form: Arc<Form>,
    store: Arc<dyn BookingStore>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Collector {
    pub fn new(form: Arc<Form>, store: Arc<dyn BookingStore>) -> Self {
        Self {
            form,
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Apply `params` to the request identified by `request_id` and return its new state.
    ///
    /// Unseen ids create a fresh request. Frozen requests are returned unchanged. A
    /// submission that fails validation leaves the stored request untouched.
    pub async fn submit(&self, request_id: &str, params: Params) -> Result<BookingRequest> {
        validate_request_id(request_id)?;

        let lock = self.lock_for(request_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.apply(request_id, params).await
        };
        drop(lock);
        self.release_lock(request_id);
        outcome
    }

    async fn apply(&self, request_id: &str, params: Params) -> Result<BookingRequest> {
        let mut request = match self.store.get(request_id).await? {
            Some(request) => request,
            None => {
                debug!(request_id, form_id = %self.form.id, "creating booking request");
                BookingRequest::new(request_id, &self.form.id)
            }
        };

        if request.is_frozen() {
            info!(
                request_id,
                booking_id = ?request.booking_id,
                "booking already complete, ignoring new params"
            );
            return Ok(request);
        }

        self.form.validate(&params)?;
        request.params.merge(&params);

        let pending = self.form.pending(&request.params);
        if pending.is_empty() {
            let booking_id = Uuid::new_v4().to_string();
            info!(request_id, %booking_id, "all fields collected, booking issued");
            request.complete = true;
            request.booking_id = Some(booking_id);
            request.interactions = None;
        } else {
            debug!(
                request_id,
                missing = ?pending.iter().map(|i| i.variable_name.as_str()).collect::<Vec<_>>(),
                "booking still missing fields"
            );
            request.complete = false;
            request.booking_id = None;
            request.interactions = Some(pending);
        }
        request.updated_at = chrono::Utc::now();

        self.store.save(request.clone()).await?;
        Ok(request)
    }

    /// Current state of a request without modifying it
    pub async fn get(&self, request_id: &str) -> Result<Option<BookingRequest>> {
        self.store.get(request_id).await
    }

    fn lock_for(&self, request_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(request_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the id's lock entry once no other submission holds or waits on it
    fn release_lock(&self, request_id: &str) {
        self.locks
            .remove_if(request_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Request ids are 1-64 ASCII letters, digits or `-`
pub fn validate_request_id(request_id: &str) -> Result<()> {
    if request_id.is_empty() {
        return Err(BookingError::InvalidRequestId(
            "request_id must not be empty".to_string(),
        ));
    }
    if request_id.len() > MAX_REQUEST_ID_LEN {
        return Err(BookingError::InvalidRequestId(format!(
            "request_id must be at most {MAX_REQUEST_ID_LEN} characters"
        )));
    }
    if !request_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(BookingError::InvalidRequestId(format!(
            "request_id '{request_id}' may only contain letters, digits and '-'"
        )));
    }
    Ok(())
}
