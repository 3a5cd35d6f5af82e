use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone)]
pub struct Rating {
    pub user_id: String,
    pub channel: String,
    pub response_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub rated_at: DateTime<Utc>,
}

/// Latest rating per `(user_id, response_id)`
#[derive(Default)]
pub struct RatingStore {
    ratings: Arc<DashMap<(String, String), Rating>>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rating`, returning the one it replaced
    pub fn upsert(&self, rating: Rating) -> Option<Rating> {
        let key = (rating.user_id.clone(), rating.response_id.clone());
        self.ratings.insert(key, rating)
    }

    pub fn get(&self, user_id: &str, response_id: &str) -> Option<Rating> {
        self.ratings
            .get(&(user_id.to_string(), response_id.to_string()))
            .map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
