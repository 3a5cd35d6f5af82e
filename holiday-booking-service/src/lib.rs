pub mod assistant;
pub mod config;
pub mod countries;
pub mod error;
pub mod extract;
pub mod holiday;
pub mod models;
pub mod ratings;
pub mod service;

pub use config::{LogFormat, ServiceConfig};
pub use holiday::{build_holiday_form, create_collector};
pub use models::*;
pub use service::{AppState, build_router, create_app};
