pub mod collector;
pub mod error;
pub mod field;
pub mod form;
pub mod interaction;
pub mod params;
pub mod storage;

// Re-export commonly used types
pub use collector::{Collector, validate_request_id};
pub use error::{BookingError, FieldErrorKind, Result};
pub use field::{Field, IntegerRange, MaxLength, OneOf, RequirementCondition, Validator};
pub use form::{Form, FormBuilder};
pub use interaction::Interaction;
pub use params::Params;
pub use storage::{BookingRequest, BookingStore, InMemoryBookingStore};
