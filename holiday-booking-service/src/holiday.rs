use booking_flow::{
    BookingStore, Collector, Field, Form, FormBuilder, IntegerRange, MaxLength, Params,
};
use std::sync::Arc;

use crate::countries::KnownCountry;

pub const HOLIDAY_FORM_ID: &str = "holiday_booking";

pub mod fields {
    pub const NAME: &str = "name";
    pub const COUNTRY: &str = "country";
    pub const AGE: &str = "age";
    pub const INSURANCE: &str = "insurance";
}

const MAX_TEXT_LEN: usize = 100;
const MIN_AGE: i64 = 1;
const MAX_AGE: i64 = 150;
/// Travellers strictly older than this are asked about insurance
const INSURANCE_AGE_THRESHOLD: i64 = 50;

pub fn build_holiday_form() -> Form {
    FormBuilder::new(HOLIDAY_FORM_ID)
        .add_field(
            Field::text(fields::NAME, "What is your name?").with_validator(MaxLength(MAX_TEXT_LEN)),
        )
        .add_field(
            Field::text(fields::COUNTRY, "What is your country of birth?")
                .with_validator(MaxLength(MAX_TEXT_LEN))
                .with_validator(KnownCountry),
        )
        .add_field(Field::text(fields::AGE, "What is your age?").with_validator(IntegerRange {
            min: MIN_AGE,
            max: MAX_AGE,
        }))
        .add_conditional_field(
            Field::text(
                fields::INSURANCE,
                "As you are over 50, do you need insurance?",
            )
            .with_options(["yes", "no"]),
            needs_insurance,
        )
        .build()
}

fn needs_insurance(params: &Params) -> bool {
    params
        .get(fields::AGE)
        .and_then(|age| age.parse::<i64>().ok())
        .is_some_and(|age| age > INSURANCE_AGE_THRESHOLD)
}

pub fn create_collector(store: Arc<dyn BookingStore>) -> Collector {
    Collector::new(Arc::new(build_holiday_form()), store)
}
