use std::{num::IntErrorKind, sync::Arc};

use crate::{
    error::{BookingError, Result},
    interaction::Interaction,
    params::Params,
};

/// Decides whether a conditional field must be collected, given what is known so far
pub type RequirementCondition = Arc<dyn Fn(&Params) -> bool + Send + Sync>;

/// Checks a single non-blank value supplied for a field
pub trait Validator: Send + Sync {
    fn validate(&self, field: &str, value: &str) -> Result<()>;
}

/// A field the collector asks for until it is filled
#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub variable_type: String,
    pub question: String,
    pub options: Option<Vec<String>>,
    validators: Vec<Arc<dyn Validator>>,
    condition: Option<RequirementCondition>,
}

impl Field {
    /// A free-text field, reported with variable type `str`
    pub fn text(name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variable_type: "str".to_string(),
            question: question.into(),
            options: None,
            validators: Vec::new(),
            condition: None,
        }
    }

    /// Restrict answers to `options` (matched case-insensitively)
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.validators.push(Arc::new(OneOf::new(options.clone())));
        self.options = Some(options);
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub(crate) fn set_condition(&mut self, condition: RequirementCondition) {
        self.condition = Some(condition);
    }

    /// Whether this field has to be collected for the given params
    pub fn is_required(&self, params: &Params) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition(params))
    }

    /// Run every validator against `value`, stopping at the first failure
    pub fn validate(&self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        for validator in &self.validators {
            validator.validate(&self.name, value)?;
        }
        Ok(())
    }

    pub fn interaction(&self) -> Interaction {
        Interaction::pending(
            &self.name,
            &self.variable_type,
            &self.question,
            self.options.clone(),
        )
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("variable_type", &self.variable_type)
            .field("question", &self.question)
            .field("options", &self.options)
            .field("validators", &self.validators.len())
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// Upper bound on value length, counted in characters
pub struct MaxLength(pub usize);

impl Validator for MaxLength {
    fn validate(&self, field: &str, value: &str) -> Result<()> {
        let len = value.chars().count();
        if len > self.0 {
            return Err(BookingError::rejected(
                field,
                format!("must be at most {} characters, got {}", self.0, len),
            ));
        }
        Ok(())
    }
}

/// Whole number within an inclusive range
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
}

impl Validator for IntegerRange {
    fn validate(&self, field: &str, value: &str) -> Result<()> {
        let number: i64 = match value.parse() {
            Ok(number) => number,
            // digits beyond i64 are still a number, just out of range
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                return Err(self.out_of_range(field, value));
            }
            Err(_) => {
                return Err(BookingError::malformed(field, "Input should be a valid integer"));
            }
        };
        if number < self.min || number > self.max {
            return Err(self.out_of_range(field, number));
        }
        Ok(())
    }
}

impl IntegerRange {
    fn out_of_range(&self, field: &str, got: impl std::fmt::Display) -> BookingError {
        BookingError::rejected(
            field,
            format!("must be between {} and {}, got {}", self.min, self.max, got),
        )
    }
}

/// Case-insensitive membership in a fixed set
pub struct OneOf {
    options: Vec<String>,
}

impl OneOf {
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }
}

impl Validator for OneOf {
    fn validate(&self, field: &str, value: &str) -> Result<()> {
        if self.options.iter().any(|o| o.eq_ignore_ascii_case(value)) {
            return Ok(());
        }
        Err(BookingError::rejected(
            field,
            format!("'{}' is not one of: {}", value, self.options.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    fn kind_of(err: BookingError) -> FieldErrorKind {
        match err {
            BookingError::InvalidField { kind, .. } => kind,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_integer_range_distinguishes_malformed_and_rejected() {
        let field = Field::text("age", "What is your age?")
            .with_validator(IntegerRange { min: 1, max: 150 });

        assert!(field.validate("78").is_ok());
        assert!(field.validate(" 18 ").is_ok());
        assert_eq!(kind_of(field.validate("twenty").unwrap_err()), FieldErrorKind::Malformed);
        assert_eq!(kind_of(field.validate("0").unwrap_err()), FieldErrorKind::Rejected);
        assert_eq!(kind_of(field.validate("15450").unwrap_err()), FieldErrorKind::Rejected);
    }

    #[test]
    fn test_integer_overflow_is_out_of_range() {
        let field = Field::text("age", "What is your age?")
            .with_validator(IntegerRange { min: 1, max: 150 });

        for value in ["99999999999999999999", "-99999999999999999999"] {
            assert_eq!(kind_of(field.validate(value).unwrap_err()), FieldErrorKind::Rejected);
        }
        assert_eq!(kind_of(field.validate("9x9").unwrap_err()), FieldErrorKind::Malformed);
    }

    #[test]
    fn test_blank_values_skip_validation() {
        let field = Field::text("age", "What is your age?")
            .with_validator(IntegerRange { min: 1, max: 150 });
        assert!(field.validate("").is_ok());
        assert!(field.validate("   ").is_ok());
    }

    #[test]
    fn test_options_are_case_insensitive() {
        let field = Field::text("insurance", "Insurance?").with_options(["yes", "no"]);

        assert!(field.validate("Yes").is_ok());
        assert!(field.validate("NO").is_ok());
        assert_eq!(kind_of(field.validate("maybe yes").unwrap_err()), FieldErrorKind::Rejected);
        assert_eq!(
            field.interaction().options,
            Some(vec!["yes".to_string(), "no".to_string()])
        );
    }

    #[test]
    fn test_max_length_counts_characters() {
        let field = Field::text("name", "What is your name?").with_validator(MaxLength(5));
        assert!(field.validate("émile").is_ok());
        assert!(field.validate("émilie").is_err());
    }
}
