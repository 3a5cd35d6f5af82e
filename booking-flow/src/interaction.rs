use serde::{Deserialize, Serialize};

/// A pending question for one missing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub variable_name: String,
    pub variable_type: String,
    pub question: String,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub complete: bool,
}

impl Interaction {
    pub fn pending(
        variable_name: impl Into<String>,
        variable_type: impl Into<String>,
        question: impl Into<String>,
        options: Option<Vec<String>>,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            variable_type: variable_type.into(),
            question: question.into(),
            options,
            answer: None,
            complete: false,
        }
    }
}
