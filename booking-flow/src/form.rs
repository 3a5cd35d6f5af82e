use std::sync::Arc;

use crate::{
    error::Result,
    field::Field,
    interaction::Interaction,
    params::Params,
};

/// An ordered set of fields to collect
///
/// Field order is the order questions are asked in.
#[derive(Debug)]
pub struct Form {
    pub id: String,
    fields: Vec<Field>,
}

impl Form {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate every known field present in `params`; unknown keys are ignored
    pub fn validate(&self, params: &Params) -> Result<()> {
        for field in &self.fields {
            if let Some(value) = params.raw(&field.name) {
                field.validate(value)?;
            }
        }
        Ok(())
    }

    /// Questions for every required field that is still missing, in form order
    pub fn pending(&self, params: &Params) -> Vec<Interaction> {
        self.fields
            .iter()
            .filter(|f| f.is_required(params) && !params.is_filled(&f.name))
            .map(Field::interaction)
            .collect()
    }

    pub fn is_complete(&self, params: &Params) -> bool {
        self.pending(params).is_empty()
    }
}

/// Builder for creating forms
pub struct FormBuilder {
    form: Form,
}

impl FormBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            form: Form::new(id),
        }
    }

    /// Add a field that is always required
    pub fn add_field(mut self, field: Field) -> Self {
        self.form.fields.push(field);
        self
    }

    /// Add a field that is only required while `condition` holds
    pub fn add_conditional_field<F>(mut self, mut field: Field, condition: F) -> Self
    where
        F: Fn(&Params) -> bool + Send + Sync + 'static,
    {
        field.set_condition(Arc::new(condition));
        self.form.fields.push(field);
        self
    }

    pub fn build(self) -> Form {
        self.form
    }
}
