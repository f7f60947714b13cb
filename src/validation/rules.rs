use super::ValidationErrors;
use crate::core::{MigrationTaskConfig, TaskField};
use regex::Regex;

lazy_static::lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
        .expect("identifier pattern is valid");
}

/// Returns true when `value` can be spliced into SQL text as a bare
/// table or column name.
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER.is_match(value)
}

/// Trait for validation rules (Chain of Responsibility pattern)
pub trait ValidationRule: Send + Sync {
    fn validate(&self, config: &MigrationTaskConfig, errors: &mut ValidationErrors);
}

/// Requires a field to be set, and optionally to be non-blank
#[derive(Debug, Clone, Copy)]
pub struct RequiredFieldRule {
    field: TaskField,
    reject_blank: bool,
}

impl RequiredFieldRule {
    /// Only an absent value is an error
    pub fn present(field: TaskField) -> Self {
        Self {
            field,
            reject_blank: false,
        }
    }

    /// Absent values and values that trim to nothing are errors
    pub fn non_blank(field: TaskField) -> Self {
        Self {
            field,
            reject_blank: true,
        }
    }
}

impl ValidationRule for RequiredFieldRule {
    fn validate(&self, config: &MigrationTaskConfig, errors: &mut ValidationErrors) {
        let label = self.field.label();
        match config.get(self.field) {
            None if self.reject_blank => {
                errors.add_error(format!("{} is required and cannot be empty", label))
            }
            None => errors.add_error(format!("{} is required", label)),
            Some(value) if self.reject_blank && value.trim().is_empty() => {
                errors.add_error(format!("{} is required and cannot be empty", label))
            }
            Some(_) => {}
        }
    }
}

/// Table and column names are interpolated into the statement text, so they
/// must match the identifier allow-list. Absent values are left to
/// `RequiredFieldRule`.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRule {
    field: TaskField,
}

impl IdentifierRule {
    pub fn new(field: TaskField) -> Self {
        Self { field }
    }
}

impl ValidationRule for IdentifierRule {
    fn validate(&self, config: &MigrationTaskConfig, errors: &mut ValidationErrors) {
        if let Some(value) = config.get(self.field) {
            if !is_valid_identifier(value) {
                errors.add_error(format!(
                    "{} is not a valid SQL identifier: {}",
                    self.field.label(),
                    value
                ));
            }
        }
    }
}
