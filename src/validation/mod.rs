//! Parameter validation
//!
//! Validates a task configuration before anything touches the database.
//! Uses the Chain of Responsibility pattern: every rule appends its own
//! messages to a shared [`ValidationErrors`] list.
//!
//! - `rules.rs` - required-field and identifier rules

mod rules;

use crate::core::{MigrationTaskConfig, TaskField, TaskVariant};
use std::fmt;

pub use rules::{IdentifierRule, RequiredFieldRule, ValidationRule, is_valid_identifier};

/// Ordered list of human-readable validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

const STREAM_JSON_REQUIRED: [TaskField; 9] = [
    TaskField::TableName,
    TaskField::IdColumn,
    TaskField::IdValue,
    TaskField::PrimarySkill,
    TaskField::SecondarySkill,
    TaskField::JsonColumn,
    TaskField::JsonFilePath,
    TaskField::EmployeeIdColumn,
    TaskField::EmployeeIdValue,
];

const STREAM_JSON_IDENTIFIERS: [TaskField; 4] = [
    TaskField::TableName,
    TaskField::IdColumn,
    TaskField::JsonColumn,
    TaskField::EmployeeIdColumn,
];

const EMPLOYEE_REQUIRED: [TaskField; 5] = [
    TaskField::Id,
    TaskField::Firstname,
    TaskField::Lastname,
    TaskField::Email,
    TaskField::Skills,
];

/// Runs a chain of rules over a configuration
pub struct ParameterValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ParameterValidator {
    /// Create the validator a task variant needs
    pub fn for_variant(variant: TaskVariant) -> Self {
        let mut rules: Vec<Box<dyn ValidationRule>> = Vec::new();
        match variant {
            TaskVariant::StreamJsonInsert => {
                for field in STREAM_JSON_REQUIRED {
                    rules.push(Box::new(RequiredFieldRule::present(field)));
                }
                for field in STREAM_JSON_IDENTIFIERS {
                    rules.push(Box::new(IdentifierRule::new(field)));
                }
            }
            TaskVariant::EmployeeUpsert => {
                for field in EMPLOYEE_REQUIRED {
                    rules.push(Box::new(RequiredFieldRule::non_blank(field)));
                }
            }
        }
        Self { rules }
    }

    /// Validate a configuration against all rules
    pub fn validate(&self, config: &MigrationTaskConfig) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            rule.validate(config, &mut errors);
        }
        errors
    }
}
