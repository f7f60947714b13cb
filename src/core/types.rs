use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two resource-backed task shapes a changeset runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskVariant {
    /// Inserts a JSON file into a caller-named table alongside skill tags.
    StreamJsonInsert,
    /// Inserts or updates a row of the `employees` table.
    EmployeeUpsert,
}

impl fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamJsonInsert => write!(f, "streamJsonInsert"),
            Self::EmployeeUpsert => write!(f, "employeeUpsert"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    #[default]
    Insert,
    Update,
}

impl OperationMode {
    /// `"update"` (any case, no surrounding whitespace) selects `Update`;
    /// everything else, including no value at all, falls back to `Insert`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("update") => Self::Update,
            _ => Self::Insert,
        }
    }
}

/// Named configuration fields, used for validation messages and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    TableName,
    IdColumn,
    IdValue,
    JsonColumn,
    PrimarySkill,
    SecondarySkill,
    JsonFilePath,
    EmployeeIdColumn,
    EmployeeIdValue,
    Id,
    Firstname,
    Lastname,
    Email,
    Skills,
}

impl TaskField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TableName => "tableName",
            Self::IdColumn => "idColumn",
            Self::IdValue => "idValue",
            Self::JsonColumn => "jsonColumn",
            Self::PrimarySkill => "primarySkill",
            Self::SecondarySkill => "secondarySkill",
            Self::JsonFilePath => "jsonFilePath",
            Self::EmployeeIdColumn => "employeeIdColumn",
            Self::EmployeeIdValue => "employeeIdValue",
            Self::Id => "id",
            Self::Firstname => "firstName",
            Self::Lastname => "lastName",
            Self::Email => "email",
            Self::Skills => "skills",
        }
    }
}

/// Flat, string-valued task configuration.
///
/// Every field is optional until validation; values are taken verbatim,
/// nothing is trimmed or coerced on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationTaskConfig {
    pub table_name: Option<String>,
    pub id_column: Option<String>,
    pub id_value: Option<String>,
    pub json_column: Option<String>,
    pub primary_skill: Option<String>,
    pub secondary_skill: Option<String>,
    pub json_file_path: Option<String>,
    pub employee_id_column: Option<String>,
    pub employee_id_value: Option<String>,
    pub id: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub skills: Option<String>,
    pub operation_type: Option<String>,
}

macro_rules! config_setters {
    ($($field:ident => $set:ident, $with:ident;)*) => {
        impl MigrationTaskConfig {
            $(
                pub fn $set(&mut self, value: impl Into<String>) {
                    self.$field = Some(value.into());
                }

                pub fn $with(mut self, value: impl Into<String>) -> Self {
                    self.$set(value);
                    self
                }
            )*
        }
    };
}

config_setters! {
    table_name => set_table_name, with_table_name;
    id_column => set_id_column, with_id_column;
    id_value => set_id_value, with_id_value;
    json_column => set_json_column, with_json_column;
    primary_skill => set_primary_skill, with_primary_skill;
    secondary_skill => set_secondary_skill, with_secondary_skill;
    json_file_path => set_json_file_path, with_json_file_path;
    employee_id_column => set_employee_id_column, with_employee_id_column;
    employee_id_value => set_employee_id_value, with_employee_id_value;
    id => set_id, with_id;
    firstname => set_firstname, with_firstname;
    lastname => set_lastname, with_lastname;
    email => set_email, with_email;
    skills => set_skills, with_skills;
    operation_type => set_operation_type, with_operation_type;
}

impl MigrationTaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: TaskField) -> Option<&str> {
        let value = match field {
            TaskField::TableName => &self.table_name,
            TaskField::IdColumn => &self.id_column,
            TaskField::IdValue => &self.id_value,
            TaskField::JsonColumn => &self.json_column,
            TaskField::PrimarySkill => &self.primary_skill,
            TaskField::SecondarySkill => &self.secondary_skill,
            TaskField::JsonFilePath => &self.json_file_path,
            TaskField::EmployeeIdColumn => &self.employee_id_column,
            TaskField::EmployeeIdValue => &self.employee_id_value,
            TaskField::Id => &self.id,
            TaskField::Firstname => &self.firstname,
            TaskField::Lastname => &self.lastname,
            TaskField::Email => &self.email,
            TaskField::Skills => &self.skills,
        };
        value.as_deref()
    }

    pub fn operation_mode(&self) -> OperationMode {
        OperationMode::parse(self.operation_type.as_deref())
    }
}
