//! Field rules for the employee requests.
//!
//! Rules are declared with `garde` on the request structs; this module runs them
//! and converts the report into [`ValidationError`]s.

use garde::{Report, Validate};

use crate::domain::{
    CreateEmployeeCommand, DeleteEmployeeQuery, GetEmployeeByIdQuery, ListEmployeesQuery, UpdateEmployeeCommand,
};
use crate::models::ValidationError;

/// Message of the not-blank rule.
pub const NOT_EMPTY: &str = "must not be empty";

/// Message of the positive-number rule.
pub const NOT_POSITIVE: &str = "must be greater than '0'";

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new(NOT_EMPTY));
    }
    Ok(())
}

/// Rejects zero.
pub fn greater_than_zero(value: &u64, _ctx: &()) -> garde::Result {
    if *value == 0 {
        return Err(garde::Error::new(NOT_POSITIVE));
    }
    Ok(())
}

pub fn validate_create_employee(command: &CreateEmployeeCommand) -> Vec<ValidationError> {
    run(command)
}

pub fn validate_update_employee(command: &UpdateEmployeeCommand) -> Vec<ValidationError> {
    run(command)
}

pub fn validate_delete_employee(query: &DeleteEmployeeQuery) -> Vec<ValidationError> {
    run(query)
}

pub fn validate_get_employee_by_id(query: &GetEmployeeByIdQuery) -> Vec<ValidationError> {
    run(query)
}

pub fn validate_list_employees(query: &ListEmployeesQuery) -> Vec<ValidationError> {
    run(query)
}

fn run<T>(value: &T) -> Vec<ValidationError>
where
    T: Validate,
    T::Context: Default,
{
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(report) => to_validation_errors(&report),
    }
}

/// Convert a garde report into field errors, one per failed rule.
fn to_validation_errors(report: &Report) -> Vec<ValidationError> {
    report
        .iter()
        .map(|(path, error)| {
            let property = property_name(&path.to_string());
            let message = error.message();
            let mut validation_error = ValidationError::new(format!("'{property}' {message}."));
            if !property.is_empty() {
                validation_error = validation_error.with_property(property);
            }
            match error_code(message) {
                Some(code) => validation_error.with_code(code),
                None => validation_error,
            }
        })
        .collect()
}

/// `page_size` -> `PageSize`.
fn property_name(path: &str) -> String {
    path.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn error_code(message: &str) -> Option<&'static str> {
    match message {
        NOT_EMPTY => Some("NotEmptyValidator"),
        NOT_POSITIVE => Some("GreaterThanValidator"),
        _ => None,
    }
}
