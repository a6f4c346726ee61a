//! Validator registry and dispatcher.
//!
//! Validators are registered once at startup under the [`RequestKind`] of the
//! request they check. Handlers hand any request to [`ValidatorRegistry::validate`]
//! and never name the validator they need.

pub mod rules;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::error;

use crate::domain::{
    CreateEmployeeCommand, DeleteEmployeeQuery, GetEmployeeByIdQuery, ListEmployeesQuery, UpdateEmployeeCommand,
};
use crate::models::{ValidationError, ValidationResponse};

/// Tag identifying each request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
    GetEmployeeById,
    ListEmployees,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::CreateEmployee => "CreateEmployeeCommand",
            RequestKind::UpdateEmployee => "UpdateEmployeeCommand",
            RequestKind::DeleteEmployee => "DeleteEmployeeQuery",
            RequestKind::GetEmployeeById => "GetEmployeeByIdQuery",
            RequestKind::ListEmployees => "ListEmployeesQuery",
        };
        f.write_str(name)
    }
}

/// A request flowing through the pipeline.
pub trait Request: Send + Sync + 'static {
    const KIND: RequestKind;

    fn correlation_id(&self) -> Option<&str>;

    fn set_correlation_id(&mut self, correlation_id: String);

    /// Return the correlation id, generating and storing one if absent.
    fn ensure_correlation_id(&mut self) -> String {
        if let Some(id) = self.correlation_id() {
            return id.to_string();
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.set_correlation_id(id.clone());
        id
    }
}

/// Pure check of a request, producing zero or more errors.
pub trait Validator<R>: Send + Sync {
    fn validate(&self, request: &R) -> Vec<ValidationError>;
}

impl<R, F> Validator<R> for F
where
    F: Fn(&R) -> Vec<ValidationError> + Send + Sync,
{
    fn validate(&self, request: &R) -> Vec<ValidationError> {
        self(request)
    }
}

/// Fatal pipeline faults. These are programming errors, never validation results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No validator found for {0}")]
    MissingValidator(RequestKind),
}

/// Static map from request kind to validator.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<RequestKind, Box<dyn Any + Send + Sync>>,
}

impl ValidatorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the validators of every employee request.
    pub fn employee_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register::<CreateEmployeeCommand>(rules::validate_create_employee)
            .register::<UpdateEmployeeCommand>(rules::validate_update_employee)
            .register::<DeleteEmployeeQuery>(rules::validate_delete_employee)
            .register::<GetEmployeeByIdQuery>(rules::validate_get_employee_by_id)
            .register::<ListEmployeesQuery>(rules::validate_list_employees);
        registry
    }

    /// Register `validator` for `R`, replacing any previous one.
    pub fn register<R: Request>(&mut self, validator: impl Validator<R> + 'static) -> &mut Self {
        let boxed: Box<dyn Validator<R>> = Box::new(validator);
        self.validators.insert(R::KIND, Box::new(boxed));
        self
    }

    pub fn contains(&self, kind: RequestKind) -> bool {
        self.validators.contains_key(&kind)
    }

    /// Run the validator registered for the request's kind.
    pub fn validate<R: Request>(&self, request: &R) -> Result<ValidationResponse, PipelineError> {
        let validator = self
            .validators
            .get(&R::KIND)
            .and_then(|v| v.downcast_ref::<Box<dyn Validator<R>>>())
            .ok_or_else(|| {
                error!("No validator found for {}", R::KIND);
                PipelineError::MissingValidator(R::KIND)
            })?;

        Ok(ValidationResponse::new(validator.validate(request)))
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
