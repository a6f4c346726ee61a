//! Create and Update handlers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::{CommandResponse, Employee, EmployeeRecord, Envelope, StatusCode, ValidationError};
use crate::store::{EmployeePredicate, EmployeeStore, StoreResult, cancellable};
use crate::validation::{PipelineError, Request, ValidatorRegistry};

use super::RequestHandler;
use super::commands::{CreateEmployeeCommand, UpdateEmployeeCommand};

pub const EMAIL_ALREADY_EXISTS: &str = "Email already exists";
pub const FAILED_TO_CREATE: &str = "Failed to create employee";
pub const EMPLOYEE_ID_NOT_FOUND: &str = "Employee Id not found";

/// Store failure: one error carrying the failure's message.
pub(crate) fn internal_error<T>(message: impl Into<String>) -> Envelope<T> {
    Envelope::failure(StatusCode::InternalServerError, ValidationError::new(message))
}

pub struct CreateEmployeeHandler {
    validators: Arc<ValidatorRegistry>,
    store: Arc<dyn EmployeeStore>,
}

impl CreateEmployeeHandler {
    pub fn new(validators: Arc<ValidatorRegistry>, store: Arc<dyn EmployeeStore>) -> Self {
        Self { validators, store }
    }

    /// Uniqueness check, id assignment and insert.
    ///
    /// The email check and the insert are separate store calls; a concurrent
    /// create with the same email is stopped by the store's unique index, not here.
    async fn create(&self, command: CreateEmployeeCommand, cancel: &CancellationToken) -> StoreResult<CommandResponse> {
        let existing = cancellable(
            cancel,
            self.store
                .find_one(&EmployeePredicate::EmailEquals(command.email.clone())),
        )
        .await?;
        if existing.is_some() {
            return Ok(Envelope::failure(
                StatusCode::BadRequest,
                ValidationError::new(EMAIL_ALREADY_EXISTS).with_property("Email"),
            ));
        }

        let employee = Employee::new(
            uuid::Uuid::new_v4().to_string(),
            command.name,
            command.email,
            command.date_of_birth,
            command.department,
            Utc::now(),
        );

        let inserted = cancellable(cancel, self.store.insert(employee)).await?;
        Ok(match inserted {
            Some(employee) => Envelope::ok(EmployeeRecord::from(employee)),
            None => internal_error(FAILED_TO_CREATE),
        })
    }
}

#[async_trait]
impl RequestHandler<CreateEmployeeCommand> for CreateEmployeeHandler {
    type Response = CommandResponse;

    async fn handle(
        &self,
        mut command: CreateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> Result<CommandResponse, PipelineError> {
        let correlation_id = command.ensure_correlation_id();
        info!("CreateEmployeeHandler STARTED with CorrelationId: {correlation_id}");

        let validation = self.validators.validate(&command)?;
        if !validation.is_valid() {
            warn!("CreateEmployeeHandler -> Validation error occurred for CorrelationId: {correlation_id}");
            info!("CreateEmployeeHandler ENDED with failure for CorrelationId: {correlation_id}");
            return Ok(Envelope::invalid(validation));
        }

        let response = match self.create(command, cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!("Exception occurred while executing CreateEmployeeHandler for CorrelationId: {correlation_id}, Error: {e}");
                internal_error(e.to_string())
            }
        };

        if response.is_valid() {
            info!("CreateEmployeeHandler ENDED Successfully with CorrelationId: {correlation_id}");
        } else {
            info!("CreateEmployeeHandler ENDED with failure for CorrelationId: {correlation_id}");
        }
        Ok(response)
    }
}

pub struct UpdateEmployeeHandler {
    validators: Arc<ValidatorRegistry>,
    store: Arc<dyn EmployeeStore>,
}

impl UpdateEmployeeHandler {
    pub fn new(validators: Arc<ValidatorRegistry>, store: Arc<dyn EmployeeStore>) -> Self {
        Self { validators, store }
    }

    async fn update(&self, command: UpdateEmployeeCommand, cancel: &CancellationToken) -> StoreResult<CommandResponse> {
        let taken = cancellable(
            cancel,
            self.store.find_one(&EmployeePredicate::EmailTakenByOther {
                email: command.email.clone(),
                id: command.id.clone(),
            }),
        )
        .await?;
        if taken.is_some() {
            // Unlike create, a taken email on update reports an internal error.
            return Ok(Envelope::failure(
                StatusCode::InternalServerError,
                ValidationError::new(EMAIL_ALREADY_EXISTS).with_property("Email"),
            ));
        }

        let found = cancellable(
            cancel,
            self.store.find_one(&EmployeePredicate::IdEquals(command.id.clone())),
        )
        .await?;
        let Some(mut employee) = found else {
            return Ok(Envelope::failure(
                StatusCode::BadRequest,
                ValidationError::new(EMPLOYEE_ID_NOT_FOUND),
            ));
        };

        // Date of birth and created_at are never changed by an update.
        employee.name = command.name;
        employee.email = command.email;
        employee.department = command.department;
        employee.touch(Utc::now());

        let updated = cancellable(cancel, self.store.update(employee)).await?;
        Ok(Envelope::ok(EmployeeRecord::from(updated)))
    }
}

#[async_trait]
impl RequestHandler<UpdateEmployeeCommand> for UpdateEmployeeHandler {
    type Response = CommandResponse;

    async fn handle(
        &self,
        mut command: UpdateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> Result<CommandResponse, PipelineError> {
        let correlation_id = command.ensure_correlation_id();
        info!("UpdateEmployeeHandler STARTED with CorrelationId: {correlation_id}");

        let validation = self.validators.validate(&command)?;
        if !validation.is_valid() {
            warn!("UpdateEmployeeHandler -> Validation error occurred for CorrelationId: {correlation_id}");
            info!("UpdateEmployeeHandler ENDED with failure for CorrelationId: {correlation_id}");
            return Ok(Envelope::invalid(validation));
        }

        let response = match self.update(command, cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!("Exception occurred while executing UpdateEmployeeHandler for CorrelationId: {correlation_id}, Error: {e}");
                internal_error(e.to_string())
            }
        };

        if response.is_valid() {
            info!("UpdateEmployeeHandler ENDED Successfully with CorrelationId: {correlation_id}");
        } else {
            info!("UpdateEmployeeHandler ENDED with failure for CorrelationId: {correlation_id}");
        }
        Ok(response)
    }
}
