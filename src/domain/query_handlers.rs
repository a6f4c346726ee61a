//! GetById, List and Delete handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::models::{EmployeeRecord, Envelope, QueryResponse, StatusCode, ValidationError};
use crate::store::{EmployeePredicate, EmployeeStore, StoreResult, cancellable};
use crate::validation::{PipelineError, Request, ValidatorRegistry};

use super::RequestHandler;
use super::command_handlers::{EMPLOYEE_ID_NOT_FOUND, internal_error};
use super::listing::{FilterCriteria, PageWindow, SortField, apply_filters, apply_ordering, paginate};
use super::queries::{DeleteEmployeeQuery, GetEmployeeByIdQuery, ListEmployeesQuery};

pub const NO_EMPLOYEE_WITH_ID: &str = "No employee found with this id";

fn log_end<T>(handler: &str, correlation_id: &str, response: &Envelope<T>) {
    if response.is_valid() {
        info!("{handler} ENDED Successfully with CorrelationId: {correlation_id}");
    } else {
        info!("{handler} ENDED with failure for CorrelationId: {correlation_id}");
    }
}

pub struct GetEmployeeByIdHandler {
    validators: Arc<ValidatorRegistry>,
    store: Arc<dyn EmployeeStore>,
}

impl GetEmployeeByIdHandler {
    pub fn new(validators: Arc<ValidatorRegistry>, store: Arc<dyn EmployeeStore>) -> Self {
        Self { validators, store }
    }

    async fn lookup(&self, id: String, cancel: &CancellationToken) -> StoreResult<QueryResponse<EmployeeRecord>> {
        let found = cancellable(cancel, self.store.find_one(&EmployeePredicate::IdEquals(id))).await?;
        Ok(match found {
            Some(employee) => Envelope::ok(EmployeeRecord::from(employee)).with_count(1),
            None => Envelope::failure(
                StatusCode::NotFound,
                ValidationError::new(NO_EMPLOYEE_WITH_ID).with_property("Id"),
            ),
        })
    }
}

#[async_trait]
impl RequestHandler<GetEmployeeByIdQuery> for GetEmployeeByIdHandler {
    type Response = QueryResponse<EmployeeRecord>;

    async fn handle(
        &self,
        mut query: GetEmployeeByIdQuery,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, PipelineError> {
        let correlation_id = query.ensure_correlation_id();
        info!("GetEmployeeByIdHandler STARTED with CorrelationId: {correlation_id}");

        let validation = self.validators.validate(&query)?;
        if !validation.is_valid() {
            warn!("GetEmployeeByIdHandler -> Validation error occurred for CorrelationId: {correlation_id}");
            info!("GetEmployeeByIdHandler ENDED with failure for CorrelationId: {correlation_id}");
            return Ok(Envelope::invalid(validation));
        }

        let response = match self.lookup(query.id, cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!("Exception occurred while executing GetEmployeeByIdHandler for CorrelationId: {correlation_id}, Error: {e}");
                internal_error(e.to_string())
            }
        };
        log_end("GetEmployeeByIdHandler", &correlation_id, &response);
        Ok(response)
    }
}

pub struct ListEmployeesHandler {
    validators: Arc<ValidatorRegistry>,
    store: Arc<dyn EmployeeStore>,
}

impl ListEmployeesHandler {
    pub fn new(validators: Arc<ValidatorRegistry>, store: Arc<dyn EmployeeStore>) -> Self {
        Self { validators, store }
    }

    async fn list(
        &self,
        query: &ListEmployeesQuery,
        correlation_id: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<QueryResponse<Vec<EmployeeRecord>>> {
        debug!("ListEmployeesHandler -> Going to fetch all Employees for CorrelationId: {correlation_id}");
        let all = cancellable(cancel, self.store.find_many(&EmployeePredicate::All)).await?;

        let criteria = FilterCriteria::from_query(query);
        if let Some(name) = &criteria.name {
            debug!("ListEmployeesHandler -> Going to apply condition on Name: {name} for CorrelationId: {correlation_id}");
        }
        if let Some(email) = &criteria.email {
            debug!("ListEmployeesHandler -> Going to apply condition on Email: {email} for CorrelationId: {correlation_id}");
        }
        if let Some(department) = criteria.department {
            debug!(
                "ListEmployeesHandler -> Going to apply condition on Department: {department} for CorrelationId: {correlation_id}"
            );
        }
        let mut matching = apply_filters(&criteria, all);

        let field = SortField::parse(query.sort_by.as_deref());
        debug!("ListEmployeesHandler -> Ordering by {field:?} {:?} for CorrelationId: {correlation_id}", query.sort_type);
        apply_ordering(&mut matching, field, query.sort_type);

        let page = paginate(matching, PageWindow::new(query.page_no, query.page_size));
        let records = page.into_iter().map(EmployeeRecord::from).collect();
        Ok(Envelope::list(records))
    }
}

#[async_trait]
impl RequestHandler<ListEmployeesQuery> for ListEmployeesHandler {
    type Response = QueryResponse<Vec<EmployeeRecord>>;

    async fn handle(
        &self,
        mut query: ListEmployeesQuery,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, PipelineError> {
        let correlation_id = query.ensure_correlation_id();
        info!("ListEmployeesHandler STARTED with CorrelationId: {correlation_id}");

        let validation = self.validators.validate(&query)?;
        if !validation.is_valid() {
            warn!("ListEmployeesHandler -> Validation error occurred for CorrelationId: {correlation_id}");
            info!("ListEmployeesHandler ENDED with failure for CorrelationId: {correlation_id}");
            return Ok(Envelope::invalid(validation));
        }

        let response = match self.list(&query, &correlation_id, cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!("Exception occurred while executing ListEmployeesHandler for CorrelationId: {correlation_id}, Error: {e}");
                internal_error(e.to_string())
            }
        };
        log_end("ListEmployeesHandler", &correlation_id, &response);
        Ok(response)
    }
}

pub struct DeleteEmployeeHandler {
    validators: Arc<ValidatorRegistry>,
    store: Arc<dyn EmployeeStore>,
}

impl DeleteEmployeeHandler {
    pub fn new(validators: Arc<ValidatorRegistry>, store: Arc<dyn EmployeeStore>) -> Self {
        Self { validators, store }
    }

    async fn delete(&self, id: &str, cancel: &CancellationToken) -> StoreResult<QueryResponse<EmployeeRecord>> {
        let removed = cancellable(cancel, self.store.delete(id)).await?;
        Ok(match removed {
            Some(employee) => Envelope::ok(EmployeeRecord::from(employee)).with_count(1),
            None => Envelope::failure(StatusCode::BadRequest, ValidationError::new(EMPLOYEE_ID_NOT_FOUND)),
        })
    }
}

#[async_trait]
impl RequestHandler<DeleteEmployeeQuery> for DeleteEmployeeHandler {
    type Response = QueryResponse<EmployeeRecord>;

    async fn handle(
        &self,
        mut query: DeleteEmployeeQuery,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, PipelineError> {
        let correlation_id = query.ensure_correlation_id();
        info!("DeleteEmployeeHandler STARTED with CorrelationId: {correlation_id}");

        let validation = self.validators.validate(&query)?;
        if !validation.is_valid() {
            warn!("DeleteEmployeeHandler -> Validation error occurred for CorrelationId: {correlation_id}");
            info!("DeleteEmployeeHandler ENDED with failure for CorrelationId: {correlation_id}");
            return Ok(Envelope::invalid(validation));
        }

        let response = match self.delete(&query.id, cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!("Exception occurred while executing DeleteEmployeeHandler for CorrelationId: {correlation_id}, Error: {e}");
                internal_error(e.to_string())
            }
        };
        log_end("DeleteEmployeeHandler", &correlation_id, &response);
        Ok(response)
    }
}
