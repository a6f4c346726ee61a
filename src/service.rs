//! Caller-facing employee service.
//!
//! Owns one handler per operation, all sharing a validator registry and a store.
//! Every request leaves here with a correlation id.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{
    CreateEmployeeCommand, CreateEmployeeHandler, DeleteEmployeeHandler, DeleteEmployeeQuery, GetEmployeeByIdHandler,
    GetEmployeeByIdQuery, ListEmployeesHandler, ListEmployeesQuery, RequestHandler, UpdateEmployeeCommand,
    UpdateEmployeeHandler,
};
use crate::models::{CommandResponse, EmployeeRecord, QueryResponse};
use crate::store::EmployeeStore;
use crate::validation::{PipelineError, Request, ValidatorRegistry};

pub struct EmployeeService {
    create: CreateEmployeeHandler,
    update: UpdateEmployeeHandler,
    delete: DeleteEmployeeHandler,
    get_by_id: GetEmployeeByIdHandler,
    list: ListEmployeesHandler,
}

impl EmployeeService {
    /// Service with the default employee validators.
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self::with_validators(store, Arc::new(ValidatorRegistry::employee_defaults()))
    }

    pub fn with_validators(store: Arc<dyn EmployeeStore>, validators: Arc<ValidatorRegistry>) -> Self {
        Self {
            create: CreateEmployeeHandler::new(validators.clone(), store.clone()),
            update: UpdateEmployeeHandler::new(validators.clone(), store.clone()),
            delete: DeleteEmployeeHandler::new(validators.clone(), store.clone()),
            get_by_id: GetEmployeeByIdHandler::new(validators.clone(), store.clone()),
            list: ListEmployeesHandler::new(validators, store),
        }
    }

    pub async fn create_employee(
        &self,
        command: CreateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> Result<CommandResponse, PipelineError> {
        dispatch(&self.create, "CreateEmployee", command, cancel).await
    }

    pub async fn update_employee(
        &self,
        command: UpdateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> Result<CommandResponse, PipelineError> {
        dispatch(&self.update, "UpdateEmployee", command, cancel).await
    }

    pub async fn delete_employee(
        &self,
        query: DeleteEmployeeQuery,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse<EmployeeRecord>, PipelineError> {
        dispatch(&self.delete, "DeleteEmployee", query, cancel).await
    }

    pub async fn get_employee(
        &self,
        query: GetEmployeeByIdQuery,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse<EmployeeRecord>, PipelineError> {
        dispatch(&self.get_by_id, "GetEmployeeById", query, cancel).await
    }

    pub async fn list_employees(
        &self,
        query: ListEmployeesQuery,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse<Vec<EmployeeRecord>>, PipelineError> {
        dispatch(&self.list, "ListEmployees", query, cancel).await
    }
}

async fn dispatch<R, H>(
    handler: &H,
    operation: &str,
    mut request: R,
    cancel: &CancellationToken,
) -> Result<H::Response, PipelineError>
where
    R: Request,
    H: RequestHandler<R>,
{
    let correlation_id = request.ensure_correlation_id();
    debug!("Dispatching {operation} with CorrelationId: {correlation_id}");
    handler.handle(request, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryEmployeeStore;
    use crate::domain::fixtures::dob;
    use crate::models::{Department, StatusCode};

    fn create(name: &str, email: &str) -> CreateEmployeeCommand {
        CreateEmployeeCommand {
            correlation_id: None,
            name: name.to_string(),
            email: email.to_string(),
            date_of_birth: dob(),
            department: Department::Accounts,
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let service = EmployeeService::new(Arc::new(InMemoryEmployeeStore::new()));
        let cancel = CancellationToken::new();

        let created = service.create_employee(create("Alice", "a@x.com"), &cancel).await.unwrap();
        assert_eq!(created.status_code(), StatusCode::Ok);
        let id = created.result().unwrap().id.clone();

        let fetched = service
            .get_employee(GetEmployeeByIdQuery::new(id.clone()), &cancel)
            .await
            .unwrap();
        assert_eq!(fetched.result(), created.result());

        let updated = service
            .update_employee(
                UpdateEmployeeCommand {
                    correlation_id: None,
                    id: id.clone(),
                    name: "Alice Smith".to_string(),
                    email: "a@x.com".to_string(),
                    date_of_birth: dob(),
                    department: Department::Hr,
                },
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(updated.result().unwrap().department, Department::Hr);

        let listed = service
            .list_employees(ListEmployeesQuery::default(), &cancel)
            .await
            .unwrap();
        assert_eq!(listed.count(), 1);

        let deleted = service
            .delete_employee(DeleteEmployeeQuery::new(id.clone()), &cancel)
            .await
            .unwrap();
        assert_eq!(deleted.status_code(), StatusCode::Ok);

        let gone = service.get_employee(GetEmployeeByIdQuery::new(id), &cancel).await.unwrap();
        assert_eq!(gone.status_code(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn test_missing_validator_surfaces_as_error() {
        let mut validators = ValidatorRegistry::new();
        validators.register::<CreateEmployeeCommand>(crate::validation::rules::validate_create_employee);
        let service =
            EmployeeService::with_validators(Arc::new(InMemoryEmployeeStore::new()), Arc::new(validators));

        let result = service
            .list_employees(ListEmployeesQuery::default(), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(PipelineError::MissingValidator(_))));
    }
}
