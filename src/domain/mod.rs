//! Request-handling pipeline: requests, handlers and listing logic.

pub mod command_handlers;
pub mod commands;
pub mod listing;
pub mod queries;
pub mod query_handlers;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::validation::{PipelineError, Request};

pub use command_handlers::{CreateEmployeeHandler, UpdateEmployeeHandler};
pub use commands::{CreateEmployeeCommand, UpdateEmployeeCommand};
pub use listing::{FilterCriteria, PageWindow, SortField, apply_filters, apply_ordering, paginate};
pub use queries::{DeleteEmployeeQuery, GetEmployeeByIdQuery, ListEmployeesQuery, SortType};
pub use query_handlers::{DeleteEmployeeHandler, GetEmployeeByIdHandler, ListEmployeesHandler};

/// Handles one request type.
///
/// Every outcome, including store failures and cancellation, is an envelope in
/// `Ok`. `Err` is reserved for pipeline misconfiguration.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    type Response: Send;

    async fn handle(&self, request: R, cancel: &CancellationToken) -> Result<Self::Response, PipelineError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

    use crate::models::{Department, Employee};

    /// A fixed instant well in the past, so any later `Utc::now()` is strictly after it.
    pub fn past() -> DateTime<Utc> {
        Utc::now() - TimeDelta::days(30)
    }

    pub fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    pub fn employee(id: &str, name: &str, email: &str, department: Department) -> Employee {
        Employee::new(id, name, email, dob(), department, past())
    }
}
