//! Commands that mutate employees.

use chrono::NaiveDate;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::Department;
use crate::validation::rules::not_blank;
use crate::validation::{Request, RequestKind};

/// Create a new employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeCommand {
    #[garde(skip)]
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[garde(custom(not_blank))]
    pub name: String,
    #[garde(custom(not_blank))]
    pub email: String,
    #[garde(skip)]
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    #[garde(skip)]
    pub department: Department,
}

impl Request for CreateEmployeeCommand {
    const KIND: RequestKind = RequestKind::CreateEmployee;

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn set_correlation_id(&mut self, correlation_id: String) {
        self.correlation_id = Some(correlation_id);
    }
}

/// Update name, email and department of an existing employee.
///
/// `date_of_birth` is accepted for shape compatibility but never applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeCommand {
    #[garde(skip)]
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[garde(custom(not_blank))]
    pub id: String,
    #[garde(custom(not_blank))]
    pub name: String,
    #[garde(custom(not_blank))]
    pub email: String,
    #[garde(skip)]
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    #[garde(skip)]
    pub department: Department,
}

impl Request for UpdateEmployeeCommand {
    const KIND: RequestKind = RequestKind::UpdateEmployee;

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn set_correlation_id(&mut self, correlation_id: String) {
        self.correlation_id = Some(correlation_id);
    }
}
