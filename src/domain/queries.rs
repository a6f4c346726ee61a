//! Queries over employees.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::Department;
use crate::validation::rules::{greater_than_zero, not_blank};
use crate::validation::{Request, RequestKind};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Remove an employee by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEmployeeQuery {
    #[garde(skip)]
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[garde(custom(not_blank))]
    pub id: String,
}

impl DeleteEmployeeQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            correlation_id: None,
            id: id.into(),
        }
    }
}

impl Request for DeleteEmployeeQuery {
    const KIND: RequestKind = RequestKind::DeleteEmployee;

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn set_correlation_id(&mut self, correlation_id: String) {
        self.correlation_id = Some(correlation_id);
    }
}

/// Fetch a single employee by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetEmployeeByIdQuery {
    #[garde(skip)]
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[garde(custom(not_blank))]
    pub id: String,
}

impl GetEmployeeByIdQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            correlation_id: None,
            id: id.into(),
        }
    }
}

impl Request for GetEmployeeByIdQuery {
    const KIND: RequestKind = RequestKind::GetEmployeeById;

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn set_correlation_id(&mut self, correlation_id: String) {
        self.correlation_id = Some(correlation_id);
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    #[default]
    Asc,
    Desc,
}

/// Filtered, sorted, paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ListEmployeesQuery {
    #[garde(skip)]
    pub correlation_id: Option<String>,
    /// Substring of the name.
    #[garde(skip)]
    pub name: Option<String>,
    /// Substring of the email.
    #[garde(skip)]
    pub email: Option<String>,
    #[garde(skip)]
    pub department: Option<Department>,
    /// `department`, `email`, `dob`; anything else sorts by name.
    #[garde(skip)]
    pub sort_by: Option<String>,
    #[garde(skip)]
    pub sort_type: SortType,
    #[garde(skip)]
    pub page_no: u64,
    #[garde(custom(greater_than_zero))]
    pub page_size: u64,
}

impl Default for ListEmployeesQuery {
    fn default() -> Self {
        Self {
            correlation_id: None,
            name: None,
            email: None,
            department: None,
            sort_by: None,
            sort_type: SortType::Asc,
            page_no: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Request for ListEmployeesQuery {
    const KIND: RequestKind = RequestKind::ListEmployees;

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn set_correlation_id(&mut self, correlation_id: String) {
        self.correlation_id = Some(correlation_id);
    }
}
