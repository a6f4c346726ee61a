//! Employee entity, transport record and department set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

/// Fixed set of departments.
///
/// Ordering follows declaration order, which is also the sort order used when
/// listing employees by department. Serializes as the canonical name and
/// deserializes through [`FromStr`], so both ignore case the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Department {
    Admin,
    Accounts,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "IT")]
    It,
    Sales,
    Marketing,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Admin,
        Department::Accounts,
        Department::Hr,
        Department::It,
        Department::Sales,
        Department::Marketing,
    ];

    /// Canonical name, as stored in the database and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Admin => "Admin",
            Department::Accounts => "Accounts",
            Department::Hr => "HR",
            Department::It => "IT",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department name did not match any known department.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown department: {0}")]
pub struct ParseDepartmentError(pub String);

impl FromStr for Department {
    type Err = ParseDepartmentError;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDepartmentError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Department {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Persisted employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub department: Department,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Build a new employee with both timestamps set to `now`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
        department: Department,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            date_of_birth,
            department,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. The timestamp never moves backwards, even if the
    /// wall clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + TimeDelta::microseconds(1);
        self.updated_at = now.max(floor);
    }
}

/// Transport shape of an employee, used across every boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    pub department: Department,
}

impl From<&Employee> for EmployeeRecord {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            date_of_birth: employee.date_of_birth,
            department: employee.department,
        }
    }
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            date_of_birth: employee.date_of_birth,
            department: employee.department,
        }
    }
}
