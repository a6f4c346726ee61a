//! Employee store port.
//!
//! Handlers depend only on [`EmployeeStore`]; the database and in-memory adapters
//! live in [`crate::db`].

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{Department, Employee};

/// Errors reported by a store adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Unique email constraint rejected the write
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Update target vanished between lookup and write
    #[error("Employee not found: {0}")]
    NotFound(String),

    /// Stored row could not be mapped back to an employee
    #[error("Corrupt employee record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Typed predicate over employees, interpreted by every store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeePredicate {
    All,
    IdEquals(String),
    EmailEquals(String),
    /// Same email, different id.
    EmailTakenByOther { email: String, id: String },
    /// Case-sensitive literal substring of the name.
    NameContains(String),
    /// Case-sensitive literal substring of the email.
    EmailContains(String),
    DepartmentEquals(Department),
    And(Vec<EmployeePredicate>),
}

impl EmployeePredicate {
    /// Evaluate against a single employee.
    pub fn matches(&self, employee: &Employee) -> bool {
        match self {
            EmployeePredicate::All => true,
            EmployeePredicate::IdEquals(id) => employee.id == *id,
            EmployeePredicate::EmailEquals(email) => employee.email == *email,
            EmployeePredicate::EmailTakenByOther { email, id } => employee.email == *email && employee.id != *id,
            EmployeePredicate::NameContains(needle) => employee.name.contains(needle.as_str()),
            EmployeePredicate::EmailContains(needle) => employee.email.contains(needle.as_str()),
            EmployeePredicate::DepartmentEquals(department) => employee.department == *department,
            EmployeePredicate::And(parts) => parts.iter().all(|p| p.matches(employee)),
        }
    }

    /// Conjunction, flattening `All` and nested `And`.
    pub fn and(self, other: EmployeePredicate) -> EmployeePredicate {
        match (self, other) {
            (EmployeePredicate::All, p) | (p, EmployeePredicate::All) => p,
            (EmployeePredicate::And(mut left), EmployeePredicate::And(right)) => {
                left.extend(right);
                EmployeePredicate::And(left)
            }
            (EmployeePredicate::And(mut left), p) => {
                left.push(p);
                EmployeePredicate::And(left)
            }
            (p, EmployeePredicate::And(mut right)) => {
                right.insert(0, p);
                EmployeePredicate::And(right)
            }
            (left, right) => EmployeePredicate::And(vec![left, right]),
        }
    }
}

/// Persistence operations the handlers rely on.
///
/// Email uniqueness is enforced here, at the store boundary. Handler-side checks
/// only produce friendlier errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// First employee matching the predicate, if any.
    async fn find_one(&self, predicate: &EmployeePredicate) -> StoreResult<Option<Employee>>;

    /// All matching employees, in insertion order.
    async fn find_many(&self, predicate: &EmployeePredicate) -> StoreResult<Vec<Employee>>;

    /// Insert a new employee. `None` means the store reported no row.
    async fn insert(&self, employee: Employee) -> StoreResult<Option<Employee>>;

    /// Persist changes to an existing employee.
    async fn update(&self, employee: Employee) -> StoreResult<Employee>;

    /// Remove by id, returning the last-known values.
    async fn delete(&self, id: &str) -> StoreResult<Option<Employee>>;
}

/// Race a store call against the cancellation token.
///
/// The call future is dropped as soon as the token fires.
pub async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn employee(id: &str, name: &str, email: &str, department: Department) -> Employee {
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        Employee::new(id, name, email, dob, department, Utc::now())
    }

    #[test]
    fn test_email_taken_by_other_ignores_self() {
        let alice = employee("1", "Alice", "a@x.com", Department::Accounts);
        let own = EmployeePredicate::EmailTakenByOther {
            email: "a@x.com".to_string(),
            id: "1".to_string(),
        };
        let other = EmployeePredicate::EmailTakenByOther {
            email: "a@x.com".to_string(),
            id: "2".to_string(),
        };

        assert!(!own.matches(&alice));
        assert!(other.matches(&alice));
    }

    #[test]
    fn test_and_flattens() {
        let name = EmployeePredicate::NameContains("Al".to_string());
        let dept = EmployeePredicate::DepartmentEquals(Department::It);

        assert_eq!(EmployeePredicate::All.and(name.clone()), name);
        assert_eq!(
            name.clone().and(dept.clone()).and(EmployeePredicate::All),
            EmployeePredicate::And(vec![name, dept])
        );
    }

    #[test]
    fn test_conjunction_matches_all_parts() {
        let alice = employee("1", "Alice", "alice@corp.com", Department::It);
        let predicate = EmployeePredicate::NameContains("Ali".to_string())
            .and(EmployeePredicate::EmailContains("corp".to_string()))
            .and(EmployeePredicate::DepartmentEquals(Department::It));
        assert!(predicate.matches(&alice));

        let wrong_dept = predicate.and(EmployeePredicate::DepartmentEquals(Department::Hr));
        assert!(!wrong_dept.matches(&alice));
    }

    #[tokio::test]
    async fn test_cancellable_returns_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: StoreResult<()> = cancellable(&cancel, std::future::pending()).await;
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let cancel = CancellationToken::new();
        let result = cancellable(&cancel, async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
