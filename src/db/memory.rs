//! In-memory employee store.
//!
//! Keeps rows in insertion order and enforces the same unique-email rule as the
//! database schema.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::Employee;
use crate::store::{EmployeePredicate, EmployeeStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    rows: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`, in the given order.
    pub fn with_rows(rows: Vec<Employee>) -> Self {
        Self { rows: RwLock::new(rows) }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Copy of every row, in insertion order.
    pub async fn snapshot(&self) -> Vec<Employee> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn find_one(&self, predicate: &EmployeePredicate) -> StoreResult<Option<Employee>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|e| predicate.matches(e)).cloned())
    }

    async fn find_many(&self, predicate: &EmployeePredicate) -> StoreResult<Vec<Employee>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|e| predicate.matches(e)).cloned().collect())
    }

    async fn insert(&self, employee: Employee) -> StoreResult<Option<Employee>> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|e| e.email == employee.email) {
            return Err(StoreError::DuplicateEmail(employee.email));
        }
        if rows.iter().any(|e| e.id == employee.id) {
            return Ok(None);
        }
        rows.push(employee.clone());
        Ok(Some(employee))
    }

    async fn update(&self, employee: Employee) -> StoreResult<Employee> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|e| e.email == employee.email && e.id != employee.id) {
            return Err(StoreError::DuplicateEmail(employee.email));
        }
        let row = rows
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or_else(|| StoreError::NotFound(employee.id.clone()))?;
        *row = employee.clone();
        Ok(employee)
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Employee>> {
        let mut rows = self.rows.write().await;
        let index = rows.iter().position(|e| e.id == id);
        Ok(index.map(|index| rows.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::employee;
    use crate::models::Department;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = InMemoryEmployeeStore::new();
        store
            .insert(employee("1", "Alice", "a@x.com", Department::It))
            .await
            .unwrap();

        let result = store.insert(employee("2", "Other", "a@x.com", Department::Hr)).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_with_existing_id_reports_no_row() {
        let store = InMemoryEmployeeStore::with_rows(vec![employee("1", "Alice", "a@x.com", Department::It)]);
        let result = store.insert(employee("1", "Bob", "b@x.com", Department::It)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = InMemoryEmployeeStore::new();
        let result = store.update(employee("1", "Alice", "a@x.com", Department::It)).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other() {
        let store = InMemoryEmployeeStore::with_rows(vec![
            employee("1", "Alice", "a@x.com", Department::It),
            employee("2", "Bob", "b@x.com", Department::It),
        ]);
        let result = store.update(employee("2", "Bob", "a@x.com", Department::It)).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_find_many_keeps_insertion_order() {
        let store = InMemoryEmployeeStore::with_rows(vec![
            employee("1", "Carol", "c@x.com", Department::It),
            employee("2", "Alice", "a@x.com", Department::It),
            employee("3", "Bob", "b@x.com", Department::Hr),
        ]);
        let rows = store
            .find_many(&EmployeePredicate::DepartmentEquals(Department::It))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let store = InMemoryEmployeeStore::with_rows(vec![employee("1", "Alice", "a@x.com", Department::It)]);

        let removed = store.delete("1").await.unwrap();
        assert_eq!(removed.map(|e| e.name), Some("Alice".to_string()));
        assert!(store.delete("1").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
