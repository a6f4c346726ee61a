//! Employee repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::*;

use crate::entities::{employees, prelude::*};
use crate::models::{Department, Employee};
use crate::store::{EmployeePredicate, EmployeeStore, StoreError, StoreResult};

/// [`EmployeeStore`] over a SeaORM connection.
#[derive(Debug, Clone)]
pub struct SeaOrmEmployeeStore {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Compile a predicate into a SeaORM condition for `backend`.
pub fn condition(predicate: &EmployeePredicate, backend: DbBackend) -> Condition {
    match predicate {
        EmployeePredicate::All => Condition::all(),
        EmployeePredicate::IdEquals(id) => Condition::all().add(employees::Column::Id.eq(id.as_str())),
        EmployeePredicate::EmailEquals(email) => Condition::all().add(employees::Column::Email.eq(email.as_str())),
        EmployeePredicate::EmailTakenByOther { email, id } => Condition::all()
            .add(employees::Column::Email.eq(email.as_str()))
            .add(employees::Column::Id.ne(id.as_str())),
        EmployeePredicate::NameContains(needle) => {
            Condition::all().add(contains(backend, employees::Column::Name, needle))
        }
        EmployeePredicate::EmailContains(needle) => {
            Condition::all().add(contains(backend, employees::Column::Email, needle))
        }
        EmployeePredicate::DepartmentEquals(department) => {
            Condition::all().add(employees::Column::Department.eq(department.as_str()))
        }
        EmployeePredicate::And(parts) => parts
            .iter()
            .fold(Condition::all(), |acc, part| acc.add(condition(part, backend))),
    }
}

/// Case-sensitive literal substring test, matching `str::contains`. `%` and `_` match themselves.
fn contains(backend: DbBackend, column: employees::Column, needle: &str) -> SimpleExpr {
    let function = match backend {
        DbBackend::Postgres => "strpos",
        _ => "instr",
    };
    Expr::cust_with_values(
        format!(r#"{function}("{}", ?) > 0"#, column.as_str()),
        [needle.to_string()],
    )
}

impl TryFrom<employees::Model> for Employee {
    type Error = StoreError;

    fn try_from(model: employees::Model) -> Result<Self, Self::Error> {
        let department = model.department.parse::<Department>().map_err(|e| StoreError::Corrupt {
            id: model.id.clone(),
            reason: e.to_string(),
        })?;
        Ok(Employee {
            id: model.id,
            name: model.name,
            email: model.email,
            date_of_birth: model.date_of_birth,
            department,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Map a write error, surfacing unique-index violations as duplicate emails.
fn write_error(err: DbErr, email: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateEmail(email.to_string()),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn find_one(&self, predicate: &EmployeePredicate) -> StoreResult<Option<Employee>> {
        let model = Employees::find()
            .filter(condition(predicate, self.db.get_database_backend()))
            .order_by_asc(employees::Column::CreatedAt)
            .one(&self.db)
            .await?;
        model.map(Employee::try_from).transpose()
    }

    async fn find_many(&self, predicate: &EmployeePredicate) -> StoreResult<Vec<Employee>> {
        let models = Employees::find()
            .filter(condition(predicate, self.db.get_database_backend()))
            .order_by_asc(employees::Column::CreatedAt)
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        models.into_iter().map(Employee::try_from).collect()
    }

    async fn insert(&self, employee: Employee) -> StoreResult<Option<Employee>> {
        let email = employee.email.clone();
        let model = employees::ActiveModel {
            id: Set(employee.id),
            name: Set(employee.name),
            email: Set(employee.email),
            date_of_birth: Set(employee.date_of_birth),
            department: Set(employee.department.as_str().to_string()),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(Some(Employee::try_from(inserted)?)),
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(write_error(e, &email)),
        }
    }

    async fn update(&self, employee: Employee) -> StoreResult<Employee> {
        let id = employee.id.clone();
        let email = employee.email.clone();
        let model = employees::ActiveModel {
            id: Unchanged(employee.id),
            name: Set(employee.name),
            email: Set(employee.email),
            date_of_birth: Set(employee.date_of_birth),
            department: Set(employee.department.as_str().to_string()),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        };

        match model.update(&self.db).await {
            Ok(updated) => Employee::try_from(updated),
            Err(DbErr::RecordNotUpdated) => Err(StoreError::NotFound(id)),
            Err(e) => Err(write_error(e, &email)),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Employee>> {
        let Some(existing) = Employees::find_by_id(id.to_string()).one(&self.db).await? else {
            return Ok(None);
        };
        let result = Employees::delete_by_id(id.to_string()).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        Employee::try_from(existing).map(Some)
    }
}
