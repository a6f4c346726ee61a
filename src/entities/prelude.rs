pub use super::employees::Entity as Employees;
