//! Data models for employees and the response envelope.

pub mod employee;
pub mod response;

pub use employee::{Department, Employee, EmployeeRecord, ParseDepartmentError};
pub use response::{CommandResponse, Envelope, QueryResponse, StatusCode, ValidationError, ValidationResponse};
