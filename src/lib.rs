//! Employee records - request-handling pipeline for employee data.
//!
//! Requests are validated against a registry of per-request rules, run through
//! their handler's business rules and answered with a uniform envelope. Storage
//! sits behind the [`store::EmployeeStore`] port.

pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{AppError, Result};
pub use service::EmployeeService;
