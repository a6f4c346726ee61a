//! SeaORM entities.

pub mod employees;
pub mod prelude;
