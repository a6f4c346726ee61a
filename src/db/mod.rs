//! Store adapters: SeaORM database store and in-memory store.

pub mod connection;
pub mod employee;
pub mod memory;
pub mod schema;

pub use connection::{connect, employee_count, open_store, test_connection};
pub use employee::SeaOrmEmployeeStore;
pub use memory::InMemoryEmployeeStore;
pub use schema::ensure_schema;
