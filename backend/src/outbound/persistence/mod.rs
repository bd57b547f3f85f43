//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the marketplace repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database errors are mapped to the typed port errors and logged at
//!   `debug`.
//!
//! # Example
//!
//! ```ignore
//! use medstore::outbound::persistence::{DbPool, DieselAppRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/medstore")).await?;
//! let apps = DieselAppRepository::new(pool);
//! ```

mod diesel_app_repository;
mod diesel_basic_error_mapping;
mod diesel_developer_repository;
mod diesel_payment_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_app_repository::DieselAppRepository;
pub use diesel_developer_repository::DieselDeveloperRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
