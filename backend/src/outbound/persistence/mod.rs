//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Every driven port has one adapter here, all sharing a `bb8` pool through
//! `diesel-async`.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **One error type**: Diesel and pool failures map onto
//!   `RepositoryError`, keeping constraint names for conflict reporting.
//!
//! # Example
//!
//! ```ignore
//! use foodgram::outbound::persistence::{DbPool, PoolConfig, diesel_repositories};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let repositories = diesel_repositories(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_catalogue_repository;
mod diesel_recipe_collection_repository;
mod diesel_recipe_repository;
mod diesel_repositories;
mod diesel_subscription_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::{DieselIngredientRepository, DieselTagRepository};
pub use diesel_recipe_collection_repository::DieselRecipeCollectionRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_repositories::diesel_repositories;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
