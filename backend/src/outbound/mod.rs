//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: an in-process store for tests and local experiments
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod persistence;
