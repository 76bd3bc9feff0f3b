//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL-backed link store using Diesel ORM.
//! - **memory**: in-process link store for development and tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no reconciliation logic of their own.

pub mod memory;
pub mod persistence;
