//! Port for link collection persistence.
//!
//! The [`LinkRepository`] trait is the sole mutation surface for stored link
//! rows. Adapters apply a [`ReconciliationPlan`] atomically: either every
//! delete, update and insert takes effect together with the revision bump,
//! or nothing does.

use async_trait::async_trait;

use crate::domain::{LinkCollection, ReconciliationPlan, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by link repository adapters.
    pub enum LinkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "link repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "link repository query failed: {message}",
        /// The stored collection revision differs from the caller's.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// A claimed id does not exist or belongs to another owner.
        ForeignLink { id: i64 } =>
            "link {id} is not owned by the caller",
    }
}

/// Port for link collection storage and retrieval.
///
/// # Revision semantics
///
/// - An owner who never saved has revision `0` and no links.
/// - [`LinkRepository::reconcile`] succeeds only when `expected_revision`
///   equals the stored revision and bumps it by one.
/// - A failed reconcile leaves rows and revision untouched.
/// - A successful reconcile returns the collection as committed, read inside
///   the same transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Load the owner's links sorted by position.
    async fn find_by_owner(&self, owner_id: &UserId)
    -> Result<LinkCollection, LinkRepositoryError>;

    /// Apply `plan` in one transaction and return the committed collection.
    ///
    /// # Errors
    ///
    /// - [`LinkRepositoryError::RevisionMismatch`] when the collection moved on.
    /// - [`LinkRepositoryError::ForeignLink`] when a kept id is not one of the
    ///   owner's rows.
    /// - [`LinkRepositoryError::Connection`] or [`LinkRepositoryError::Query`]
    ///   for store failures.
    async fn reconcile(
        &self,
        plan: &ReconciliationPlan,
        expected_revision: u32,
    ) -> Result<LinkCollection, LinkRepositoryError>;
}
