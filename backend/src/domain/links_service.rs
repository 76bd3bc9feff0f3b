//! Link collection domain service.
//!
//! Implements the [`LinksCommand`] and [`LinksQuery`] driving ports on top of
//! a [`LinkRepository`]. Saves are planned by [`plan_reconciliation`] and
//! applied by the repository in a single transaction guarded by the
//! collection revision; the collection that transaction committed is what a
//! save returns.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{LinkRepository, LinkRepositoryError, LinksCommand, LinksQuery};
use crate::domain::{
    Error, LinkCollection, LinkSubmission, ReconciliationError, UserId, plan_reconciliation,
};

/// Link collection service implementing the driving ports.
#[derive(Clone)]
pub struct LinksService<R> {
    repo: Arc<R>,
}

impl<R> LinksService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> LinksService<R>
where
    R: LinkRepository,
{
    fn map_repository_error(error: LinkRepositoryError) -> Error {
        match error {
            LinkRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("link repository unavailable: {message}"))
            }
            LinkRepositoryError::Query { message } => {
                Error::internal(format!("link repository error: {message}"))
            }
            LinkRepositoryError::RevisionMismatch { expected, actual } => {
                Error::conflict("revision mismatch").with_details(json!({
                    "expectedRevision": expected,
                    "actualRevision": actual,
                    "code": "revision_mismatch",
                }))
            }
            LinkRepositoryError::ForeignLink { id } => {
                Error::forbidden(format!("link {id} is not owned by the caller")).with_details(
                    json!({
                        "linkId": id,
                        "code": "foreign_link",
                    }),
                )
            }
        }
    }

    fn map_plan_error(error: ReconciliationError) -> Error {
        let details = match &error {
            ReconciliationError::DuplicateId { id } => json!({
                "field": "links",
                "linkId": id.to_wire(),
                "code": "duplicate_id",
            }),
            ReconciliationError::TooManyLinks { count, max } => json!({
                "field": "links",
                "count": count,
                "max": max,
                "code": "too_many_links",
            }),
        };
        Error::invalid_request(error.to_string()).with_details(details)
    }

    async fn load(&self, owner_id: &UserId) -> Result<LinkCollection, Error> {
        self.repo
            .find_by_owner(owner_id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> LinksCommand for LinksService<R>
where
    R: LinkRepository,
{
    async fn save(
        &self,
        owner_id: &UserId,
        submission: LinkSubmission,
    ) -> Result<LinkCollection, Error> {
        let plan =
            plan_reconciliation(owner_id, &submission.links).map_err(Self::map_plan_error)?;
        let committed = self
            .repo
            .reconcile(&plan, submission.expected_revision)
            .await
            .map_err(Self::map_repository_error)?;

        info!(
            owner_id = %owner_id,
            kept = plan.keep_ids().len(),
            inserted = plan.inserts().len(),
            revision = committed.revision,
            "reconciled link collection"
        );

        Ok(committed)
    }
}

#[async_trait]
impl<R> LinksQuery for LinksService<R>
where
    R: LinkRepository,
{
    async fn fetch(&self, owner_id: &UserId) -> Result<LinkCollection, Error> {
        self.load(owner_id).await
    }
}
