//! Driving port for saving an owner's link collection.

use async_trait::async_trait;

use crate::domain::{
    Error, LinkCollection, LinkRow, LinkSubmission, StoredLink, StoredLinkId, UserId,
    plan_reconciliation,
};

/// Driving port consumed by inbound adapters to save a whole collection.
///
/// The owner is always supplied by the caller's verified session, never by
/// the submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinksCommand: Send + Sync {
    /// Reconcile the owner's stored links with `submission` and return the
    /// authoritative collection afterwards.
    ///
    /// # Errors
    ///
    /// - `invalid_request` for duplicate ids or oversized submissions.
    /// - `forbidden` when a claimed id is not one of the owner's links.
    /// - `conflict` when `submission.expected_revision` is stale.
    /// - `service_unavailable` / `internal_error` for store failures.
    async fn save(
        &self,
        owner_id: &UserId,
        submission: LinkSubmission,
    ) -> Result<LinkCollection, Error>;
}

/// Fixture implementation that echoes the submission back.
///
/// Pending entries receive sequential ids after the largest claimed id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLinksCommand;

#[async_trait]
impl LinksCommand for FixtureLinksCommand {
    async fn save(
        &self,
        owner_id: &UserId,
        submission: LinkSubmission,
    ) -> Result<LinkCollection, Error> {
        let plan = plan_reconciliation(owner_id, &submission.links)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut next_id = plan
            .keep_ids()
            .iter()
            .map(|id| id.get())
            .max()
            .unwrap_or(0);
        let mut links = Vec::with_capacity(plan.resulting_len());
        for update in plan.updates() {
            links.push(stored(owner_id, update.id, &update.row));
        }
        for row in plan.inserts() {
            next_id = next_id
                .checked_add(1)
                .ok_or_else(|| Error::invalid_request("link id space exhausted"))?;
            let id = StoredLinkId::new(next_id)
                .map_err(|err| Error::internal(err.to_string()))?;
            links.push(stored(owner_id, id, row));
        }
        links.sort_by_key(|link| link.position);
        let revision = submission
            .expected_revision
            .checked_add(1)
            .ok_or_else(|| Error::invalid_request("revision overflow"))?;
        Ok(LinkCollection {
            owner_id: owner_id.clone(),
            revision,
            links,
        })
    }
}

fn stored(
    owner_id: &UserId,
    id: StoredLinkId,
    row: &LinkRow,
) -> StoredLink {
    StoredLink {
        id,
        owner_id: owner_id.clone(),
        platform: row.platform,
        handle: row.handle.clone(),
        position: row.position,
    }
}
