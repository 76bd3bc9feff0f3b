//! Pure reconciliation planning.
//!
//! [`plan_reconciliation`] turns an owner's ordered submission into the
//! delete/update/insert sets a store applies in one transaction. Positions
//! are re-derived from submission order, so the stored sequence is always
//! `1..N` whatever the client sent.

use std::collections::HashSet;

use super::{LinkHandle, LinkId, Platform, StoredLinkId, SubmittedLink};
use crate::domain::UserId;

/// Upper bound on the number of links one owner may keep.
pub const MAX_LINKS_PER_OWNER: usize = 500;

/// Errors raised while planning a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    /// The same id appeared more than once in one submission.
    #[error("link {id} appears more than once in the submission")]
    DuplicateId { id: LinkId },
    /// The submission exceeded [`MAX_LINKS_PER_OWNER`].
    #[error("a collection may hold at most {max} links, got {count}")]
    TooManyLinks { count: usize, max: usize },
}

/// Row content written for both updates and inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub platform: Platform,
    pub handle: LinkHandle,
    pub position: u32,
}

/// Overwrite of an existing row, addressed by id within the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUpdate {
    pub id: StoredLinkId,
    pub row: LinkRow,
}

/// Delete/update/insert sets for one owner.
///
/// - every owner row whose id is absent from [`Self::keep_ids`] is deleted;
/// - every entry of [`Self::updates`] overwrites the row with that id;
/// - every entry of [`Self::inserts`] becomes a new row with a store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    owner_id: UserId,
    keep_ids: Vec<StoredLinkId>,
    updates: Vec<LinkUpdate>,
    inserts: Vec<LinkRow>,
}

impl ReconciliationPlan {
    /// Owner the plan applies to.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Claimed ids, in submission order.
    pub fn keep_ids(&self) -> &[StoredLinkId] {
        &self.keep_ids
    }

    pub fn updates(&self) -> &[LinkUpdate] {
        &self.updates
    }

    pub fn inserts(&self) -> &[LinkRow] {
        &self.inserts
    }

    /// Number of links the owner holds once the plan is applied.
    pub fn resulting_len(&self) -> usize {
        self.updates.len() + self.inserts.len()
    }
}

/// Plan the reconciliation of `links` against `owner_id`'s stored rows.
///
/// Positions are the 1-based submission index; client-supplied positions
/// never reach this function. Pending tokens are dropped.
///
/// # Examples
///
/// ```
/// # use devlinks::domain::{
/// #     LinkHandle, LinkId, Platform, SubmittedLink, UserId, plan_reconciliation,
/// # };
/// let owner = UserId::random();
/// let links = vec![
///     SubmittedLink {
///         id: LinkId::from_wire(7).unwrap(),
///         platform: Platform::GitHub,
///         handle: LinkHandle::new("ada").unwrap(),
///     },
///     SubmittedLink {
///         id: LinkId::from_wire(-1).unwrap(),
///         platform: Platform::GitLab,
///         handle: LinkHandle::new("ada").unwrap(),
///     },
/// ];
/// let plan = plan_reconciliation(&owner, &links).expect("valid submission");
/// assert_eq!(plan.keep_ids().len(), 1);
/// assert_eq!(plan.inserts()[0].position, 2);
/// ```
pub fn plan_reconciliation(
    owner_id: &UserId,
    links: &[SubmittedLink],
) -> Result<ReconciliationPlan, ReconciliationError> {
    if links.len() > MAX_LINKS_PER_OWNER {
        return Err(ReconciliationError::TooManyLinks {
            count: links.len(),
            max: MAX_LINKS_PER_OWNER,
        });
    }

    let mut seen = HashSet::with_capacity(links.len());
    let mut keep_ids = Vec::new();
    let mut updates = Vec::new();
    let mut inserts = Vec::new();

    for (position, link) in (1_u32..).zip(links) {
        if !seen.insert(link.id) {
            return Err(ReconciliationError::DuplicateId { id: link.id });
        }
        let row = LinkRow {
            platform: link.platform,
            handle: link.handle.clone(),
            position,
        };
        match link.id {
            LinkId::Persisted(id) => {
                keep_ids.push(id);
                updates.push(LinkUpdate { id, row });
            }
            LinkId::Pending(_) => inserts.push(row),
        }
    }

    Ok(ReconciliationPlan {
        owner_id: owner_id.clone(),
        keep_ids,
        updates,
        inserts,
    })
}
