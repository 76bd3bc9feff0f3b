//! Link entries and the owner's link collection.
//!
//! Three shapes describe a link at different stages:
//! - [`LinkEntry`] is held by an editing session and may carry a draft handle;
//! - [`SubmittedLink`] is a validated element of a save submission;
//! - [`StoredLink`] is a persisted row read back from the store.

mod handle;
mod id;
mod platform;
pub mod reconcile;

pub use handle::{HANDLE_MAX_LEN, LinkHandle, LinkHandleError};
pub use id::{LinkId, LinkIdError, PendingToken, StoredLinkId};
pub use platform::{ParsePlatformError, Platform};
pub use reconcile::{
    LinkRow, LinkUpdate, MAX_LINKS_PER_OWNER, ReconciliationError, ReconciliationPlan,
    plan_reconciliation,
};

use super::UserId;

/// A link as held by an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub id: LinkId,
    pub platform: Platform,
    /// Draft handle; validated only when the list is submitted.
    pub handle: String,
    /// 1-based display position.
    pub position: u32,
}

impl From<&StoredLink> for LinkEntry {
    fn from(value: &StoredLink) -> Self {
        Self {
            id: LinkId::Persisted(value.id),
            platform: value.platform,
            handle: value.handle.to_string(),
            position: value.position,
        }
    }
}

/// Validated element of a save submission. Order in the submission is the
/// display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedLink {
    pub id: LinkId,
    pub platform: Platform,
    pub handle: LinkHandle,
}

/// A whole-collection save request.
///
/// `expected_revision` is the collection revision the editor was loaded at;
/// the store rejects the save when it no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubmission {
    pub expected_revision: u32,
    pub links: Vec<SubmittedLink>,
}

/// Persisted link row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLink {
    pub id: StoredLinkId,
    pub owner_id: UserId,
    pub platform: Platform,
    pub handle: LinkHandle,
    pub position: u32,
}

impl StoredLink {
    /// Public profile URL for this link.
    pub fn profile_url(&self) -> String {
        self.platform.profile_url(self.handle.as_ref())
    }
}

/// Authoritative read model of one owner's links.
///
/// `links` are sorted ascending by position. A revision of `0` means the
/// owner has never saved.
///
/// # Examples
///
/// ```
/// # use devlinks::domain::{LinkCollection, UserId};
/// let empty = LinkCollection::empty(UserId::random());
/// assert_eq!(empty.revision, 0);
/// assert!(empty.links.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCollection {
    pub owner_id: UserId,
    pub revision: u32,
    pub links: Vec<StoredLink>,
}

impl LinkCollection {
    /// Collection for an owner who has never saved.
    pub fn empty(owner_id: UserId) -> Self {
        Self {
            owner_id,
            revision: 0,
            links: Vec::new(),
        }
    }

    /// Stored ids in display order.
    pub fn ids(&self) -> Vec<StoredLinkId> {
        self.links.iter().map(|link| link.id).collect()
    }

    /// Resubmit the collection unchanged at its current revision.
    pub fn to_submission(&self) -> LinkSubmission {
        LinkSubmission {
            expected_revision: self.revision,
            links: self
                .links
                .iter()
                .map(|link| SubmittedLink {
                    id: LinkId::Persisted(link.id),
                    platform: link.platform,
                    handle: link.handle.clone(),
                })
                .collect(),
        }
    }
}
