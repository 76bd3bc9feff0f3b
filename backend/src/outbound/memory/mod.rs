//! In-process `LinkRepository` used when no database is configured.
//!
//! State lives behind one mutex, so each reconcile is applied to a copy of
//! the owner's rows and swapped in only when every step succeeds.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LinkRepository, LinkRepositoryError};
use crate::domain::{
    LinkCollection, LinkRow, ReconciliationPlan, StoredLink, StoredLinkId, UserId,
};

#[derive(Debug, Default)]
struct OwnerState {
    revision: u32,
    links: Vec<StoredLink>,
}

#[derive(Debug)]
struct Store {
    owners: HashMap<UserId, OwnerState>,
    /// Next id to assign; ids are never reused.
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
            next_id: 1,
        }
    }
}

/// Mutex-guarded link store with the same transactional contract as the
/// PostgreSQL adapter.
///
/// # Examples
///
/// ```
/// use devlinks::domain::ports::LinkRepository;
/// use devlinks::domain::{UserId, plan_reconciliation};
/// use devlinks::outbound::memory::InMemoryLinkRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryLinkRepository::default();
/// let owner = UserId::random();
/// let plan = plan_reconciliation(&owner, &[]).unwrap();
/// assert_eq!(repo.reconcile(&plan, 0).await.unwrap().revision, 1);
/// assert!(repo.reconcile(&plan, 0).await.is_err());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    store: Mutex<Store>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, LinkRepositoryError> {
        self.store
            .lock()
            .map_err(|_| LinkRepositoryError::connection("in-memory link store poisoned"))
    }
}

fn stored(owner_id: &UserId, id: StoredLinkId, row: &LinkRow) -> StoredLink {
    StoredLink {
        id,
        owner_id: owner_id.clone(),
        platform: row.platform,
        handle: row.handle.clone(),
        position: row.position,
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<LinkCollection, LinkRepositoryError> {
        let store = self.lock()?;
        let Some(state) = store.owners.get(owner_id) else {
            return Ok(LinkCollection::empty(owner_id.clone()));
        };
        let mut links = state.links.clone();
        links.sort_by_key(|link| link.position);
        Ok(LinkCollection {
            owner_id: owner_id.clone(),
            revision: state.revision,
            links,
        })
    }

    async fn reconcile(
        &self,
        plan: &ReconciliationPlan,
        expected_revision: u32,
    ) -> Result<LinkCollection, LinkRepositoryError> {
        let mut store = self.lock()?;
        let owner = plan.owner_id();

        let actual = store.owners.get(owner).map_or(0, |state| state.revision);
        if actual != expected_revision {
            return Err(LinkRepositoryError::revision_mismatch(
                expected_revision,
                actual,
            ));
        }
        let revision = expected_revision
            .checked_add(1)
            .ok_or_else(|| LinkRepositoryError::query("revision overflow"))?;

        let owned: HashSet<StoredLinkId> = store
            .owners
            .get(owner)
            .map(|state| state.links.iter().map(|link| link.id).collect())
            .unwrap_or_default();
        if let Some(foreign) = plan.keep_ids().iter().find(|id| !owned.contains(id)) {
            return Err(LinkRepositoryError::foreign_link(foreign.get()));
        }

        let mut links: Vec<StoredLink> = plan
            .updates()
            .iter()
            .map(|update| stored(owner, update.id, &update.row))
            .collect();
        let mut next_id = store.next_id;
        for row in plan.inserts() {
            let id = StoredLinkId::new(next_id)
                .map_err(|err| LinkRepositoryError::query(err.to_string()))?;
            next_id = next_id
                .checked_add(1)
                .ok_or_else(|| LinkRepositoryError::query("link id overflow"))?;
            links.push(stored(owner, id, row));
        }
        links.sort_by_key(|link| link.position);

        let deleted = owned.len() - plan.keep_ids().len();
        store.next_id = next_id;
        store.owners.insert(
            owner.clone(),
            OwnerState {
                revision,
                links: links.clone(),
            },
        );

        debug!(
            owner_id = %owner,
            deleted,
            updated = plan.updates().len(),
            inserted = plan.inserts().len(),
            revision,
            "in-memory link reconcile applied"
        );
        Ok(LinkCollection {
            owner_id: owner.clone(),
            revision,
            links,
        })
    }
}
