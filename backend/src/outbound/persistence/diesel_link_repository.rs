//! PostgreSQL-backed `LinkRepository` implementation using Diesel ORM.
//!
//! A reconcile runs in one serializable transaction: advance the collection
//! revision, verify ownership of every claimed id, delete by exclusion,
//! update claimed rows, insert new rows, then read the committed rows back.
//! Any failure rolls the whole transaction back.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{LinkRepository, LinkRepositoryError};
use crate::domain::{
    LinkCollection, LinkHandle, Platform, ReconciliationPlan, StoredLink, StoredLinkId, UserId,
};

use super::models::{LinkChangeset, LinkRecord, NewLinkCollectionRecord, NewLinkRecord};
use super::pool::{DbPool, PoolError};
use super::schema::{link_collections, links};

/// Diesel-backed implementation of the [`LinkRepository`] port.
#[derive(Clone)]
pub struct DieselLinkRepository {
    pool: DbPool,
}

impl DieselLinkRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use devlinks::outbound::persistence::{DbPool, DieselLinkRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/devlinks")).await?;
    /// let repository = DieselLinkRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the reconcile transaction.
///
/// Rejections carry the port error verbatim; Diesel errors are mapped once
/// the transaction has rolled back.
#[derive(Debug)]
enum ReconcileFailure {
    Diesel(diesel::result::Error),
    Rejected(LinkRepositoryError),
}

impl From<diesel::result::Error> for ReconcileFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<LinkRepositoryError> for ReconcileFailure {
    fn from(value: LinkRepositoryError) -> Self {
        Self::Rejected(value)
    }
}

impl From<ReconcileFailure> for LinkRepositoryError {
    fn from(value: ReconcileFailure) -> Self {
        match value {
            ReconcileFailure::Diesel(error) => map_diesel_error(error),
            ReconcileFailure::Rejected(error) => error,
        }
    }
}

fn map_pool_error(error: PoolError) -> LinkRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            LinkRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> LinkRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => LinkRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => LinkRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            LinkRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            LinkRepositoryError::connection("concurrent save aborted, retry")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            LinkRepositoryError::query("link row violates a table constraint")
        }
        _ => LinkRepositoryError::query("database error"),
    }
}

fn revision_to_db(revision: u32) -> Result<i32, LinkRepositoryError> {
    i32::try_from(revision).map_err(|_| LinkRepositoryError::query("revision overflow"))
}

fn revision_from_db(revision: i32) -> Result<u32, LinkRepositoryError> {
    u32::try_from(revision).map_err(|_| LinkRepositoryError::query("negative revision stored"))
}

fn position_to_db(position: u32) -> Result<i32, LinkRepositoryError> {
    i32::try_from(position).map_err(|_| LinkRepositoryError::query("position overflow"))
}

fn record_to_link(record: LinkRecord) -> Result<StoredLink, LinkRepositoryError> {
    let id = StoredLinkId::new(record.id)
        .map_err(|err| LinkRepositoryError::query(format!("stored id: {err}")))?;
    let platform: Platform = record
        .platform
        .parse()
        .map_err(|err| LinkRepositoryError::query(format!("stored platform: {err}")))?;
    let handle = LinkHandle::new(&record.handle)
        .map_err(|err| LinkRepositoryError::query(format!("stored handle: {err}")))?;
    let position = u32::try_from(record.position)
        .map_err(|_| LinkRepositoryError::query("negative position stored"))?;

    Ok(StoredLink {
        id,
        owner_id: UserId::from_uuid(record.owner_id),
        platform,
        handle,
        position,
    })
}

fn collection_from_rows(
    owner_id: &UserId,
    revision: Option<i32>,
    records: Vec<LinkRecord>,
) -> Result<LinkCollection, LinkRepositoryError> {
    Ok(LinkCollection {
        owner_id: owner_id.clone(),
        revision: revision.map_or(Ok(0), revision_from_db)?,
        links: records
            .into_iter()
            .map(record_to_link)
            .collect::<Result<_, _>>()?,
    })
}

/// Load the owner's revision and rows ordered by position.
async fn load_rows(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
) -> Result<(Option<i32>, Vec<LinkRecord>), diesel::result::Error> {
    let revision: Option<i32> = link_collections::table
        .filter(link_collections::owner_id.eq(owner))
        .select(link_collections::revision)
        .first(conn)
        .await
        .optional()?;
    let records: Vec<LinkRecord> = links::table
        .filter(links::owner_id.eq(owner))
        .order(links::position.asc())
        .select(LinkRecord::as_select())
        .load(conn)
        .await?;
    Ok((revision, records))
}

/// Rows prepared outside the transaction so the closure owns its inputs.
struct PreparedPlan<'a> {
    owner: Uuid,
    keep: Vec<i64>,
    updates: Vec<(i64, LinkChangeset<'a>)>,
    inserts: Vec<NewLinkRecord<'a>>,
}

fn prepare(plan: &ReconciliationPlan) -> Result<PreparedPlan<'_>, LinkRepositoryError> {
    let owner = *plan.owner_id().as_uuid();
    let now = Utc::now();
    let updates = plan
        .updates()
        .iter()
        .map(|update| {
            Ok((
                update.id.get(),
                LinkChangeset {
                    platform: update.row.platform.as_str(),
                    handle: update.row.handle.as_ref(),
                    position: position_to_db(update.row.position)?,
                    updated_at: now,
                },
            ))
        })
        .collect::<Result<Vec<_>, LinkRepositoryError>>()?;
    let inserts = plan
        .inserts()
        .iter()
        .map(|row| {
            Ok(NewLinkRecord {
                owner_id: owner,
                platform: row.platform.as_str(),
                handle: row.handle.as_ref(),
                position: position_to_db(row.position)?,
            })
        })
        .collect::<Result<Vec<_>, LinkRepositoryError>>()?;

    Ok(PreparedPlan {
        owner,
        keep: plan.keep_ids().iter().map(|id| id.get()).collect(),
        updates,
        inserts,
    })
}

/// Compare-and-swap the owner's revision from `expected` to `expected + 1`.
async fn advance_revision(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    expected: u32,
) -> Result<u32, ReconcileFailure> {
    let next = expected
        .checked_add(1)
        .ok_or_else(|| LinkRepositoryError::query("revision overflow"))?;
    let next_db = revision_to_db(next)?;

    let advanced = if expected == 0 {
        diesel::insert_into(link_collections::table)
            .values(&NewLinkCollectionRecord {
                owner_id: owner,
                revision: next_db,
            })
            .on_conflict(link_collections::owner_id)
            .do_nothing()
            .execute(conn)
            .await?
    } else {
        diesel::update(
            link_collections::table.filter(
                link_collections::owner_id
                    .eq(owner)
                    .and(link_collections::revision.eq(revision_to_db(expected)?)),
            ),
        )
        .set((
            link_collections::revision.eq(next_db),
            link_collections::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?
    };

    if advanced == 1 {
        return Ok(next);
    }

    let actual: Option<i32> = link_collections::table
        .filter(link_collections::owner_id.eq(owner))
        .select(link_collections::revision)
        .first(conn)
        .await
        .optional()?;
    let actual = actual.map_or(Ok(0), revision_from_db)?;
    Err(LinkRepositoryError::revision_mismatch(expected, actual).into())
}

/// Reject the plan if any kept id is missing or owned by someone else.
async fn verify_ownership(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    keep: &[i64],
) -> Result<(), ReconcileFailure> {
    if keep.is_empty() {
        return Ok(());
    }
    let owned: HashSet<i64> = links::table
        .filter(links::owner_id.eq(owner))
        .filter(links::id.eq_any(keep))
        .select(links::id)
        .load::<i64>(conn)
        .await?
        .into_iter()
        .collect();

    match keep.iter().find(|id| !owned.contains(id)) {
        Some(foreign) => Err(LinkRepositoryError::foreign_link(*foreign).into()),
        None => Ok(()),
    }
}

async fn apply_plan(
    conn: &mut AsyncPgConnection,
    prepared: PreparedPlan<'_>,
    expected_revision: u32,
) -> Result<(Option<i32>, Vec<LinkRecord>), ReconcileFailure> {
    let PreparedPlan {
        owner,
        keep,
        updates,
        inserts,
    } = prepared;

    let revision = advance_revision(conn, owner, expected_revision).await?;
    verify_ownership(conn, owner, &keep).await?;

    let deleted = diesel::delete(
        links::table
            .filter(links::owner_id.eq(owner))
            .filter(diesel::dsl::not(links::id.eq_any(&keep))),
    )
    .execute(conn)
    .await?;

    for (id, changeset) in &updates {
        let updated = diesel::update(
            links::table
                .filter(links::id.eq(*id))
                .filter(links::owner_id.eq(owner)),
        )
        .set(changeset)
        .execute(conn)
        .await?;
        if updated != 1 {
            return Err(LinkRepositoryError::foreign_link(*id).into());
        }
    }

    if !inserts.is_empty() {
        diesel::insert_into(links::table)
            .values(&inserts)
            .execute(conn)
            .await?;
    }

    debug!(
        owner_id = %owner,
        deleted,
        updated = updates.len(),
        inserted = inserts.len(),
        revision,
        "link reconcile applied"
    );
    load_rows(conn, owner).await.map_err(ReconcileFailure::from)
}

#[async_trait]
impl LinkRepository for DieselLinkRepository {
    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<LinkCollection, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner_id.as_uuid();

        let (revision, records) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| load_rows(conn, owner).scope_boxed())
            .await
            .map_err(map_diesel_error)?;

        collection_from_rows(owner_id, revision, records)
    }

    async fn reconcile(
        &self,
        plan: &ReconciliationPlan,
        expected_revision: u32,
    ) -> Result<LinkCollection, LinkRepositoryError> {
        let prepared = prepare(plan)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (revision, records) = conn
            .build_transaction()
            .serializable()
            .run(|conn| apply_plan(conn, prepared, expected_revision).scope_boxed())
            .await
            .map_err(LinkRepositoryError::from)?;

        collection_from_rows(plan.owner_id(), revision, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkId, SubmittedLink, plan_reconciliation};
    use rstest::rstest;

    fn record(platform: &str, handle: &str, position: i32) -> LinkRecord {
        LinkRecord {
            id: 5,
            owner_id: Uuid::nil(),
            platform: platform.to_owned(),
            handle: handle.to_owned(),
            position,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, LinkRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(error, LinkRepositoryError::query("record not found"));
    }

    #[rstest]
    fn rejections_survive_the_rollback() {
        let failure = ReconcileFailure::from(LinkRepositoryError::foreign_link(9_i64));
        assert_eq!(
            LinkRepositoryError::from(failure),
            LinkRepositoryError::foreign_link(9_i64)
        );
    }

    #[rstest]
    fn record_converts_to_stored_link() {
        let link = record_to_link(record("Stack Overflow", "12345", 2)).expect("valid record");
        assert_eq!(link.platform, Platform::StackOverflow);
        assert_eq!(link.position, 2);
        assert_eq!(link.id.get(), 5);
    }

    #[rstest]
    #[case::platform(record("MySpace", "ada", 1))]
    #[case::handle(record("GitHub", "", 1))]
    #[case::position(record("GitHub", "ada", -1))]
    fn corrupt_records_map_to_query_errors(#[case] bad: LinkRecord) {
        let error = record_to_link(bad).expect_err("corrupt record");
        assert!(matches!(error, LinkRepositoryError::Query { .. }));
    }

    #[rstest]
    fn prepare_flattens_plan_rows() {
        let owner = UserId::random();
        let links = vec![
            SubmittedLink {
                id: LinkId::from_wire(-1).expect("pending"),
                platform: Platform::DevTo,
                handle: LinkHandle::new("ada").expect("handle"),
            },
            SubmittedLink {
                id: LinkId::from_wire(12).expect("persisted"),
                platform: Platform::GitLab,
                handle: LinkHandle::new("ada").expect("handle"),
            },
        ];
        let plan = plan_reconciliation(&owner, &links).expect("plan");

        let prepared = prepare(&plan).expect("prepared");

        assert_eq!(prepared.owner, *owner.as_uuid());
        assert_eq!(prepared.keep, vec![12]);
        assert_eq!(prepared.updates.len(), 1);
        assert_eq!(prepared.updates[0].1.position, 2);
        assert_eq!(prepared.inserts[0].platform, "Dev.to");
        assert_eq!(prepared.inserts[0].position, 1);
    }

    #[rstest]
    fn revision_casts_reject_out_of_range_values() {
        assert!(revision_to_db(u32::MAX).is_err());
        assert!(revision_from_db(-1).is_err());
        assert_eq!(revision_from_db(3), Ok(3));
    }
}
