//! Internal Diesel row structs for the link store.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{link_collections, links};

/// Row read from `links`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LinkRecord {
    pub id: i64,
    pub owner_id: Uuid,
    pub platform: String,
    pub handle: String,
    pub position: i32,
}

/// Insertable row for a newly reconciled link.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = links)]
pub(crate) struct NewLinkRecord<'a> {
    pub owner_id: Uuid,
    pub platform: &'a str,
    pub handle: &'a str,
    pub position: i32,
}

/// Changeset applied to a claimed link.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = links)]
pub(crate) struct LinkChangeset<'a> {
    pub platform: &'a str,
    pub handle: &'a str,
    pub position: i32,
    pub updated_at: DateTime<Utc>,
}

/// Insertable first revision of an owner's collection.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = link_collections)]
pub(crate) struct NewLinkCollectionRecord {
    pub owner_id: Uuid,
    pub revision: i32,
}
