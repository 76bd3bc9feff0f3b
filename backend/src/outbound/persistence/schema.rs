//! Diesel table definitions for the link store.
//!
//! Kept in sync by hand with `backend/migrations`.

diesel::table! {
    /// One row per owner who has saved at least once.
    ///
    /// `revision` guards whole-collection saves: each successful reconcile
    /// bumps it by one.
    link_collections (owner_id) {
        owner_id -> Uuid,
        revision -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Persisted link entries.
    ///
    /// `(owner_id, position)` is unique, deferred to commit time.
    links (id) {
        id -> Int8,
        owner_id -> Uuid,
        /// Platform display name, restricted by a CHECK constraint.
        platform -> Text,
        handle -> Text,
        position -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(link_collections, links);
