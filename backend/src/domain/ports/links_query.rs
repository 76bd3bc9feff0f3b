//! Driving port for reading link collections.

use async_trait::async_trait;

use crate::domain::{Error, LinkCollection, UserId};

/// Driving port for the authenticated and public read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinksQuery: Send + Sync {
    /// Fetch the owner's links sorted by position.
    async fn fetch(&self, owner_id: &UserId) -> Result<LinkCollection, Error>;
}

/// Fixture implementation returning an empty collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLinksQuery;

#[async_trait]
impl LinksQuery for FixtureLinksQuery {
    async fn fetch(&self, owner_id: &UserId) -> Result<LinkCollection, Error> {
        Ok(LinkCollection::empty(owner_id.clone()))
    }
}
