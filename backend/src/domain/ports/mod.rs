//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod link_repository;
mod links_command;
mod links_query;
mod login_service;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
pub use link_repository::{LinkRepository, LinkRepositoryError};
#[cfg(test)]
pub use links_command::MockLinksCommand;
pub use links_command::{FixtureLinksCommand, LinksCommand};
#[cfg(test)]
pub use links_query::MockLinksQuery;
pub use links_query::{FixtureLinksQuery, LinksQuery};
pub use login_service::{
    DEMO_EMAIL, DEMO_OWNER_ID, DEMO_PASSWORD, FixtureLoginService, LoginService,
};
