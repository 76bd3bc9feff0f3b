//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see domain
//! ports, so tests can swap in fixtures or mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureLinksCommand, FixtureLinksQuery, FixtureLoginService, LinksCommand, LinksQuery,
    LoginService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub links: Arc<dyn LinksCommand>,
    pub links_query: Arc<dyn LinksQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use devlinks::domain::ports::{FixtureLinksCommand, FixtureLinksQuery, FixtureLoginService};
    /// use devlinks::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureLoginService),
    ///     Arc::new(FixtureLinksCommand),
    ///     Arc::new(FixtureLinksQuery),
    /// );
    /// let _links = state.links.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        links: Arc<dyn LinksCommand>,
        links_query: Arc<dyn LinksQuery>,
    ) -> Self {
        Self {
            login,
            links,
            links_query,
        }
    }

    /// State backed entirely by fixture ports.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureLinksCommand),
            Arc::new(FixtureLinksQuery),
        )
    }
}
