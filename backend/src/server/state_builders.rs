//! Port wiring for the HTTP state.

use std::sync::Arc;

use tracing::{info, warn};

use devlinks::domain::LinksService;
use devlinks::domain::ports::{FixtureLoginService, LinkRepository, LinksCommand, LinksQuery};
use devlinks::inbound::http::state::HttpState;
use devlinks::outbound::memory::InMemoryLinkRepository;
use devlinks::outbound::persistence::{DbPool, DieselLinkRepository};

fn links_ports<R>(repo: R) -> (Arc<dyn LinksCommand>, Arc<dyn LinksQuery>)
where
    R: LinkRepository + 'static,
{
    let service = Arc::new(LinksService::new(Arc::new(repo)));
    let command: Arc<dyn LinksCommand> = service.clone();
    let query: Arc<dyn LinksQuery> = service;
    (command, query)
}

/// Build handler state, persisting links in Postgres when a pool is given.
pub(super) fn build_http_state(db_pool: Option<&DbPool>) -> HttpState {
    let (links, links_query) = match db_pool {
        Some(pool) => {
            info!("link store: postgres");
            links_ports(DieselLinkRepository::new(pool.clone()))
        }
        None => {
            warn!("link store: in-memory; saved links are lost on restart");
            links_ports(InMemoryLinkRepository::new())
        }
    };
    HttpState::new(Arc::new(FixtureLoginService), links, links_query)
}
