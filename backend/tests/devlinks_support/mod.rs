//! Shared harness for devlinks integration suites.
//!
//! Spins up the real HTTP stack over the in-memory link store. Actix spawns
//! with `spawn_local`, so the server and every client call run on one
//! current-thread runtime inside a `LocalSet`.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use devlinks::Trace;
use devlinks::client::{EditingSession, HttpLinksTransmitter};
use devlinks::domain::ports::LoginService;
use devlinks::domain::{Error, LinkCollection, LinksService, LoginCredentials, UserId};
use devlinks::inbound::http::configure_api;
use devlinks::inbound::http::state::HttpState;
use devlinks::outbound::memory::InMemoryLinkRepository;
use devlinks::test_support::MutableClock;

pub const PASSWORD: &str = "password123";

/// Owner id for a test persona, keyed by the local part of their email.
pub fn owner_for(name: &str) -> Option<UserId> {
    let raw = match name {
        "alice" => "11111111-1111-1111-1111-111111111111",
        "bob" => "22222222-2222-2222-2222-222222222222",
        _ => return None,
    };
    UserId::new(raw).ok()
}

/// Login port that knows a fixed cast of personas.
pub struct PersonaLogins;

#[async_trait]
impl LoginService for PersonaLogins {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let name = credentials
            .email()
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or_default();
        match owner_for(name) {
            Some(owner) if credentials.password() == PASSWORD => Ok(owner),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

/// State wired to a fresh in-memory store.
pub fn in_memory_state() -> HttpState {
    let service = Arc::new(LinksService::new(Arc::new(InMemoryLinkRepository::new())));
    HttpState::new(Arc::new(PersonaLogins), service.clone(), service)
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .build()
}

/// A running server plus the runtime that drives it.
pub struct LinkServer {
    runtime: Runtime,
    local: LocalSet,
    base_url: Url,
    handle: ServerHandle,
}

impl LinkServer {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let state = web::Data::new(in_memory_state());
        let key = Key::generate();

        let handle = local.block_on(&runtime, async move {
            let server = HttpServer::new(move || {
                App::new()
                    .app_data(state.clone())
                    .wrap(session_middleware(key.clone()))
                    .wrap(Trace)
                    .configure(configure_api)
            })
            .disable_signals()
            .workers(1)
            .listen(listener)
            .expect("listen")
            .run();
            let handle = server.handle();
            actix_web::rt::spawn(server);
            handle
        });

        Self {
            runtime,
            local,
            base_url: Url::parse(&format!("http://{addr}/")).expect("base url"),
            handle,
        }
    }

    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.local.block_on(&self.runtime, fut)
    }

    /// Transmitter logged in as `name`.
    pub fn transmitter_for(&self, name: &str) -> HttpLinksTransmitter {
        let mut transmitter =
            HttpLinksTransmitter::new(&self.base_url, Duration::from_secs(5)).expect("transmitter");
        let email = format!("{name}@example.com");
        self.block_on(transmitter.login(&email, PASSWORD))
            .expect("persona login");
        transmitter
    }

    /// Editing session for `name`, loaded from the server.
    pub fn open_session(&self, name: &str) -> EditingSession<HttpLinksTransmitter> {
        let transmitter = self.transmitter_for(name);
        let clock = Arc::new(MutableClock::new(Utc::now()));
        self.block_on(EditingSession::open(transmitter, clock))
            .expect("open editing session")
    }

    /// Current authoritative collection for `name`.
    pub fn read(&self, name: &str) -> LinkCollection {
        use devlinks::client::LinksTransmitter;
        let transmitter = self.transmitter_for(name);
        self.block_on(transmitter.fetch()).expect("fetch collection")
    }
}

impl Drop for LinkServer {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        self.local.block_on(&self.runtime, async move {
            handle.stop(true).await;
        });
    }
}

/// Handles in display order.
pub fn handles(collection: &LinkCollection) -> Vec<String> {
    collection
        .links
        .iter()
        .map(|link| link.handle.to_string())
        .collect()
}

/// Positions in display order.
pub fn positions(collection: &LinkCollection) -> Vec<u32> {
    collection.links.iter().map(|link| link.position).collect()
}
