//! devlinks server entry point.

mod server;

use std::net::{SocketAddr, ToSocketAddrs};

use actix_web::web;
use color_eyre::eyre::{OptionExt, Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use devlinks::inbound::http::health::HealthState;
use devlinks::inbound::http::session_config::{BuildMode, session_settings_from_env};
use devlinks::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, ServerSettings, create_server};

fn init_tracing() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
        .map_err(|error| eyre!(error))
        .wrap_err("install tracing subscriber")
}

fn resolve_bind_addr(settings: &ServerSettings) -> Result<SocketAddr> {
    (settings.host(), settings.port())
        .to_socket_addrs()
        .wrap_err("resolve bind address")?
        .next()
        .ok_or_eyre("bind address resolved to nothing")
}

async fn connect_store(settings: &ServerSettings) -> Result<Option<DbPool>> {
    let Some(url) = settings.database_url() else {
        return Ok(None);
    };
    if settings.skip_migrations {
        warn!("skipping migrations at operator request");
    } else {
        run_migrations(url).await.wrap_err("apply migrations")?;
        info!("migrations applied");
    }
    let pool = DbPool::new(
        PoolConfig::new(url)
            .with_max_size(settings.pool_max_size())
            .with_connection_timeout(settings.connection_timeout()),
    )
    .await
    .wrap_err("build database pool")?;
    Ok(Some(pool))
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = ServerSettings::load().wrap_err("load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("session configuration")?;
    let bind_addr = resolve_bind_addr(&settings)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    if let Some(pool) = connect_store(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "devlinks listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server stopped")
}
