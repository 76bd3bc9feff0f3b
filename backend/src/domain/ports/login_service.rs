//! Driving port for session login.
//!
//! Login is the thin session-resolution collaborator: it turns credentials
//! into the owner identity that authorises link reads and saves.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Email of the built-in demo account.
pub const DEMO_EMAIL: &str = "demo@devlinks.dev";
/// Password of the built-in demo account.
pub const DEMO_PASSWORD: &str = "password123";
/// Owner id assigned to the demo account.
pub const DEMO_OWNER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated owner id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// In-memory authenticator accepting only the demo account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.email() == DEMO_EMAIL && credentials.password() == DEMO_PASSWORD {
            UserId::new(DEMO_OWNER_ID)
                .map_err(|err| Error::internal(format!("invalid demo owner id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
