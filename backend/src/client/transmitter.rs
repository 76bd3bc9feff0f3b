//! Reconciliation transmitter.
//!
//! [`LinksTransmitter`] is the client's only path to the server: one read
//! and one whole-list save. The owner never appears in a payload; the server
//! resolves it from the session cookie.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

use super::dto::{CollectionBody, LoginBody, SaveLinksBody};
use crate::domain::{Error, LinkCollection, LinkSubmission};

const LOGIN_PATH: &str = "api/v1/login";
const OWN_LINKS_PATH: &str = "api/v1/users/me/links";

/// Failures talking to the links API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransmitError {
    /// The base URL could not address the API.
    #[error("invalid endpoint: {message}")]
    Endpoint { message: String },
    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport { message: String },
    /// The server answered with a structured error.
    #[error("server rejected request ({status}): {error}")]
    Rejected { status: u16, error: Error },
    /// The server answered with an unexpected status and no error body.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },
    /// The server did not issue a session cookie on login.
    #[error("login response carried no session cookie")]
    MissingSession,
}

impl TransmitError {
    /// Domain error returned by the server, if any.
    pub fn server_error(&self) -> Option<&Error> {
        match self {
            Self::Rejected { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Port used by editing sessions to read and save the owner's links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinksTransmitter: Send + Sync {
    /// Read the authoritative collection.
    async fn fetch(&self) -> Result<LinkCollection, TransmitError>;

    /// Submit the whole list once and return the collection the server
    /// committed.
    async fn submit(&self, submission: &LinkSubmission) -> Result<LinkCollection, TransmitError>;
}

/// Reqwest-backed transmitter speaking to the devlinks HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLinksTransmitter {
    client: Client,
    login_url: Url,
    links_url: Url,
    session_cookie: Option<String>,
}

impl HttpLinksTransmitter {
    /// Build a transmitter for the API rooted at `base`.
    ///
    /// # Errors
    ///
    /// [`TransmitError::Endpoint`] when `base` cannot be joined with the API
    /// paths, [`TransmitError::Transport`] when the client cannot be built.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, TransmitError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        let join = |path: &str| {
            base.join(path).map_err(|err| TransmitError::Endpoint {
                message: err.to_string(),
            })
        };
        Ok(Self {
            client,
            login_url: join(LOGIN_PATH)?,
            links_url: join(OWN_LINKS_PATH)?,
            session_cookie: None,
        })
    }

    /// Reuse an existing `name=value` session cookie.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Log in and keep the issued session cookie for later requests.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), TransmitError> {
        let response = self
            .client
            .post(self.login_url.clone())
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = ensure_success(response).await?;
        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| value.split(';').next().map(str::trim).map(str::to_owned))
            .filter(|pair| !pair.is_empty())
            .ok_or(TransmitError::MissingSession)?;
        self.session_cookie = Some(cookie);
        Ok(())
    }

    fn authorised(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie.as_str()),
            None => request,
        }
    }
}

#[async_trait]
impl LinksTransmitter for HttpLinksTransmitter {
    async fn fetch(&self) -> Result<LinkCollection, TransmitError> {
        let response = self
            .authorised(self.client.get(self.links_url.clone()))
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_collection(ensure_success(response).await?).await
    }

    async fn submit(&self, submission: &LinkSubmission) -> Result<LinkCollection, TransmitError> {
        debug!(
            links = submission.links.len(),
            expected_revision = submission.expected_revision,
            "submitting link collection"
        );
        let response = self
            .authorised(self.client.put(self.links_url.clone()))
            .json(&SaveLinksBody::from(submission))
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_collection(ensure_success(response).await?).await
    }
}

fn map_transport_error(error: reqwest::Error) -> TransmitError {
    TransmitError::Transport {
        message: error.to_string(),
    }
}

async fn ensure_success(response: Response) -> Result<Response, TransmitError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.map_err(map_transport_error)?;
    Err(map_status_error(status, body.as_ref()))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransmitError {
    match serde_json::from_slice::<Error>(body) {
        Ok(error) => TransmitError::Rejected {
            status: status.as_u16(),
            error,
        },
        Err(_) => TransmitError::Status {
            status: status.as_u16(),
            message: String::from_utf8_lossy(body).chars().take(160).collect(),
        },
    }
}

async fn decode_collection(response: Response) -> Result<LinkCollection, TransmitError> {
    let body: CollectionBody = response.json().await.map_err(|err| TransmitError::Decode {
        message: err.to_string(),
    })?;
    LinkCollection::try_from(body).map_err(|message| TransmitError::Decode { message })
}
