//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed link collection model and the
//! reconciliation rules that keep it consistent. Adapters in `inbound` and
//! `outbound` depend on this module; it depends on neither.
//!
//! Public surface:
//! - [`LinkCollection`], [`StoredLink`], [`LinkEntry`], [`SubmittedLink`] and
//!   [`LinkSubmission`]: the link shapes at each stage of an edit.
//! - [`plan_reconciliation`]: pure delete/update/insert planning.
//! - [`LinksService`]: the driving-port implementation used by handlers.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.

pub mod auth;
pub mod error;
pub mod links;
pub mod links_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::links::{
    HANDLE_MAX_LEN, LinkCollection, LinkEntry, LinkHandle, LinkHandleError, LinkId, LinkIdError,
    LinkRow, LinkSubmission, LinkUpdate, MAX_LINKS_PER_OWNER, ParsePlatformError, PendingToken,
    Platform, ReconciliationError, ReconciliationPlan, StoredLink, StoredLinkId, SubmittedLink,
    plan_reconciliation,
};
pub use self::links_service::LinksService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use devlinks::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
