//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives; these wrappers describe their
//! wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// A submitted link id is not owned by the caller.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The submission was based on a stale revision.
    #[schema(rename = "conflict")]
    Conflict,
    /// The link store is temporarily unavailable; retry the save.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "revision mismatch: expected 3, found 4")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the rejected field or link id.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Platform`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Platform)]
pub enum PlatformSchema {
    #[schema(rename = "GitHub")]
    GitHub,
    #[schema(rename = "Frontend Mentor")]
    FrontendMentor,
    #[schema(rename = "Twitter")]
    Twitter,
    #[schema(rename = "LinkedIn")]
    LinkedIn,
    #[schema(rename = "YouTube")]
    YouTube,
    #[schema(rename = "Facebook")]
    Facebook,
    #[schema(rename = "Twitch")]
    Twitch,
    #[schema(rename = "Dev.to")]
    DevTo,
    #[schema(rename = "Codewars")]
    Codewars,
    #[schema(rename = "freeCodeCamp")]
    FreeCodeCamp,
    #[schema(rename = "GitLab")]
    GitLab,
    #[schema(rename = "Hashnode")]
    Hashnode,
    #[schema(rename = "Stack Overflow")]
    StackOverflow,
}
