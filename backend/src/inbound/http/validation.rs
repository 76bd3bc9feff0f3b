//! Field-level validation errors for inbound HTTP payloads.
//!
//! Every rejection becomes an `invalid_request` domain error whose details
//! name the offending field, and the list index when the field sits inside
//! `links`, so an editor can highlight the exact row.

use serde_json::json;

use crate::domain::{Error, LinkHandleError, UserId};

/// Validation error codes surfaced in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    InvalidLinkId,
    UnknownPlatform,
    InvalidHandle,
    MalformedBody,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidLinkId => "invalid_link_id",
            Self::UnknownPlatform => "unknown_platform",
            Self::InvalidHandle => "invalid_handle",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("userId");
pub(crate) const LINK_ID: FieldName = FieldName::new("id");
pub(crate) const WEBSITE: FieldName = FieldName::new("website");
pub(crate) const USERNAME: FieldName = FieldName::new("username");

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn indexed_error(
    field: FieldName,
    code: ValidationCode,
    index: usize,
    value: serde_json::Value,
    message: String,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": format!("links[{index}].{}", field.as_str()),
        "index": index,
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

pub(crate) fn invalid_link_id_error(index: usize, value: i64) -> Error {
    indexed_error(
        LINK_ID,
        ValidationCode::InvalidLinkId,
        index,
        json!(value),
        "link id must be non-zero".to_owned(),
    )
}

pub(crate) fn unknown_platform_error(index: usize, value: &str) -> Error {
    indexed_error(
        WEBSITE,
        ValidationCode::UnknownPlatform,
        index,
        json!(value),
        format!("unrecognised platform: {value}"),
    )
}

pub(crate) fn invalid_handle_error(index: usize, value: &str, reason: &LinkHandleError) -> Error {
    indexed_error(
        USERNAME,
        ValidationCode::InvalidHandle,
        index,
        json!(value),
        reason.to_string(),
    )
}

pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {reason}")).with_details(json!({
        "code": ValidationCode::MalformedBody.as_str(),
    }))
}
