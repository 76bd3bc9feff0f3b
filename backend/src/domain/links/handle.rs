//! Validated link handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum handle length in characters.
pub const HANDLE_MAX_LEN: usize = 100;

/// Reasons a handle is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkHandleError {
    #[error("handle must not be empty")]
    Empty,
    #[error("handle must be at most {max} characters")]
    TooLong { max: usize },
    #[error("handle must not contain whitespace or control characters")]
    InvalidCharacter,
}

/// Username or URL fragment identifying the owner on a platform.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed.
/// - Non-empty, at most [`HANDLE_MAX_LEN`] characters.
/// - No interior whitespace or control characters.
///
/// # Examples
///
/// ```
/// # use devlinks::domain::LinkHandle;
/// let handle = LinkHandle::new("  octocat ").expect("valid handle");
/// assert_eq!(handle.as_ref(), "octocat");
/// assert!(LinkHandle::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkHandle(String);

impl LinkHandle {
    /// Validate and construct a handle.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LinkHandleError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LinkHandleError::Empty);
        }
        if trimmed.chars().count() > HANDLE_MAX_LEN {
            return Err(LinkHandleError::TooLong {
                max: HANDLE_MAX_LEN,
            });
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(LinkHandleError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LinkHandle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LinkHandle {
    type Error = LinkHandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LinkHandle> for String {
    fn from(value: LinkHandle) -> Self {
        value.0
    }
}
