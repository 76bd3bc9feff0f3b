//! Link identifiers.
//!
//! A link is either persisted, carrying the store-assigned id, or pending,
//! carrying a token minted by the editing session. On the wire both collapse
//! to one signed integer: positive ids are persisted, negative ids are
//! pending and zero is never valid.

use std::fmt;
use std::num::{NonZeroI64, NonZeroU64};

use serde::{Deserialize, Serialize};

/// Errors raised when decoding identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkIdError {
    /// Zero was supplied.
    #[error("link id must not be zero")]
    Zero,
    /// A store id was not strictly positive.
    #[error("stored link id must be positive, got {0}")]
    NotPositive(i64),
    /// A pending token cannot be expressed as a negative wire id.
    #[error("pending token {0} is out of range")]
    TokenOutOfRange(u64),
}

/// Store-assigned identifier of a persisted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredLinkId(NonZeroI64);

impl StoredLinkId {
    /// Wrap a store id, rejecting zero and negative values.
    ///
    /// ```
    /// # use devlinks::domain::StoredLinkId;
    /// assert_eq!(StoredLinkId::new(5).map(|id| id.get()), Ok(5));
    /// assert!(StoredLinkId::new(-5).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, LinkIdError> {
        match NonZeroI64::new(raw) {
            None => Err(LinkIdError::Zero),
            Some(value) if raw < 0 => Err(LinkIdError::NotPositive(value.get())),
            Some(value) => Ok(Self(value)),
        }
    }

    /// Raw positive value.
    pub fn get(self) -> i64 {
        self.0.get()
    }
}

impl fmt::Display for StoredLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-unique token of a link that has not been saved yet.
///
/// Tokens are never written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingToken(NonZeroU64);

impl PendingToken {
    /// Largest token that still fits the negative wire range.
    pub const MAX: u64 = i64::MAX as u64;

    /// Wrap a token value, rejecting zero and values that would overflow the
    /// negative wire range.
    pub fn new(raw: u64) -> Result<Self, LinkIdError> {
        if raw > Self::MAX {
            return Err(LinkIdError::TokenOutOfRange(raw));
        }
        NonZeroU64::new(raw).map(Self).ok_or(LinkIdError::Zero)
    }

    /// Token clamped into `1..=PendingToken::MAX`.
    ///
    /// ```
    /// # use devlinks::domain::PendingToken;
    /// assert_eq!(PendingToken::saturating(0).get(), 1);
    /// assert_eq!(PendingToken::saturating(u64::MAX).get(), PendingToken::MAX);
    /// ```
    pub fn saturating(raw: u64) -> Self {
        let clamped = raw.min(Self::MAX);
        Self(NonZeroU64::MIN.saturating_add(clamped.saturating_sub(1)))
    }

    /// Raw token value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Identifier of a link inside an editing session or a save submission.
///
/// # Examples
///
/// ```
/// # use devlinks::domain::LinkId;
/// let persisted = LinkId::from_wire(7).expect("non-zero");
/// let pending = LinkId::from_wire(-1_700_000_000_000).expect("non-zero");
/// assert!(persisted.is_persisted());
/// assert!(!pending.is_persisted());
/// assert_eq!(pending.to_wire(), -1_700_000_000_000);
/// assert!(LinkId::from_wire(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum LinkId {
    /// The link exists in the store under this id.
    Persisted(StoredLinkId),
    /// The link was added in the current session.
    Pending(PendingToken),
}

impl LinkId {
    /// Decode the signed wire representation.
    pub fn from_wire(raw: i64) -> Result<Self, LinkIdError> {
        match raw {
            0 => Err(LinkIdError::Zero),
            positive if positive > 0 => StoredLinkId::new(positive).map(Self::Persisted),
            negative => PendingToken::new(negative.unsigned_abs()).map(Self::Pending),
        }
    }

    /// Encode as the signed wire representation.
    pub fn to_wire(self) -> i64 {
        match self {
            Self::Persisted(id) => id.get(),
            // Tokens never exceed `PendingToken::MAX`.
            Self::Pending(token) => -(token.get() as i64),
        }
    }

    /// Whether the link already exists in the store.
    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    /// The store id, when persisted.
    pub fn stored(self) -> Option<StoredLinkId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Pending(_) => None,
        }
    }
}

impl From<StoredLinkId> for LinkId {
    fn from(value: StoredLinkId) -> Self {
        Self::Persisted(value)
    }
}

impl From<PendingToken> for LinkId {
    fn from(value: PendingToken) -> Self {
        Self::Pending(value)
    }
}

impl TryFrom<i64> for LinkId {
    type Error = LinkIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_wire(value)
    }
}

impl From<LinkId> for i64 {
    fn from(value: LinkId) -> Self {
        value.to_wire()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::persisted(42, true)]
    #[case::pending(-1_700_000_000_000, false)]
    #[case::pending_min(-1, false)]
    #[case::persisted_max(i64::MAX, true)]
    fn wire_sign_selects_variant(#[case] raw: i64, #[case] persisted: bool) {
        let id = LinkId::from_wire(raw).expect("non-zero id");
        assert_eq!(id.is_persisted(), persisted);
        assert_eq!(id.to_wire(), raw);
    }

    #[rstest]
    fn zero_is_rejected() {
        assert_eq!(LinkId::from_wire(0), Err(LinkIdError::Zero));
        assert!(serde_json::from_str::<LinkId>("0").is_err());
    }

    #[rstest]
    fn i64_min_has_no_pending_token() {
        assert_eq!(
            LinkId::from_wire(i64::MIN),
            Err(LinkIdError::TokenOutOfRange(i64::MIN.unsigned_abs()))
        );
    }

    #[rstest]
    fn stored_ids_must_be_positive() {
        assert_eq!(StoredLinkId::new(-3), Err(LinkIdError::NotPositive(-3)));
        assert_eq!(StoredLinkId::new(0), Err(LinkIdError::Zero));
    }
}
