//! Recognised link platforms.
//!
//! The platform set is closed. Values travel by display name both on the wire
//! and in storage, so adding a platform is a schema change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform a link entry points at.
///
/// # Examples
///
/// ```
/// # use devlinks::domain::Platform;
/// let platform: Platform = "Stack Overflow".parse().expect("known platform");
/// assert_eq!(platform, Platform::StackOverflow);
/// assert_eq!(Platform::default(), Platform::GitHub);
/// assert!("MySpace".parse::<Platform>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// GitHub, the default for new entries.
    #[default]
    GitHub,
    FrontendMentor,
    Twitter,
    LinkedIn,
    YouTube,
    Facebook,
    Twitch,
    DevTo,
    Codewars,
    FreeCodeCamp,
    GitLab,
    Hashnode,
    StackOverflow,
}

impl Platform {
    /// Every recognised platform in menu order.
    pub const ALL: [Platform; 13] = [
        Self::GitHub,
        Self::FrontendMentor,
        Self::Twitter,
        Self::LinkedIn,
        Self::YouTube,
        Self::Facebook,
        Self::Twitch,
        Self::DevTo,
        Self::Codewars,
        Self::FreeCodeCamp,
        Self::GitLab,
        Self::Hashnode,
        Self::StackOverflow,
    ];

    /// Display name used on the wire and in the `links.platform` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::FrontendMentor => "Frontend Mentor",
            Self::Twitter => "Twitter",
            Self::LinkedIn => "LinkedIn",
            Self::YouTube => "YouTube",
            Self::Facebook => "Facebook",
            Self::Twitch => "Twitch",
            Self::DevTo => "Dev.to",
            Self::Codewars => "Codewars",
            Self::FreeCodeCamp => "freeCodeCamp",
            Self::GitLab => "GitLab",
            Self::Hashnode => "Hashnode",
            Self::StackOverflow => "Stack Overflow",
        }
    }

    /// Public profile URL for `handle` on this platform.
    ///
    /// ```
    /// # use devlinks::domain::Platform;
    /// assert_eq!(
    ///     Platform::GitHub.profile_url("octocat"),
    ///     "https://github.com/octocat"
    /// );
    /// assert_eq!(
    ///     Platform::Hashnode.profile_url("ada"),
    ///     "https://hashnode.com/@ada"
    /// );
    /// ```
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            Self::GitHub => format!("https://github.com/{handle}"),
            Self::FrontendMentor => format!("https://www.frontendmentor.io/profile/{handle}"),
            Self::Twitter => format!("https://twitter.com/{handle}"),
            Self::LinkedIn => format!("https://www.linkedin.com/in/{handle}"),
            Self::YouTube => format!("https://www.youtube.com/@{handle}"),
            Self::Facebook => format!("https://www.facebook.com/{handle}"),
            Self::Twitch => format!("https://www.twitch.tv/{handle}"),
            Self::DevTo => format!("https://dev.to/{handle}"),
            Self::Codewars => format!("https://www.codewars.com/users/{handle}"),
            Self::FreeCodeCamp => format!("https://www.freecodecamp.org/{handle}"),
            Self::GitLab => format!("https://gitlab.com/{handle}"),
            Self::Hashnode => format!("https://hashnode.com/@{handle}"),
            Self::StackOverflow => format!("https://stackoverflow.com/users/{handle}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised platform name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {input}")]
pub struct ParsePlatformError {
    /// The rejected input value.
    pub input: String,
}

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| ParsePlatformError {
                input: s.to_owned(),
            })
    }
}

impl TryFrom<String> for Platform {
    type Error = ParsePlatformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_owned()
    }
}
