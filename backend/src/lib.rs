//! devlinks: a developer's ordered list of profile links, edited locally and
//! saved as a whole.
//!
//! - [`client`] holds the local editing model and the save transmitter.
//! - [`domain`] holds the link types, reconciliation planning and ports.
//! - [`inbound`] and [`outbound`] adapt HTTP and storage to those ports.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
