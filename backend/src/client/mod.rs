//! Client side of the link editing protocol.
//!
//! - [`LinkListEditor`] keeps the ordered list and mints pending ids.
//! - [`LinksTransmitter`] reads and saves the whole collection;
//!   [`HttpLinksTransmitter`] does so over the HTTP API.
//! - [`EditingSession`] ties the two together for one load, edit and save
//!   cycle.

mod dto;
pub mod editor;
pub mod session;
pub mod transmitter;

pub use editor::{LinkEditorError, LinkListEditor};
pub use session::{EditingSession, SessionError};
#[cfg(test)]
pub use transmitter::MockLinksTransmitter;
pub use transmitter::{HttpLinksTransmitter, LinksTransmitter, TransmitError};
