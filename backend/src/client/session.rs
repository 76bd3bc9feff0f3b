//! Editing session: one editor bound to one transmitter.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use super::editor::{LinkEditorError, LinkListEditor};
use super::transmitter::{LinksTransmitter, TransmitError};
use crate::domain::LinkCollection;

/// Errors surfaced by [`EditingSession`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Editor(#[from] LinkEditorError),
    #[error(transparent)]
    Transmit(#[from] TransmitError),
}

/// Drives the load, edit and save cycle for one owner.
///
/// A failed save keeps the local edits so the caller can fix and retry. A
/// successful save replaces local state with the server's.
pub struct EditingSession<T> {
    transmitter: T,
    editor: LinkListEditor,
}

impl<T> EditingSession<T>
where
    T: LinksTransmitter,
{
    /// Load the authoritative collection and start editing it.
    pub async fn open(transmitter: T, clock: Arc<dyn Clock>) -> Result<Self, SessionError> {
        let collection = transmitter.fetch().await?;
        Ok(Self {
            editor: LinkListEditor::from_collection(&collection, clock),
            transmitter,
        })
    }

    pub fn editor(&self) -> &LinkListEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LinkListEditor {
        &mut self.editor
    }

    /// Drop local edits and re-read the server state.
    pub async fn reload(&mut self) -> Result<(), SessionError> {
        let collection = self.transmitter.fetch().await?;
        self.editor.replace_with(&collection);
        Ok(())
    }

    /// Submit the whole list once, then adopt the authoritative state.
    ///
    /// # Errors
    ///
    /// [`SessionError::Editor`] when a handle is invalid (nothing is sent);
    /// [`SessionError::Transmit`] when the server rejects the save or cannot
    /// be reached. Local edits survive both.
    pub async fn save(&mut self) -> Result<LinkCollection, SessionError> {
        let submission = self.editor.submission()?;
        let committed = self.transmitter.submit(&submission).await?;
        let authoritative = match self.transmitter.fetch().await {
            Ok(collection) => collection,
            Err(error) => {
                warn!(%error, "re-read after save failed; using committed state");
                committed
            }
        };
        self.editor.replace_with(&authoritative);
        Ok(authoritative)
    }
}
