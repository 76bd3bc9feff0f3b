//! Client-side link list state.
//!
//! [`LinkListEditor`] holds the ordered list for one editing session. Every
//! mutation recomputes positions from the resulting order, so the list always
//! carries positions `1..N`. Nothing here touches the network.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    LinkCollection, LinkEntry, LinkHandle, LinkHandleError, LinkId, LinkSubmission, PendingToken,
    Platform, SubmittedLink,
};

/// Errors returned by editor operations. A failed call leaves the list as it
/// was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkEditorError {
    /// No entry carries the given id.
    #[error("no link with id {id} in this session")]
    UnknownLink { id: LinkId },
    /// An index was outside the list.
    #[error("index {index} is out of range for {len} links")]
    IndexOutOfRange { index: usize, len: usize },
    /// A handle failed validation when packaging a submission.
    #[error("link {id} has an invalid handle: {reason}")]
    InvalidHandle {
        id: LinkId,
        #[source]
        reason: LinkHandleError,
    },
}

/// Ordered, in-memory link list for one editing session.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use devlinks::client::LinkListEditor;
/// use devlinks::domain::Platform;
/// use mockable::DefaultClock;
///
/// let mut editor = LinkListEditor::new(Arc::new(DefaultClock));
/// let first = editor.add();
/// let second = editor.add();
/// editor.edit_platform(second, Platform::GitLab).unwrap();
/// editor.reorder(1, 0).unwrap();
///
/// let ids: Vec<_> = editor.entries().iter().map(|e| (e.id, e.position)).collect();
/// assert_eq!(ids, vec![(second, 1), (first, 2)]);
/// ```
pub struct LinkListEditor {
    clock: Arc<dyn Clock>,
    entries: Vec<LinkEntry>,
    revision: u32,
    last_token: u64,
}

impl LinkListEditor {
    /// Start an empty session for an owner who has never saved.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Vec::new(),
            revision: 0,
            last_token: 0,
        }
    }

    /// Start a session from authoritative state.
    pub fn from_collection(collection: &LinkCollection, clock: Arc<dyn Clock>) -> Self {
        let mut editor = Self::new(clock);
        editor.replace_with(collection);
        editor
    }

    /// Discard local edits and adopt `collection`.
    pub fn replace_with(&mut self, collection: &LinkCollection) {
        self.entries = collection.links.iter().map(LinkEntry::from).collect();
        self.revision = collection.revision;
        self.renumber();
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Revision the session was loaded at.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a new pending entry with the default platform and an empty
    /// handle.
    pub fn add(&mut self) -> LinkId {
        let id = LinkId::Pending(self.mint_token());
        let position = self.next_position();
        self.entries.push(LinkEntry {
            id,
            platform: Platform::default(),
            handle: String::new(),
            position,
        });
        id
    }

    /// Remove the entry with `id` and close the gap.
    pub fn remove(&mut self, id: LinkId) -> Result<LinkEntry, LinkEditorError> {
        let index = self.index_of(id)?;
        let removed = self.entries.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move the entry at `from` so it ends up at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), LinkEditorError> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(LinkEditorError::IndexOutOfRange { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.renumber();
        Ok(())
    }

    pub fn edit_platform(&mut self, id: LinkId, platform: Platform) -> Result<(), LinkEditorError> {
        self.entry_mut(id)?.platform = platform;
        Ok(())
    }

    pub fn edit_handle(
        &mut self,
        id: LinkId,
        handle: impl Into<String>,
    ) -> Result<(), LinkEditorError> {
        self.entry_mut(id)?.handle = handle.into();
        Ok(())
    }

    /// Package the list for a save, validating every handle.
    pub fn submission(&self) -> Result<LinkSubmission, LinkEditorError> {
        let links = self
            .entries
            .iter()
            .map(|entry| {
                LinkHandle::new(&entry.handle)
                    .map(|handle| SubmittedLink {
                        id: entry.id,
                        platform: entry.platform,
                        handle,
                    })
                    .map_err(|reason| LinkEditorError::InvalidHandle {
                        id: entry.id,
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LinkSubmission {
            expected_revision: self.revision,
            links,
        })
    }

    fn index_of(&self, id: LinkId) -> Result<usize, LinkEditorError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(LinkEditorError::UnknownLink { id })
    }

    fn entry_mut(&mut self, id: LinkId) -> Result<&mut LinkEntry, LinkEditorError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(LinkEditorError::UnknownLink { id })
    }

    fn next_position(&self) -> u32 {
        u32::try_from(self.entries.len() + 1).unwrap_or(u32::MAX)
    }

    fn renumber(&mut self) {
        for (position, entry) in (1_u32..).zip(self.entries.iter_mut()) {
            entry.position = position;
        }
    }

    /// Millisecond timestamp, bumped past the previous token when the clock
    /// has not advanced.
    fn mint_token(&mut self) -> PendingToken {
        let now = u64::try_from(self.clock.utc().timestamp_millis()).unwrap_or(0);
        let token = PendingToken::saturating(now.max(self.last_token.saturating_add(1)));
        self.last_token = token.get();
        token
    }
}

impl std::fmt::Debug for LinkListEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkListEditor")
            .field("entries", &self.entries)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
