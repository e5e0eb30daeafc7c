//! Workspace and multi-buffer model.
//!
//! An exercise page usually hosts several editors at once (student answer, starter code,
//! test scaffolding). [`Workspace`] owns one [`EditorStateManager`] per open buffer, keyed by
//! an opaque [`BufferId`] and optionally by a host-provided URI.

use crate::EditorStateManager;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque identifier for an open buffer in a [`Workspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(u64);

impl BufferId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Metadata attached to a workspace buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferMetadata {
    /// Optional buffer URI/path (host-provided).
    pub uri: Option<String>,
}

/// Workspace-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// A buffer with this uri already exists.
    UriAlreadyOpen(String),
    /// A buffer id was not found.
    BufferNotFound(BufferId),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::UriAlreadyOpen(uri) => write!(f, "Buffer already open: {}", uri),
            WorkspaceError::BufferNotFound(id) => write!(f, "Buffer not found: {}", id),
        }
    }
}

impl std::error::Error for WorkspaceError {}

struct BufferEntry {
    meta: BufferMetadata,
    state: EditorStateManager,
}

/// A collection of open buffers.
#[derive(Default)]
pub struct Workspace {
    next_buffer_id: u64,
    buffers: BTreeMap<BufferId, BufferEntry>,
    uri_to_buffer: HashMap<String, BufferId>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("buffer_count", &self.buffers.len())
            .field("uri_count", &self.uri_to_buffer.len())
            .finish()
    }
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of open buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Returns `true` if there are no open buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Open a new buffer.
    ///
    /// `uri` is optional and host-provided; when present it must be unique in the workspace.
    pub fn open_buffer(
        &mut self,
        uri: Option<String>,
        text: &str,
    ) -> Result<BufferId, WorkspaceError> {
        if let Some(uri) = uri.as_ref()
            && self.uri_to_buffer.contains_key(uri)
        {
            return Err(WorkspaceError::UriAlreadyOpen(uri.clone()));
        }

        let buffer_id = BufferId(self.next_buffer_id);
        self.next_buffer_id = self.next_buffer_id.saturating_add(1);

        if let Some(uri) = uri.as_ref() {
            self.uri_to_buffer.insert(uri.clone(), buffer_id);
        }
        self.buffers.insert(
            buffer_id,
            BufferEntry {
                meta: BufferMetadata { uri },
                state: EditorStateManager::new(text),
            },
        );

        Ok(buffer_id)
    }

    /// Close a buffer, dropping its state and attached processors.
    pub fn close_buffer(&mut self, id: BufferId) -> Result<(), WorkspaceError> {
        let Some(entry) = self.buffers.remove(&id) else {
            return Err(WorkspaceError::BufferNotFound(id));
        };

        if let Some(uri) = entry.meta.uri.as_ref() {
            self.uri_to_buffer.remove(uri);
        }
        Ok(())
    }

    /// Ids of all open buffers, in open order.
    pub fn buffer_ids(&self) -> Vec<BufferId> {
        self.buffers.keys().copied().collect()
    }

    /// Look up a buffer by URI.
    pub fn buffer_id_for_uri(&self, uri: &str) -> Option<BufferId> {
        self.uri_to_buffer.get(uri).copied()
    }

    /// Metadata for a buffer.
    pub fn buffer_metadata(&self, id: BufferId) -> Option<&BufferMetadata> {
        self.buffers.get(&id).map(|entry| &entry.meta)
    }

    /// The state of a buffer.
    pub fn buffer(&self, id: BufferId) -> Result<&EditorStateManager, WorkspaceError> {
        self.buffers
            .get(&id)
            .map(|entry| &entry.state)
            .ok_or(WorkspaceError::BufferNotFound(id))
    }

    /// The mutable state of a buffer.
    pub fn buffer_mut(&mut self, id: BufferId) -> Result<&mut EditorStateManager, WorkspaceError> {
        self.buffers
            .get_mut(&id)
            .map(|entry| &mut entry.state)
            .ok_or(WorkspaceError::BufferNotFound(id))
    }

    /// Iterate over all open buffers.
    pub fn buffers(&self) -> impl Iterator<Item = (BufferId, &EditorStateManager)> {
        self.buffers.iter().map(|(id, entry)| (*id, &entry.state))
    }
}
