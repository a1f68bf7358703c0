//! Application message types for planview.
//!
//! All UI events and host callbacks are represented as messages in the Elm architecture style.

use crate::handoff::Navigation;
use crate::ingest::ReadTicket;
use crate::model::{ReadError, SelectedFile};

/// Messages that can be sent to update application state.
#[derive(Debug)]
pub enum Message {
    // Capability
    /// The authentication collaborator changed the signed-in flag
    SignedInChanged(bool),

    // Upload panel
    /// Files chosen through the picker
    FilesPicked(Vec<SelectedFile>),
    /// Drag entered the dropzone
    DragEntered,
    /// Drag moved over the dropzone
    DragOver,
    /// Drag left the dropzone
    DragLeft,
    /// Files dropped on the dropzone
    FilesDropped(Vec<SelectedFile>),
    /// The host finished reading a file
    ReadFinished(ReadTicket, Result<Vec<u8>, ReadError>),

    // Navigation
    /// Router transition
    Navigate(Navigation),
    /// Visualizer empty-state action
    GoHome,
    /// Full page reload: in-memory navigation state is lost
    Reload,
}
