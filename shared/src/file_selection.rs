//! Single-slot broker between an embedded "choose file" request and the
//! native picker.
//!
//! The browser hands over an opaque [`FileRequestId`] standing in for its
//! continuation. Every request is resolved exactly once through
//! [`Resolution`], whether the payload is a selection or empty.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    AwaitingPermission,
    AwaitingPickerResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFileRequest {
    pub id: FileRequestId,
    pub stage: Stage,
}

/// What the picker reported back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickerResult {
    Multiple { uris: Vec<String> },
    Single { uri: String },
    Cancelled,
    Failed { reason: String },
}

impl PickerResult {
    #[must_use]
    pub fn into_uris(self) -> Vec<String> {
        match self {
            Self::Multiple { uris } => uris,
            Self::Single { uri } => vec![uri],
            Self::Cancelled => Vec::new(),
            Self::Failed { reason } => {
                warn!(%reason, "file picker failed");
                Vec::new()
            }
        }
    }
}

/// Picker launch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerRequest {
    pub request: FileRequestId,
    pub title: String,
    pub mime_types: Vec<String>,
    pub allow_multiple: bool,
}

impl PickerRequest {
    #[must_use]
    pub fn media(request: FileRequestId) -> Self {
        Self {
            request,
            title: "Select Media".to_string(),
            mime_types: vec!["image/*".into(), "video/*".into(), "audio/*".into()],
            allow_multiple: true,
        }
    }
}

/// The single resolution of a file request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub request: FileRequestId,
    pub uris: Vec<String>,
}

/// Next step once the grant status of the media permission is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    LaunchPicker(FileRequestId),
    RequestPermission(FileRequestId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelectionBroker {
    slot: Option<PendingFileRequest>,
}

impl FileSelectionBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingFileRequest> {
        self.slot
    }

    /// Stores a new request. A request still in the slot is handed back
    /// resolved with an empty selection so the page never waits twice.
    pub fn begin(&mut self, id: FileRequestId) -> Option<Resolution> {
        let stale = self.resolve(Vec::new());
        if let Some(stale) = &stale {
            info!(stale = ?stale.request, new = ?id, "file request superseded");
        }
        self.slot = Some(PendingFileRequest {
            id,
            stage: Stage::AwaitingPermission,
        });
        stale
    }

    pub fn permission_known(&mut self, id: FileRequestId, granted: bool) -> Option<NextStep> {
        if !self.is_waiting_for_permission(id) {
            debug!(?id, "grant status for a request no longer pending");
            return None;
        }
        if granted {
            self.advance_to_picker(id);
            Some(NextStep::LaunchPicker(id))
        } else {
            Some(NextStep::RequestPermission(id))
        }
    }

    /// Runs after the OS answered the media prompt, granted or not.
    pub fn proceed_to_picker(&mut self, id: FileRequestId) -> bool {
        if !self.is_waiting_for_permission(id) {
            debug!(?id, "permission follow-up for a request no longer pending");
            return false;
        }
        self.advance_to_picker(id);
        true
    }

    pub fn picker_finished(&mut self, id: FileRequestId, result: PickerResult) -> Option<Resolution> {
        match self.slot {
            Some(PendingFileRequest { id: pending, stage: Stage::AwaitingPickerResult })
                if pending == id =>
            {
                self.resolve(result.into_uris())
            }
            _ => {
                debug!(?id, "stale picker result dropped");
                None
            }
        }
    }

    /// Resolves whatever is pending with an empty selection.
    pub fn cancel(&mut self) -> Option<Resolution> {
        self.resolve(Vec::new())
    }

    fn resolve(&mut self, uris: Vec<String>) -> Option<Resolution> {
        self.slot.take().map(|pending| Resolution {
            request: pending.id,
            uris,
        })
    }

    fn is_waiting_for_permission(&self, id: FileRequestId) -> bool {
        matches!(
            self.slot,
            Some(PendingFileRequest { id: pending, stage: Stage::AwaitingPermission }) if pending == id
        )
    }

    fn advance_to_picker(&mut self, id: FileRequestId) {
        self.slot = Some(PendingFileRequest {
            id,
            stage: Stage::AwaitingPickerResult,
        });
    }
}
