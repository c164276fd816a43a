use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::file_selection::FileRequestId;
use crate::model::MediaPermissionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    PostNotifications,
    FineLocation,
    CoarseLocation,
    ReadMediaImages,
    ReadMediaVideo,
    ReadExternalStorage,
    Camera,
}

pub const NOTIFICATION_PERMISSIONS: &[Permission] = &[Permission::PostNotifications];
pub const LOCATION_PERMISSIONS: &[Permission] =
    &[Permission::FineLocation, Permission::CoarseLocation];

/// Permissions whose grant status gates the picker. Only the first is
/// checked; the full set is what gets requested.
#[must_use]
pub fn media_permissions(model: MediaPermissionModel) -> &'static [Permission] {
    match model {
        MediaPermissionModel::Granular => &[
            Permission::ReadMediaImages,
            Permission::ReadMediaVideo,
            Permission::Camera,
        ],
        MediaPermissionModel::Legacy => &[Permission::ReadExternalStorage, Permission::Camera],
    }
}

/// Pairs an OS permission prompt with its eventual answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationCode(pub u16);

impl CorrelationCode {
    pub const NOTIFICATIONS: Self = Self(1001);
    pub const LOCATION: Self = Self(1002);
    pub const MEDIA: Self = Self(3000);
}

impl fmt::Display for CorrelationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub granted: bool,
}

/// Work to resume once the OS has answered, whatever the answer was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    Nothing,
    LaunchFilePicker { request: FileRequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPermissionRequest {
    pub permissions: Vec<Permission>,
    pub code: CorrelationCode,
    pub follow_up: FollowUp,
}

/// The answer for a known correlation code, with the follow-up to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub request: PendingPermissionRequest,
    pub grants: Vec<PermissionGrant>,
}

impl Answered {
    #[must_use]
    pub fn all_granted(&self) -> bool {
        !self.grants.is_empty() && self.grants.iter().all(|g| g.granted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionNegotiator {
    pending: HashMap<CorrelationCode, PendingPermissionRequest>,
}

impl PermissionNegotiator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request. A second request under the same code replaces the
    /// stored follow-up rather than queueing behind it.
    pub fn request(
        &mut self,
        permissions: &[Permission],
        code: CorrelationCode,
        follow_up: FollowUp,
    ) {
        let record = PendingPermissionRequest {
            permissions: permissions.to_vec(),
            code,
            follow_up,
        };
        if let Some(previous) = self.pending.insert(code, record) {
            debug!(%code, previous = ?previous.follow_up, ?follow_up, "permission follow-up replaced");
        }
    }

    /// Clears the record for `code` and hands back its follow-up. Unknown or
    /// already answered codes yield `None`.
    pub fn answer(&mut self, code: CorrelationCode, grants: Vec<PermissionGrant>) -> Option<Answered> {
        let Some(request) = self.pending.remove(&code) else {
            debug!(%code, "permission answer for unknown code, ignored");
            return None;
        };
        let answered = Answered { request, grants };
        info!(%code, granted = answered.all_granted(), "permission answered");
        Some(answered)
    }

    #[must_use]
    pub fn pending(&self, code: CorrelationCode) -> Option<&PendingPermissionRequest> {
        self.pending.get(&code)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied(permissions: &[Permission]) -> Vec<PermissionGrant> {
        permissions
            .iter()
            .map(|&permission| PermissionGrant { permission, granted: false })
            .collect()
    }

    #[test]
    fn denied_answer_still_returns_follow_up_once() {
        let mut negotiator = PermissionNegotiator::new();
        let follow_up = FollowUp::LaunchFilePicker { request: FileRequestId(7) };
        let media = media_permissions(MediaPermissionModel::Granular);
        negotiator.request(media, CorrelationCode::MEDIA, follow_up);

        let answered = negotiator
            .answer(CorrelationCode::MEDIA, denied(media))
            .expect("pending request");
        assert_eq!(answered.request.follow_up, follow_up);
        assert!(!answered.all_granted());

        assert_eq!(negotiator.answer(CorrelationCode::MEDIA, denied(media)), None);
        assert!(negotiator.is_idle());
    }

    #[test]
    fn same_code_is_last_writer_wins() {
        let mut negotiator = PermissionNegotiator::new();
        negotiator.request(
            LOCATION_PERMISSIONS,
            CorrelationCode::MEDIA,
            FollowUp::LaunchFilePicker { request: FileRequestId(1) },
        );
        negotiator.request(
            LOCATION_PERMISSIONS,
            CorrelationCode::MEDIA,
            FollowUp::LaunchFilePicker { request: FileRequestId(2) },
        );

        let answered = negotiator.answer(CorrelationCode::MEDIA, vec![]).unwrap();
        assert_eq!(
            answered.request.follow_up,
            FollowUp::LaunchFilePicker { request: FileRequestId(2) }
        );
        assert!(negotiator.is_idle());
    }

    #[test]
    fn recorded_request_is_visible_until_answered() {
        let mut negotiator = PermissionNegotiator::new();
        negotiator.request(LOCATION_PERMISSIONS, CorrelationCode::LOCATION, FollowUp::Nothing);

        let pending = negotiator
            .pending(CorrelationCode::LOCATION)
            .expect("request recorded");
        assert_eq!(pending.permissions, LOCATION_PERMISSIONS.to_vec());
        assert_eq!(pending.follow_up, FollowUp::Nothing);
    }

    #[test]
    fn codes_are_independent() {
        let mut negotiator = PermissionNegotiator::new();
        negotiator.request(LOCATION_PERMISSIONS, CorrelationCode::LOCATION, FollowUp::Nothing);
        negotiator.request(NOTIFICATION_PERMISSIONS, CorrelationCode::NOTIFICATIONS, FollowUp::Nothing);

        assert!(negotiator.answer(CorrelationCode::LOCATION, vec![]).is_some());
        assert!(negotiator.pending(CorrelationCode::NOTIFICATIONS).is_some());
    }

    #[test]
    fn unknown_code_is_silent() {
        let mut negotiator = PermissionNegotiator::new();
        assert_eq!(negotiator.answer(CorrelationCode(42), vec![]), None);
    }

    #[test]
    fn all_granted_requires_every_grant() {
        let answered = Answered {
            request: PendingPermissionRequest {
                permissions: LOCATION_PERMISSIONS.to_vec(),
                code: CorrelationCode::LOCATION,
                follow_up: FollowUp::Nothing,
            },
            grants: vec![
                PermissionGrant { permission: Permission::FineLocation, granted: true },
                PermissionGrant { permission: Permission::CoarseLocation, granted: false },
            ],
        };
        assert!(!answered.all_granted());
    }

    #[test]
    fn legacy_media_set_uses_external_storage() {
        let legacy = media_permissions(MediaPermissionModel::Legacy);
        assert_eq!(legacy[0], Permission::ReadExternalStorage);
        assert!(legacy.contains(&Permission::Camera));
    }
}
