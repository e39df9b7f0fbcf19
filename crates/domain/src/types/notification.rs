//! Notification payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::MemberStatus;

/// Notification addressed to the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Uuid,
    #[serde(rename = "fromUser", default)]
    pub from_user: Option<Uuid>,
    #[serde(rename = "toUser", default)]
    pub to_user: Option<Uuid>,
    #[serde(rename = "workspaceId", default)]
    pub workspace_id: Option<Uuid>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    /// Sender's display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message_content: Option<String>,
    #[serde(default)]
    pub reaction: MemberStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Whether this is a workspace invite still waiting for an answer.
    #[must_use]
    pub fn awaits_reaction(&self) -> bool {
        self.workspace_id.is_some() && self.reaction == MemberStatus::Pending
    }
}

/// Payload of `get_all_notfications`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationList {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl NotificationList {
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }
}
