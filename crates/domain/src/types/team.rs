//! Team membership payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// Role of a member inside a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Admin,
    #[default]
    User,
}

impl_domain_status_conversions!(Privilege {
    Admin => "admin",
    User => "user",
});

/// Invitation state; also the reaction recorded on invite notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl_domain_status_conversions!(MemberStatus {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
});

/// Member entry as returned by `all_team_members`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub member_id: Uuid,
    #[serde(rename = "userId", default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub privilege: Privilege,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Display name; absent until the invitee registers.
    #[serde(default)]
    pub name: Option<String>,
}

/// Accepted members and outstanding invitations of a workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamRoster {
    #[serde(default)]
    pub in_team: Vec<TeamMember>,
    #[serde(default)]
    pub invited: Vec<TeamMember>,
}

/// One invitee in an invite or workspace-creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInvite {
    pub email: String,
    pub privilege: Privilege,
    #[serde(default)]
    pub status: MemberStatus,
}

impl MemberInvite {
    #[must_use]
    pub fn new(email: impl Into<String>, privilege: Privilege) -> Self {
        Self { email: email.into(), privilege, status: MemberStatus::Pending }
    }
}
