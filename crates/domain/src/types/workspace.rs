//! Workspace (board) payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::MemberInvite;

/// Workspace as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(rename = "workspaceId")]
    pub workspace_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator: Option<Uuid>,
}

/// Workspace creation request
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkspace {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<MemberInvite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `{ "workspaceId": ... }` body used by most workspace-scoped endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceId {
    #[serde(rename = "workspaceId")]
    pub workspace_id: Uuid,
}
