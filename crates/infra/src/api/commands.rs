//! Typed Kanflow commands
//!
//! One method per backend endpoint the board UI uses. Almost every endpoint
//! is a POST with a small JSON body, even for reads.

use std::sync::Arc;

use kanflow_domain::constants::endpoints;
use kanflow_domain::types::{
    MemberInvite, MemberStatus, NewTask, NewWorkspace, NotificationList, Privilege, Task,
    TaskList, TaskUpdate, TeamRoster, Workspace,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::Payload;

#[derive(Debug, Deserialize)]
struct PrivilegeCheck {
    #[serde(default)]
    admin: bool,
}

#[derive(Debug, Deserialize)]
struct TaskDetail {
    task_detail: Task,
}

/// API commands for workspaces, tasks, team and notifications
#[derive(Debug, Clone)]
pub struct KanflowCommands {
    client: Arc<ApiClient>,
}

impl KanflowCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Workspaces ===

    /// Create a workspace, inviting `team_members` in the same call.
    #[instrument(skip(self, workspace), fields(name = %workspace.name))]
    pub async fn create_workspace(&self, workspace: &NewWorkspace) -> Result<Workspace, ApiError> {
        let created: Workspace =
            self.client.post(endpoints::CREATE_WORKSPACE, Payload::json(workspace)?, None).await?;
        debug!(workspace_id = %created.workspace_id, "Workspace created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_workspace(&self, workspace_id: Uuid) -> Result<Workspace, ApiError> {
        self.client
            .post(endpoints::GET_WORKSPACE, json!({ "workspaceId": workspace_id }), None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        self.client.get(endpoints::GET_ALL_WORKSPACES, None, None).await
    }

    /// Whether the signed-in user is an admin of the workspace.
    #[instrument(skip(self))]
    pub async fn check_privilege(&self, workspace_id: Uuid) -> Result<Privilege, ApiError> {
        let check: PrivilegeCheck = self
            .client
            .post(endpoints::CHECK_PRIVILEGE, json!({ "workspaceId": workspace_id }), None)
            .await?;
        Ok(if check.admin { Privilege::Admin } else { Privilege::User })
    }

    #[instrument(skip(self))]
    pub async fn update_workspace_name(
        &self,
        workspace_id: Uuid,
        new_name: &str,
    ) -> Result<(), ApiError> {
        let payload = json!({ "workspaceId": workspace_id, "workspaceNewName": new_name });
        let _: IgnoredAny = self.client.post(endpoints::UPDATE_WORKSPACE_NAME, payload, None).await?;
        Ok(())
    }

    // === Tasks ===

    #[instrument(skip(self, task), fields(workspace_id = %task.workspace_id))]
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let created: Task = self.client.post(endpoints::CREATE_TASK, Payload::json(task)?, None).await?;
        debug!(task_id = %created.task_id, "Task created");
        Ok(created)
    }

    /// Apply a partial update; moving a card between columns is
    /// `TaskUpdate::move_to`.
    #[instrument(skip(self, update), fields(task_id = %update.task_id))]
    pub async fn update_task(&self, workspace_id: Uuid, update: &TaskUpdate) -> Result<Task, ApiError> {
        let mut payload = serde_json::to_value(update)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {e}")))?;
        if let Some(map) = payload.as_object_mut() {
            map.insert("workspaceId".into(), json!(workspace_id));
        }
        self.client.post(endpoints::UPDATE_TASK, payload, None).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, workspace_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        let payload = json!({ "taskId": task_id, "workspaceId": workspace_id });
        let _: IgnoredAny = self.client.post(endpoints::DELETE_TASK, payload, None).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_tasks(&self, workspace_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let list: TaskList = self
            .client
            .post(endpoints::GET_ALL_TASKS, json!({ "workspaceId": workspace_id }), None)
            .await?;
        Ok(list.tasks)
    }

    #[instrument(skip(self))]
    pub async fn task_detail(&self, workspace_id: Uuid, task_id: Uuid) -> Result<Task, ApiError> {
        let detail: TaskDetail = self
            .client
            .post(
                endpoints::TASK_DETAIL,
                json!({ "task_id": task_id, "workspaceId": workspace_id }),
                None,
            )
            .await?;
        Ok(detail.task_detail)
    }

    // === Team ===

    /// Accepted members and pending/rejected invitations.
    #[instrument(skip(self))]
    pub async fn team_members(&self, workspace_id: Uuid) -> Result<TeamRoster, ApiError> {
        self.client
            .post(endpoints::ALL_TEAM_MEMBERS, json!({ "workspaceId": workspace_id }), None)
            .await
    }

    #[instrument(skip(self, invites), fields(count = invites.len()))]
    pub async fn send_invites(
        &self,
        workspace_id: Uuid,
        invites: &[MemberInvite],
        message: Option<&str>,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "workspaceId": workspace_id,
            "team_members": invites,
            "message": message,
        });
        let _: IgnoredAny = self.client.post(endpoints::SEND_INVITE, payload, None).await?;
        Ok(())
    }

    #[instrument(skip(self, email))]
    pub async fn change_privilege(
        &self,
        workspace_id: Uuid,
        email: &str,
        privilege: Privilege,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "privilege": privilege,
            "workspaceId": workspace_id,
            "roleChangeEmail": email,
        });
        let _: IgnoredAny = self.client.post(endpoints::CHANGE_PRIVILEGE, payload, None).await?;
        Ok(())
    }

    /// Remove a member or revoke a pending invite.
    #[instrument(skip(self, email))]
    pub async fn remove_member(&self, workspace_id: Uuid, email: &str) -> Result<(), ApiError> {
        let payload = json!({ "email": email, "workspaceId": workspace_id });
        let _: IgnoredAny = self.client.post(endpoints::REMOVE_MEMBER, payload, None).await?;
        Ok(())
    }

    // === Notifications ===

    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<NotificationList, ApiError> {
        self.client.get(endpoints::GET_ALL_NOTIFICATIONS, None, None).await
    }

    #[instrument(skip(self))]
    pub async fn mark_notification_read(&self, notification_id: Uuid) -> Result<(), ApiError> {
        let payload = json!({ "notification_id": notification_id });
        let _: IgnoredAny =
            self.client.post(endpoints::MARK_NOTIFICATION_READ, payload, None).await?;
        Ok(())
    }

    /// Accept or reject a workspace invitation.
    #[instrument(skip(self))]
    pub async fn respond_to_invite(
        &self,
        notification_id: Uuid,
        workspace_id: Uuid,
        reaction: MemberStatus,
    ) -> Result<(), ApiError> {
        if reaction == MemberStatus::Pending {
            return Err(ApiError::InvalidRequest("an invite can only be accepted or rejected".into()));
        }
        let payload = json!({
            "notification_id": notification_id,
            "workspaceId": workspace_id,
            "reaction": reaction,
        });
        let _: IgnoredAny = self.client.post(endpoints::ACCEPT_REJECT_INVITE, payload, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use kanflow_core::{CredentialKey, CredentialStore};
    use kanflow_domain::types::{TaskPriority, TaskStatus};
    use kanflow_domain::ApiConfig;
    use serde_json::Value;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::credentials::MemoryCredentialStore;

    const WORKSPACE: &str = "0190a6b4-8a44-7cc3-9d3e-2b1f5c0d9e11";
    const TASK: &str = "0190a6b4-9b55-7dd4-8e4f-3c2a6d1e0f22";

    async fn commands_for(server: &MockServer) -> KanflowCommands {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(CredentialKey::AccessToken, "tok1").await.unwrap();
        let client = ApiClient::builder()
            .config(ApiConfig { api_url: format!("{}/api", server.uri()), ..ApiConfig::default() })
            .store(store)
            .build()
            .unwrap();
        KanflowCommands::new(Arc::new(client))
    }

    fn ids() -> (Uuid, Uuid) {
        (Uuid::parse_str(WORKSPACE).unwrap(), Uuid::parse_str(TASK).unwrap())
    }

    fn task_json(status: &str) -> Value {
        json!({
            "task_id": TASK,
            "title": "Write docs",
            "description": "",
            "due_date": "2026-10-30",
            "priority": "high",
            "status": status,
            "assignees": [],
            "tags": ["docs"]
        })
    }

    #[tokio::test]
    async fn test_list_tasks_posts_workspace_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/get_all_tasks"))
            .and(body_json(json!({ "workspaceId": WORKSPACE })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "payload": { "tasks": [task_json("in_progress")] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let tasks = commands.list_tasks(ids().0).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_create_task_sends_camel_case_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/create_task"))
            .and(body_partial_json(json!({
                "workspaceId": WORKSPACE,
                "dueDate": "2026-10-30",
                "priority": "high",
                "status": "todo"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "payload": task_json("todo")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let new_task = NewTask {
            workspace_id: ids().0,
            title: "Write docs".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 30).unwrap(),
            priority: TaskPriority::High,
            status: TaskStatus::Todo,
            assignees: Vec::new(),
            tags: vec!["docs".into()],
        };
        let created = commands.create_task(&new_task).await.unwrap();
        assert_eq!(created.due_date, Some(new_task.due_date));
    }

    #[tokio::test]
    async fn test_task_detail_unwraps_nested_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/detail_task"))
            .and(body_json(json!({ "task_id": TASK, "workspaceId": WORKSPACE })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": { "task_detail": task_json("done") }
            })))
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let (workspace, task) = ids();
        let detail = commands.task_detail(workspace, task).await.unwrap();
        assert_eq!(detail.task_id, task);
        assert_eq!(detail.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_move_task_sends_only_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/update_task"))
            .and(body_json(json!({ "task_id": TASK, "status": "blocked", "workspaceId": WORKSPACE })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": task_json("blocked")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let (workspace, task) = ids();
        let moved = commands
            .update_task(workspace, &TaskUpdate::move_to(task, TaskStatus::Blocked))
            .await
            .unwrap();
        assert_eq!(moved.status, TaskStatus::Blocked);
    }

    #[tokio::test]
    async fn test_check_privilege_reads_admin_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/workspace/check_privilege"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": { "admin": true }
            })))
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        assert_eq!(commands.check_privilege(ids().0).await.unwrap(), Privilege::Admin);
    }

    #[tokio::test]
    async fn test_team_members_roster() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/team/all_team_members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": { "in_team": [], "invited": [] }
            })))
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let roster = commands.team_members(ids().0).await.unwrap();
        assert!(roster.in_team.is_empty());
        assert!(roster.invited.is_empty());
    }

    #[tokio::test]
    async fn test_change_privilege_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/team/change_privilege"))
            .and(body_json(json!({
                "privilege": "admin",
                "workspaceId": WORKSPACE,
                "roleChangeEmail": "bob@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        commands.change_privilege(ids().0, "bob@example.com", Privilege::Admin).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_invites_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/team/send_invite"))
            .and(body_partial_json(json!({
                "workspaceId": WORKSPACE,
                "team_members": [{ "email": "bob@example.com", "privilege": "user" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let invites = [MemberInvite::new("bob@example.com", Privilege::User)];
        commands.send_invites(ids().0, &invites, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_respond_to_invite_rejects_pending() {
        let server = MockServer::start().await;
        let commands = commands_for(&server).await;
        let (workspace, notification) = ids();
        let err = commands
            .respond_to_invite(notification, workspace, MemberStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifications_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications/get_all_notfications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": { "notifications": [] }
            })))
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let list = commands.notifications().await.unwrap();
        assert_eq!(list.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_task_failure_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/delete_task"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "success": false, "message": "Only admins can delete" })),
            )
            .mount(&server)
            .await;

        let commands = commands_for(&server).await;
        let (workspace, task) = ids();
        let err = commands.delete_task(workspace, task).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
