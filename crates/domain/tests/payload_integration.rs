//! Integration tests for backend payload decoding
//!
//! Feeds whole response bodies, as the backend sends them, through the
//! envelope and into the typed DTOs.

use kanflow_domain::{
    Envelope, NotificationList, Privilege, TaskBoard, TaskList, TaskPriority, TaskStatus,
    TeamRoster, Workspace,
};
use serde_json::{json, Value};

fn open<T: serde::de::DeserializeOwned>(body: Value) -> T {
    let payload = Envelope::open(body).expect("successful envelope");
    serde_json::from_value(payload).expect("payload decodes")
}

#[test]
fn task_list_builds_a_board() {
    let tasks: TaskList = open(json!({
        "success": true,
        "message": "Tasks fetched",
        "payload": {
            "tasks": [
                {
                    "task_id": "1b4e28ba-2fa1-41d2-883f-0016d3cca427",
                    "title": "Draft roadmap",
                    "description": "Q3 goals",
                    "dueDate": "2026-11-02",
                    "priority": "high",
                    "status": "in_progress",
                    "assignees": ["6f1c1f52-7a4b-4c1c-9a53-1df1d1f0a1aa"],
                    "tags": ["planning"]
                },
                {
                    "task_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                    "title": "Ship release",
                    "priority": "low",
                    "status": "done"
                }
            ]
        }
    }));

    assert_eq!(tasks.tasks.len(), 2);
    assert_eq!(tasks.tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks.tasks[0].due_date.map(|d| d.to_string()).as_deref(), Some("2026-11-02"));

    let board = TaskBoard::from_tasks(tasks.tasks);
    assert_eq!(board.len(), 2);
    assert_eq!(board.column(TaskStatus::InProgress)[0].title, "Draft roadmap");
    assert_eq!(board.column(TaskStatus::Done)[0].title, "Ship release");
    assert!(board.column(TaskStatus::Blocked).is_empty());
}

#[test]
fn empty_task_list_is_an_empty_board() {
    let tasks: TaskList = open(json!({ "success": true, "payload": { "tasks": [] } }));
    assert!(TaskBoard::from_tasks(tasks.tasks).is_empty());
}

#[test]
fn workspace_list_decodes() {
    let workspaces: Vec<Workspace> = open(json!({
        "success": true,
        "payload": [
            {
                "workspaceId": "a3bb189e-8bf9-3888-9912-ace4e6543002",
                "name": "Platform",
                "description": "Core services",
                "creator": "6f1c1f52-7a4b-4c1c-9a53-1df1d1f0a1aa"
            }
        ]
    }));

    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].name, "Platform");
    assert!(workspaces[0].creator.is_some());
}

#[test]
fn team_roster_splits_members_and_invites() {
    let roster: TeamRoster = open(json!({
        "success": true,
        "payload": {
            "in_team": [{
                "member_id": "9b2f6c1e-3a5d-4c7e-8f90-1a2b3c4d5e6f",
                "userId": "6f1c1f52-7a4b-4c1c-9a53-1df1d1f0a1aa",
                "email": "ada@kanflow.dev",
                "status": "accepted",
                "privilege": "admin",
                "updated_at": "2026-10-01T09:30:00Z",
                "name": "Ada"
            }],
            "invited": [{
                "member_id": "0d6f3f0a-8f0e-4d71-9a43-7d3f0d0f5a11",
                "email": "grace@kanflow.dev",
                "status": "pending",
                "privilege": "user"
            }]
        }
    }));

    assert_eq!(roster.in_team[0].privilege, Privilege::Admin);
    assert!(roster.in_team[0].updated_at.is_some());
    assert_eq!(roster.invited[0].email.as_deref(), Some("grace@kanflow.dev"));
}

#[test]
fn notifications_count_unread_and_pending_invites() {
    let list: NotificationList = open(json!({
        "success": true,
        "payload": {
            "notifications": [
                {
                    "notification_id": "3f2504e0-4f89-41d3-9a0c-0305e82c3301",
                    "workspaceId": "a3bb189e-8bf9-3888-9912-ace4e6543002",
                    "workspace_name": "Platform",
                    "is_read": false,
                    "reaction": "pending"
                },
                {
                    "notification_id": "16fd2706-8baf-433b-82eb-8c7fada847da",
                    "is_read": true,
                    "message_content": "Task moved to done"
                }
            ]
        }
    }));

    assert_eq!(list.unread_count(), 1);
    let pending: Vec<_> = list.notifications.iter().filter(|n| n.awaits_reaction()).collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].workspace_name.as_deref(), Some("Platform"));
}

#[test]
fn failed_envelope_surfaces_server_message() {
    let rejection = Envelope::open(json!({
        "success": false,
        "message": "You are not a member of this workspace"
    }))
    .unwrap_err();

    assert_eq!(rejection.message, "You are not a member of this workspace");
    assert_eq!(rejection.payload, None);
}
