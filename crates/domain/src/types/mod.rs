//! Domain types and models
//!
//! Wire shapes of the Kanflow backend. Field names follow the backend's JSON
//! (a mix of camelCase and snake_case); Rust names are normalized with serde
//! renames.

pub mod envelope;
pub mod notification;
pub mod task;
pub mod team;
pub mod user;
pub mod workspace;

pub use envelope::{error_message, Envelope, Rejection};
pub use notification::{Notification, NotificationList};
pub use task::{NewTask, Task, TaskBoard, TaskList, TaskPriority, TaskStatus, TaskUpdate};
pub use team::{MemberInvite, MemberStatus, Privilege, TeamMember, TeamRoster};
pub use user::{AccessTokenPayload, Credentials, NewUser, User};
pub use workspace::{NewWorkspace, Workspace, WorkspaceId};
