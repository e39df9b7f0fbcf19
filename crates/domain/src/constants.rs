//! Application constants
//!
//! Centralized location for wire-level names shared by every Kanflow crate.

/// Cookie-style key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Cookie-style key holding the refresh token (never sent as a bearer header).
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Scope of both credential entries.
pub const CREDENTIAL_PATH: &str = "/";

// HTTP defaults
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "kanflow";
pub const DEFAULT_CREDENTIAL_FILE: &str = "kanflow-credentials.json";

/// Paths reachable without an access token.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/register"];

/// Server message signalling that the refresh token is no longer usable.
pub const REFRESH_EXPIRED_MESSAGE: &str = "Refresh token expired";

/// Backend endpoint paths, relative to the API root.
pub mod endpoints {
    // Users
    pub const REGISTER: &str = "/user/register";
    pub const LOGIN: &str = "/user/login";
    pub const REFRESH: &str = "/user/refresh";
    pub const ME: &str = "/user/me";
    pub const LOGOUT: &str = "/user/logout";

    // Workspaces
    pub const CREATE_WORKSPACE: &str = "/workspace/create_workspace";
    pub const GET_WORKSPACE: &str = "/workspace/get_workspace";
    pub const GET_ALL_WORKSPACES: &str = "/workspace/get_all_workspaces";
    pub const CHECK_PRIVILEGE: &str = "/workspace/check_privilege";
    pub const UPDATE_WORKSPACE_NAME: &str = "/workspace/update_workspace_name";

    // Tasks
    pub const CREATE_TASK: &str = "/tasks/create_task";
    pub const UPDATE_TASK: &str = "/tasks/update_task";
    pub const DELETE_TASK: &str = "/tasks/delete_task";
    pub const GET_ALL_TASKS: &str = "/tasks/get_all_tasks";
    pub const TASK_DETAIL: &str = "/tasks/detail_task";

    // Team
    pub const ALL_TEAM_MEMBERS: &str = "/team/all_team_members";
    pub const SEND_INVITE: &str = "/team/send_invite";
    pub const CHANGE_PRIVILEGE: &str = "/team/change_privilege";
    pub const REMOVE_MEMBER: &str = "/team/remove_member";

    // Notifications
    pub const GET_ALL_NOTIFICATIONS: &str = "/notifications/get_all_notfications";
    pub const MARK_NOTIFICATION_READ: &str = "/notifications/mark_notification_read";
    pub const ACCEPT_REJECT_INVITE: &str = "/notifications/accept_reject_workspace_invite";
}
