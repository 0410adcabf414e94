//! Role name constants shared by the auth middleware and user directory.

/// Administrators: triage, batch-update, sweep, purge, settings.
pub const ROLE_ADMIN: &str = "admin";

/// Regular users: submit and view their own requests.
pub const ROLE_USER: &str = "user";
