// --- Admin Area Contract ---

// Shared by the edge gatekeeper and the API client's session guard, so the two
// interception points can never disagree about what counts as an admin page.

/// Every navigable path starting with this prefix belongs to the admin console.
pub const ADMIN_PREFIX: &str = "/admin";

/// The one admin path that is served without a credential.
pub const LOGIN_PATH: &str = "/admin/login";

/// Landing page after a successful login.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Name of the cookie holding the admin bearer credential.
pub const CREDENTIAL_COOKIE: &str = "admin_token";

/// Lifetime of the credential cookie, in days.
pub const CREDENTIAL_TTL_DAYS: i64 = 1;

/// is_admin_path
///
/// A path is admin-scoped iff it starts with `/admin`. This is a plain prefix
/// match, so `/administrator` is admin-scoped as well.
pub fn is_admin_path(path: &str) -> bool {
    path.starts_with(ADMIN_PREFIX)
}

/// is_login_path
///
/// Exact match only; `/admin/login/` is not the login page.
pub fn is_login_path(path: &str) -> bool {
    path == LOGIN_PATH
}

/// requires_credential
///
/// Admin-scoped and not the login page. Both the gatekeeper (missing cookie)
/// and the session guard (401 from the API) act only on these paths.
pub fn requires_credential(path: &str) -> bool {
    is_admin_path(path) && !is_login_path(path)
}
