use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::access::{self, CREDENTIAL_COOKIE, DASHBOARD_PATH, LOGIN_PATH};

/// Gate
///
/// Outcome of the edge check for a single navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Serve the requested page.
    Allow,
    /// Answer with a redirect to the given path instead of rendering.
    Redirect(&'static str),
}

/// gate
///
/// The decision table for admin navigation. Pure and stateless: the same
/// `(path, credential_present)` pair always yields the same answer.
///
/// | admin-scoped | login page | credential | result              |
/// |--------------|------------|------------|---------------------|
/// | yes          | no         | no         | redirect to login   |
/// | yes          | no         | yes        | allow               |
/// | yes          | yes        | yes        | redirect to dashboard |
/// | yes          | yes        | no         | allow               |
/// | no           | -          | -          | allow               |
pub fn gate(path: &str, credential_present: bool) -> Gate {
    if !access::is_admin_path(path) {
        return Gate::Allow;
    }

    match (access::is_login_path(path), credential_present) {
        (false, false) => Gate::Redirect(LOGIN_PATH),
        (true, true) => Gate::Redirect(DASHBOARD_PATH),
        _ => Gate::Allow,
    }
}

/// credential_present
///
/// The gatekeeper only checks that a non-empty credential cookie exists.
/// Whether the token is still valid is for the external API to decide.
pub fn credential_present(jar: &CookieJar) -> bool {
    jar.get(CREDENTIAL_COOKIE)
        .is_some_and(|cookie| !cookie.value().is_empty())
}

/// gatekeeper
///
/// Router-wide middleware that applies [`gate`] before any handler runs.
/// Redirects are `303 See Other`: the browser follows with a plain GET and
/// never resends an admin form body to the login or dashboard page.
pub async fn gatekeeper(
    jar: CookieJar,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    let decision = gate(uri.path(), credential_present(&jar));

    match decision {
        Gate::Allow => next.run(request).await,
        Gate::Redirect(target) => {
            tracing::debug!(
                path = %uri.path(),
                redirect_to = target,
                "Gatekeeper redirecting navigation"
            );
            Redirect::to(target).into_response()
        }
    }
}
