//! Per-request admin session.
//!
//! A [`Session`] is the explicit credential slot handed to the API client. It is
//! loaded from the `admin_token` cookie when a request enters the admin router,
//! may be activated (login) or cleared (logout, rejected credential) while the
//! handler runs, and is written back to the cookie jar on the way out.

use std::{fmt, sync::Arc};

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::access::{CREDENTIAL_COOKIE, CREDENTIAL_TTL_DAYS};

/// Opaque bearer token issued by the external auth API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header and the cookie value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where a session stands after `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Cleared,
}

#[derive(Debug, Default)]
struct Slot {
    credential: Option<Credential>,
    navigation: Option<&'static str>,
}

#[derive(Debug)]
struct Inner {
    location: String,
    loaded: Option<Credential>,
    slot: RwLock<Slot>,
}

/// Session
///
/// Shared handle to one request's credential slot. Clones point at the same
/// slot, so a credential cleared through the API client is immediately gone
/// for the handler and for the cookie write-back as well. Writes are
/// last-write-wins.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// init: a session for the page at `location`, seeded with the credential
    /// the browser sent (if any).
    pub fn load(location: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            inner: Arc::new(Inner {
                location: location.into(),
                loaded: credential.clone(),
                slot: RwLock::new(Slot {
                    credential,
                    navigation: None,
                }),
            }),
        }
    }

    /// Reads the credential cookie. An empty cookie value counts as no credential.
    pub fn from_cookies(jar: &CookieJar, location: impl Into<String>) -> Self {
        let credential = jar
            .get(CREDENTIAL_COOKIE)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
            .map(Credential::new);

        Self::load(location, credential)
    }

    /// Path of the page this session was loaded for.
    pub fn location(&self) -> &str {
        &self.inner.location
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.inner.slot.read().await.credential.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        if self.inner.slot.read().await.credential.is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::Cleared
        }
    }

    /// Stores a freshly issued credential.
    pub async fn activate(&self, credential: Credential) {
        self.inner.slot.write().await.credential = Some(credential);
    }

    /// Drops the credential (logout or rejection).
    pub async fn clear(&self) {
        self.inner.slot.write().await.credential = None;
    }

    /// Requests a full-page navigation that replaces whatever the handler renders.
    pub async fn navigate(&self, target: &'static str) {
        self.inner.slot.write().await.navigation = Some(target);
    }

    pub async fn navigation(&self) -> Option<&'static str> {
        self.inner.slot.read().await.navigation
    }

    /// persist
    ///
    /// Mirrors credential changes made during the request into the cookie jar:
    /// a new credential sets the cookie, a cleared one removes it, and an
    /// untouched session leaves the jar as it was.
    pub async fn persist(&self, jar: CookieJar) -> CookieJar {
        let current = self.credential().await;
        if current == self.inner.loaded {
            return jar;
        }

        match current {
            Some(credential) => jar.add(credential_cookie(&credential)),
            None => jar.remove(Cookie::build(CREDENTIAL_COOKIE).path("/").build()),
        }
    }
}

/// credential_cookie
///
/// `admin_token` with a one day lifetime and `SameSite=Strict`. Not
/// `HttpOnly`: page scripts read it too.
pub fn credential_cookie(credential: &Credential) -> Cookie<'static> {
    let ttl = Duration::days(CREDENTIAL_TTL_DAYS);

    Cookie::build((CREDENTIAL_COOKIE, credential.expose().to_owned()))
        .path("/")
        .max_age(ttl)
        .expires(OffsetDateTime::now_utc() + ttl)
        .same_site(SameSite::Strict)
        .http_only(false)
        .build()
}

/// session_guard
///
/// Admin router middleware. Loads the [`Session`] for the requested page,
/// hands it to the handler through request extensions, then persists it.
/// A navigation requested during the request (the API client does this on
/// 401) replaces the handler's response with a `303` to that target. The
/// cookie removal travels on the same response, so the next page already sees
/// no credential.
pub async fn session_guard(
    jar: CookieJar,
    OriginalUri(uri): OriginalUri,
    mut request: Request,
    next: Next,
) -> Response {
    let session = Session::from_cookies(&jar, uri.path());
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    let jar = session.persist(jar).await;
    match session.navigation().await {
        Some(target) => (jar, Redirect::to(target)).into_response(),
        None => (jar, response).into_response(),
    }
}
