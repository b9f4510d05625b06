/// Handlers for the public site (anonymous, read-only, no credential attached).
pub mod public;

/// Handlers for the admin console. Every handler receives the request's
/// [`Session`](crate::session::Session) from the session middleware and talks
/// to the content API through a client bound to it.
pub mod admin;
