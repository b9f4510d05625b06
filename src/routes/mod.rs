/// Router Module Index
///
/// Splits the site into its two audiences. Access control is applied at the
/// module level (via Axum layers), never inside individual handlers.

/// The reader-facing site. Never intercepted, never carries a credential.
pub mod public;

/// The admin console under `/admin`, wrapped in the session middleware.
pub mod admin;
