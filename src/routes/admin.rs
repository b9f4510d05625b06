use crate::{AppState, handlers::admin, session::session_guard};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

/// Largest image accepted by the upload proxy.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Admin Router Module
///
/// The management console, nested under `/admin`.
///
/// Access Control:
/// Requests only get here after the router-wide gatekeeper let them through,
/// i.e. with a credential cookie (or to the login page without one). The
/// `session_guard` layer then loads the request's `Session` from that cookie
/// and writes changes back: a login sets the cookie, a logout or a 401 from
/// the content API removes it and redirects to the login page.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        .route("/", get(admin::admin_index))
        // GET|POST /admin/login
        // The only admin page reachable without a credential.
        .route("/login", get(admin::login_page).post(admin::login_submit))
        // POST /admin/logout
        .route("/logout", post(admin::logout))
        // GET /admin/dashboard
        // Counters and the five most recent posts.
        .route("/dashboard", get(admin::dashboard))
        // GET /admin/posts?search=...
        // POST /admin/posts creates a post from the editor form.
        .route("/posts", get(admin::list_posts).post(admin::create_post))
        .route("/posts/new", get(admin::new_post))
        .route(
            "/posts/edit/{id}",
            get(admin::edit_post).post(admin::update_post),
        )
        .route("/posts/{id}/delete", post(admin::delete_post))
        // GET /admin/books?edit={id}
        .route("/books", get(admin::list_books).post(admin::create_book))
        .route("/books/{id}", post(admin::update_book))
        .route("/books/{id}/delete", post(admin::delete_book))
        // POST /admin/upload
        // Multipart image upload proxied to the content API. Answers JSON.
        .route(
            "/upload",
            post(admin::upload_image).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .layer(middleware::from_fn(session_guard))
}
