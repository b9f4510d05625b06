use axum::{
    Extension, Form, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    access::{DASHBOARD_PATH, LOGIN_PATH},
    api::{ApiClient, ApiError},
    content::{self, DASHBOARD_RECENT_POSTS},
    forms::{self, BookForm, LoginForm, PostForm},
    login::{LoginFlow, LoginPhase},
    models::BookType,
    session::Session,
    templates::{
        BooksAdminTemplate, DashboardTemplate, EditorTemplate, LoginTemplate, NotFoundTemplate,
        PostsTemplate, render, render_with_status,
    },
};

const POSTS_PATH: &str = "/admin/posts";
const BOOKS_PATH: &str = "/admin/books";

const POST_UPDATED_MESSAGE: &str = "Post updated successfully!";
const SAVE_FALLBACK_MESSAGE: &str = "Something went wrong.";
const DELETE_POST_FAILED: &str = "Failed to delete post.";
const SAVE_BOOK_FAILED: &str = "Failed to save book.";
const DELETE_BOOK_FAILED: &str = "Failed to delete.";
const UPLOAD_FAILED: &str = "Image upload failed.";

// --- Query Structs ---

#[derive(Debug, Default, Deserialize)]
pub struct PostSearch {
    #[serde(default)]
    pub search: String,
}

/// BookEdit
///
/// `?edit={id}` preloads the book form. Ids that do not parse or are not on
/// the shelf are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BookEdit {
    pub edit: Option<String>,
}

// --- Login & Logout ---

/// login_page
///
/// The gatekeeper already sent visitors holding a credential to the dashboard,
/// so this always renders an empty form.
pub async fn login_page() -> Response {
    render(&LoginTemplate {
        email: String::new(),
        error: None,
        can_submit: true,
    })
}

/// login_submit
///
/// Runs one [`LoginFlow`] attempt. Success stores the credential in the
/// session (the session middleware turns it into the `admin_token` cookie)
/// and navigates to the dashboard. Failure re-renders the form with the
/// email kept and the password field empty.
pub async fn login_submit(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> Response {
    let api = api.with_session(session.clone());
    let mut flow = LoginFlow::new(form.email, form.password);

    if flow.submit(&api, &session).await == LoginPhase::Succeeded {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    render(&LoginTemplate {
        email: flow.email().to_string(),
        error: flow.error().map(str::to_string),
        can_submit: flow.can_submit(),
    })
}

/// logout
///
/// Clears the credential; the session middleware removes the cookie on the
/// same response.
pub async fn logout(Extension(session): Extension<Session>) -> Response {
    session.clear().await;
    session.navigate(LOGIN_PATH).await;
    info!("Admin logged out");
    Redirect::to(LOGIN_PATH).into_response()
}

pub async fn admin_index() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

// --- Dashboard ---

/// dashboard
///
/// Stats and posts are fetched concurrently. Failures render zeroes and an
/// empty list; a rejected credential is handled by the session guard.
pub async fn dashboard(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
) -> Response {
    let api = api.with_session(session);
    let (stats, posts) = tokio::join!(api.dashboard_stats(), api.admin_posts());

    let stats = stats.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load dashboard stats");
        Default::default()
    });
    let mut recent_posts = posts.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load posts for dashboard");
        Vec::new()
    });
    recent_posts.truncate(DASHBOARD_RECENT_POSTS);

    render(&DashboardTemplate {
        stats,
        recent_posts,
    })
}

// --- Posts ---

async fn render_posts(api: &ApiClient, search: String, error: Option<String>) -> Response {
    let posts = api.admin_posts().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load admin posts");
        Vec::new()
    });

    render(&PostsTemplate {
        posts: content::filter_by_title(posts, &search),
        search,
        error,
    })
}

pub async fn list_posts(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Query(query): Query<PostSearch>,
) -> Response {
    let api = api.with_session(session);
    render_posts(&api, query.search, None).await
}

pub async fn delete_post(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Response {
    let api = api.with_session(session);

    match api.delete_post(id).await {
        Ok(()) => {
            info!(post_id = id, "Post deleted");
            Redirect::to(POSTS_PATH).into_response()
        }
        Err(e) => {
            warn!(error = %e, post_id = id, "Failed to delete post");
            render_posts(&api, String::new(), Some(DELETE_POST_FAILED.to_string())).await
        }
    }
}

fn render_editor(post_id: Option<i64>, form: PostForm, message: Option<(String, bool)>) -> Response {
    let (message, is_error) = match message {
        Some((text, is_error)) => (Some(text), is_error),
        None => (None, false),
    };

    render(&EditorTemplate {
        post_id,
        categories: forms::category_options(&form.category),
        form,
        message,
        is_error,
    })
}

fn save_error(e: &ApiError) -> (String, bool) {
    (format!("Error: {}", e.user_message(SAVE_FALLBACK_MESSAGE)), true)
}

pub async fn new_post() -> Response {
    render_editor(None, PostForm::default(), None)
}

/// create_post
///
/// Blank title or content blocks the save without calling the API. A blank
/// slug is generated from the title.
pub async fn create_post(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(form): Form<PostForm>,
) -> Response {
    if let Err(message) = form.validate() {
        return render_editor(None, form, Some((message.to_string(), true)));
    }

    let api = api.with_session(session);
    let payload = form.clone().into_payload(true);

    match api.create_post(&payload).await {
        Ok(()) => {
            info!(slug = %payload.slug, published = payload.is_published, "Post created");
            Redirect::to(POSTS_PATH).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to create post");
            render_editor(None, form, Some(save_error(&e)))
        }
    }
}

pub async fn edit_post(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Response {
    let api = api.with_session(session);

    match api.admin_post(id).await {
        Ok(post) => render_editor(Some(id), PostForm::from_post(&post), None),
        Err(e) => {
            warn!(error = %e, post_id = id, "Failed to load post for editing");
            render_with_status(
                StatusCode::NOT_FOUND,
                &NotFoundTemplate {
                    message: "Post not found.".to_string(),
                },
            )
        }
    }
}

pub async fn update_post(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Response {
    if let Err(message) = form.validate() {
        return render_editor(Some(id), form, Some((message.to_string(), true)));
    }

    let api = api.with_session(session);
    let payload = form.clone().into_payload(false);

    let message = match api.update_post(id, &payload).await {
        Ok(()) => {
            info!(post_id = id, published = payload.is_published, "Post updated");
            (POST_UPDATED_MESSAGE.to_string(), false)
        }
        Err(e) => {
            warn!(error = %e, post_id = id, "Failed to update post");
            save_error(&e)
        }
    };

    render_editor(Some(id), form, Some(message))
}

// --- Books ---

async fn render_books(
    api: &ApiClient,
    form: BookForm,
    editing: Option<i64>,
    error: Option<String>,
) -> Response {
    let books = api.admin_books().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load admin books");
        Vec::new()
    });

    render(&BooksAdminTemplate {
        books,
        form,
        editing,
        error,
    })
}

fn empty_book_form() -> BookForm {
    BookForm {
        book_type: BookType::Own.as_str().to_string(),
        ..BookForm::default()
    }
}

pub async fn list_books(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Query(query): Query<BookEdit>,
) -> Response {
    let api = api.with_session(session);
    let books = api.admin_books().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load admin books");
        Vec::new()
    });

    let edit_id = query.edit.as_deref().and_then(|id| id.trim().parse::<i64>().ok());
    let editing = edit_id.and_then(|id| books.iter().find(|book| book.id == id));

    let (form, editing) = match editing {
        Some(book) => (BookForm::from_book(book), Some(book.id)),
        None => (empty_book_form(), None),
    };

    render(&BooksAdminTemplate {
        books,
        form,
        editing,
        error: None,
    })
}

/// save_book
///
/// Shared by create (`id` is `None`) and update. Invalid input and API failures
/// re-render the form with its values kept.
async fn save_book(api: ApiClient, id: Option<i64>, form: BookForm) -> Response {
    if let Err(message) = form.validate() {
        return render_books(&api, form, id, Some(message.to_string())).await;
    }

    let payload = form.to_payload();
    let result = match id {
        Some(id) => api.update_book(id, &payload).await,
        None => api.create_book(&payload).await,
    };

    match result {
        Ok(()) => {
            info!(book_id = ?id, "Book saved");
            Redirect::to(BOOKS_PATH).into_response()
        }
        Err(e) => {
            warn!(error = %e, book_id = ?id, "Failed to save book");
            render_books(&api, form, id, Some(SAVE_BOOK_FAILED.to_string())).await
        }
    }
}

pub async fn create_book(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Form(form): Form<BookForm>,
) -> Response {
    save_book(api.with_session(session), None, form).await
}

pub async fn update_book(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> Response {
    save_book(api.with_session(session), Some(id), form).await
}

pub async fn delete_book(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Response {
    let api = api.with_session(session);

    match api.delete_book(id).await {
        Ok(()) => {
            info!(book_id = id, "Book deleted");
            Redirect::to(BOOKS_PATH).into_response()
        }
        Err(e) => {
            warn!(error = %e, book_id = id, "Failed to delete book");
            render_books(
                &api,
                empty_book_form(),
                None,
                Some(DELETE_BOOK_FAILED.to_string()),
            )
            .await
        }
    }
}

// --- Upload ---

/// upload_image
///
/// Proxies the multipart `file` field to the content API and answers with the
/// stored image's URL as JSON.
pub async fn upload_image(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> Response {
    let api = api.with_session(session);

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed upload body");
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.body_text() })))
                    .into_response();
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, content_type, bytes.to_vec())),
            Err(e) => {
                warn!(error = %e, "Failed to read uploaded file");
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.body_text() })))
                    .into_response();
            }
        }
        break;
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No file provided." })),
        )
            .into_response();
    };

    match api.upload_image(file_name, content_type, bytes).await {
        Ok(uploaded) => Json(uploaded).into_response(),
        Err(e @ ApiError::InvalidRequest(_)) => {
            warn!(error = %e, "Upload rejected before forwarding");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": UPLOAD_FAILED }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Image upload failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": UPLOAD_FAILED }))).into_response()
        }
    }
}
