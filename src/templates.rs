//! Askama templates for the public site and the admin console.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::content::PageLink;
use crate::forms::{BookForm, CategoryOption, PostForm};
use crate::models::{Book, DashboardStats, Post};

/// Renders `template` as an HTML response with the given status. A template
/// failure is logged and turned into a bare 500.
pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

pub fn render<T: Template>(template: &T) -> Response {
    render_with_status(StatusCode::OK, template)
}

/// FilterLink
///
/// A pill of the blog category bar or the bookshelf tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

// --- Public Site ---

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub posts: Vec<Post>,
    pub books: Vec<Book>,
}

/// Blog listing. `query` is the free-text search, `category` the active filter
/// (both empty when unused).
#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub posts: Vec<Post>,
    pub filters: Vec<FilterLink>,
    pub pages: Vec<PageLink>,
    pub category: String,
    pub query: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub post: Post,
    pub related: Vec<Post>,
}

#[derive(Template)]
#[template(path = "books.html")]
pub struct BooksTemplate {
    pub tabs: Vec<FilterLink>,
    pub own: Vec<Book>,
    pub affiliate: Vec<Book>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate;

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

// --- Admin Console ---

/// Login page. The submit button is disabled while `can_submit` is false.
/// The password is never rendered back; the field is always empty.
#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub can_submit: bool,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub stats: DashboardStats,
    pub recent_posts: Vec<Post>,
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct PostsTemplate {
    pub posts: Vec<Post>,
    pub search: String,
    pub error: Option<String>,
}

/// Post editor, shared by the create and edit pages.
#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    pub post_id: Option<i64>,
    pub form: PostForm,
    pub categories: Vec<CategoryOption>,
    pub message: Option<String>,
    pub is_error: bool,
}

impl EditorTemplate {
    pub fn heading(&self) -> &'static str {
        if self.post_id.is_some() { "Edit Post" } else { "New Post" }
    }

    pub fn action(&self) -> String {
        match self.post_id {
            Some(id) => format!("/admin/posts/edit/{id}"),
            None => "/admin/posts".to_string(),
        }
    }
}

/// Book management: the shelf plus a create/edit form.
#[derive(Template)]
#[template(path = "admin/books.html")]
pub struct BooksAdminTemplate {
    pub books: Vec<Book>,
    pub form: BookForm,
    pub editing: Option<i64>,
    pub error: Option<String>,
}

impl BooksAdminTemplate {
    pub fn action(&self) -> String {
        match self.editing {
            Some(id) => format!("/admin/books/{id}"),
            None => "/admin/books".to_string(),
        }
    }
}
