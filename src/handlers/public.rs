use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::{
    api::{ApiClient, ApiError},
    content::{self, CATEGORIES, HOME_BOOKS, HOME_POSTS, POSTS_PER_PAGE},
    models::{BookType, PageResponse},
    templates::{
        AboutTemplate, BlogTemplate, BooksTemplate, FilterLink, HomeTemplate, NotFoundTemplate,
        PostTemplate, render, render_with_status,
    },
};

// --- Query Structs ---

/// BlogFilter
///
/// Query parameters of GET /blog. `page` is zero-based and parsed leniently:
/// anything that is not a number falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct BlogFilter {
    pub category: Option<String>,
    pub page: Option<String>,
    pub q: Option<String>,
}

impl BlogFilter {
    fn category(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| content::is_category(c))
            .unwrap_or("")
    }

    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(0)
    }

    fn query(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }
}

/// BookFilter
///
/// Query parameters of GET /books. An unknown `type` shows the whole shelf.
#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    #[serde(rename = "type")]
    pub book_type: Option<String>,
}

// --- Handlers ---

/// home
///
/// Latest posts and featured books, fetched concurrently. Either call failing
/// leaves its section empty.
pub async fn home(State(api): State<ApiClient>) -> Response {
    let (posts, books) = tokio::join!(api.posts(0, HOME_POSTS, None), api.featured_books());

    let posts = posts
        .map(|page| page.content)
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load latest posts");
            Vec::new()
        });
    let mut books = books.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load featured books");
        Vec::new()
    });
    books.truncate(HOME_BOOKS);

    render(&HomeTemplate { posts, books })
}

/// blog
///
/// Paginated listing with an optional category filter. A non-empty `q` goes
/// through the search endpoint instead; search results are not paginated
/// through the category links.
pub async fn blog(State(api): State<ApiClient>, Query(filter): Query<BlogFilter>) -> Response {
    let category = filter.category().to_string();
    let query = filter.query().to_string();
    let page = filter.page();

    let result = if query.is_empty() {
        let category = (!category.is_empty()).then_some(category.as_str());
        api.posts(page, POSTS_PER_PAGE, category).await
    } else {
        api.search_posts(&query, page).await
    };

    let listing = result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load blog listing");
        PageResponse::empty(POSTS_PER_PAGE)
    });

    let pages = if query.is_empty() {
        content::page_links(listing.total_pages, listing.number, &category)
    } else {
        Vec::new()
    };

    render(&BlogTemplate {
        posts: listing.content,
        filters: category_filters(&category),
        pages,
        category,
        query,
    })
}

fn category_filters(active: &str) -> Vec<FilterLink> {
    let all = FilterLink {
        label: "All",
        href: "/blog".to_string(),
        active: active.is_empty(),
    };

    std::iter::once(all)
        .chain(CATEGORIES.iter().map(|&(value, label)| FilterLink {
            label,
            href: format!("/blog?category={value}"),
            active: value == active,
        }))
        .collect()
}

/// blog_post
///
/// A single post with its related posts. A missing post is a 404 page; it never
/// redirects.
pub async fn blog_post(State(api): State<ApiClient>, Path(slug): Path<String>) -> Response {
    let (post, related) = tokio::join!(api.post_by_slug(&slug), api.related_posts(&slug));

    let post = match post {
        Ok(post) => post,
        Err(ApiError::NotFound) => return post_not_found(),
        Err(e) => {
            error!(error = %e, slug = %slug, "Failed to load post");
            return post_not_found();
        }
    };

    let related = related.unwrap_or_else(|e| {
        warn!(error = %e, slug = %slug, "Failed to load related posts");
        Vec::new()
    });

    render(&PostTemplate { post, related })
}

fn post_not_found() -> Response {
    render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            message: "This letter was never found.".to_string(),
        },
    )
}

/// books
///
/// The shelf, split into the author's own books and affiliate picks.
pub async fn books(State(api): State<ApiClient>, Query(filter): Query<BookFilter>) -> Response {
    let book_type = filter.book_type.as_deref().and_then(BookType::parse);

    let shelf = api.books(book_type).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load books");
        Vec::new()
    });
    let (own, affiliate) = content::split_books(shelf);

    render(&BooksTemplate {
        tabs: book_tabs(book_type),
        own,
        affiliate,
    })
}

fn book_tabs(active: Option<BookType>) -> Vec<FilterLink> {
    vec![
        FilterLink {
            label: "All",
            href: "/books".to_string(),
            active: active.is_none(),
        },
        FilterLink {
            label: "My Books",
            href: "/books?type=own".to_string(),
            active: active == Some(BookType::Own),
        },
        FilterLink {
            label: "Recommended",
            href: "/books?type=affiliate".to_string(),
            active: active == Some(BookType::Affiliate),
        },
    ]
}

pub async fn about() -> Response {
    render(&AboutTemplate)
}

/// health_check
///
/// Liveness probe. Does not touch the content API.
pub async fn health_check() -> &'static str {
    "ok"
}

/// not_found
///
/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            message: "This page never arrived.".to_string(),
        },
    )
}
