use serde::{Deserialize, Serialize};

use crate::content;

// --- Content Schemas (Owned by the External API) ---

/// Post
///
/// A piece of writing as returned by the content API. Drafts are only visible
/// through the admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    // Rich-text HTML produced by the editor. Omitted by some list endpoints.
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    // One of `content::CATEGORIES`, or unset.
    pub category: Option<String>,
    // Comma-separated, free-form.
    pub tags: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub read_time: Option<u32>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Post {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn excerpt_text(&self) -> &str {
        self.excerpt.as_deref().unwrap_or("")
    }

    pub fn cover_image_url(&self) -> &str {
        self.cover_image.as_deref().unwrap_or("")
    }

    pub fn display_title(&self) -> &str {
        self.meta_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }

    pub fn display_date(&self) -> String {
        content::format_date(&self.created_at)
    }

    pub fn long_date(&self) -> String {
        content::format_long_date(&self.created_at)
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_published { "Published" } else { "Draft" }
    }
}

/// BookType
///
/// "own" books are written by the site's author; "affiliate" ones are
/// recommendations linked through an affiliate program.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    #[default]
    Own,
    Affiliate,
}

impl BookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::Own => "own",
            BookType::Affiliate => "affiliate",
        }
    }

    /// Lenient parse for query strings and form fields.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "own" => Some(BookType::Own),
            "affiliate" => Some(BookType::Affiliate),
            _ => None,
        }
    }
}

/// Book
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub buy_link: String,
    #[serde(default)]
    pub book_type: BookType,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: String,
}

impl Book {
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn cover_image_url(&self) -> &str {
        self.cover_image.as_deref().unwrap_or("")
    }

    pub fn price_label(&self) -> String {
        self.price.map(|p| format!("{p:.2}")).unwrap_or_default()
    }
}

/// PageResponse
///
/// Spring-style page envelope used by the paginated public listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

impl<T> PageResponse<T> {
    /// The empty page public views fall back to when the API is unavailable.
    pub fn empty(size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size,
        }
    }
}

/// DashboardStats
///
/// Counters for the admin dashboard (GET /api/admin/dashboard/stats).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_books: u64,
}

// --- Request Payloads ---

/// LoginRequest
///
/// Body of POST /api/auth/login. The password is forwarded and never logged.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// PostPayload
///
/// Create/update body for admin posts. Empty strings are sent as-is; the API
/// treats them as "unset".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: String,
    pub cover_image: String,
    pub is_published: bool,
    pub meta_title: String,
    pub meta_desc: String,
}

/// BookPayload
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    // `None` serialises as null, which the API stores as "no price".
    pub price: Option<f64>,
    pub buy_link: String,
    pub book_type: BookType,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub url: String,
}
