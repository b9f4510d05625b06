use chrono::{DateTime, NaiveDateTime};

use crate::models::{Book, BookType, Post};

/// Post categories, as `(value, label)`.
pub const CATEGORIES: [(&str, &str); 4] = [
    ("poem", "Poems"),
    ("letter", "Letters"),
    ("story", "Stories"),
    ("reflection", "Reflections"),
];

/// Posts per page on the public blog listing.
pub const POSTS_PER_PAGE: u32 = 9;

/// Latest posts shown on the home page.
pub const HOME_POSTS: u32 = 3;

/// Featured books shown on the home page.
pub const HOME_BOOKS: usize = 3;

/// Recent posts shown on the admin dashboard.
pub const DASHBOARD_RECENT_POSTS: usize = 5;

pub fn is_category(value: &str) -> bool {
    CATEGORIES.iter().any(|(v, _)| *v == value)
}

/// slugify
///
/// Lowercases the title, keeps only ASCII letters, digits, whitespace and
/// hyphens, turns whitespace runs into a single hyphen, collapses repeated
/// hyphens and strips them from both ends.
///
/// `"Letters to   Nobody!!"` becomes `"letters-to-nobody"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

/// PageLink
///
/// One numbered link of the blog pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Zero-based page index, as sent to the API.
    pub index: u32,
    /// One-based label shown to readers.
    pub label: u32,
    pub href: String,
    pub current: bool,
}

/// page_links
///
/// Links for pages `0..total_pages`, keeping the category filter. Nothing is
/// rendered for a single page.
pub fn page_links(total_pages: u32, current: u32, category: &str) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }

    (0..total_pages)
        .map(|index| {
            let href = if category.is_empty() {
                format!("/blog?page={index}")
            } else {
                format!("/blog?category={category}&page={index}")
            };
            PageLink {
                index,
                label: index + 1,
                href,
                current: index == current,
            }
        })
        .collect()
}

/// Case-insensitive title search used by the admin post list.
pub fn filter_by_title(posts: Vec<Post>, search: &str) -> Vec<Post> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return posts;
    }

    posts
        .into_iter()
        .filter(|post| post.title.to_lowercase().contains(&needle))
        .collect()
}

/// Splits a shelf into the author's own books and affiliate recommendations,
/// keeping the API's order inside each group.
pub fn split_books(books: Vec<Book>) -> (Vec<Book>, Vec<Book>) {
    books
        .into_iter()
        .partition(|book| book.book_type == BookType::Own)
}

/// A price field that does not parse as a number means "no price".
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// `"2024-03-07T10:15:00"` becomes `"Mar 7, 2024"`. Unparsable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Same as [`format_date`] with the full month name.
pub fn format_long_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
