//! Browser form bodies for the admin console and their conversion into API payloads.

use serde::Deserialize;

use crate::content;
use crate::models::{Book, BookPayload, BookType, Post, PostPayload};

pub const POST_FIELDS_REQUIRED: &str = "Title and content are required.";
pub const BOOK_FIELDS_REQUIRED: &str = "Title and Buy Link are required.";

/// LoginForm
///
/// The password is only forwarded to the auth API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// PostForm
///
/// Editor fields. `action` is the button that submitted the form:
/// `publish` or `draft`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: String,
    pub cover_image: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub action: String,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            category: post.category.clone().unwrap_or_default(),
            tags: post.tags.clone().unwrap_or_default(),
            cover_image: post.cover_image.clone().unwrap_or_default(),
            meta_title: post.meta_title.clone().unwrap_or_default(),
            meta_desc: post.meta_desc.clone().unwrap_or_default(),
            action: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(POST_FIELDS_REQUIRED);
        }
        Ok(())
    }

    pub fn publish(&self) -> bool {
        self.action == "publish"
    }

    /// into_payload
    ///
    /// New posts get a slug generated from the title when the slug field was
    /// left blank. Existing posts keep whatever slug was submitted.
    pub fn into_payload(self, generate_slug: bool) -> PostPayload {
        let is_published = self.publish();
        let slug = if generate_slug && self.slug.trim().is_empty() {
            content::slugify(&self.title)
        } else {
            self.slug
        };

        PostPayload {
            title: self.title,
            slug,
            content: self.content,
            excerpt: self.excerpt,
            category: self.category,
            tags: self.tags,
            cover_image: self.cover_image,
            is_published,
            meta_title: self.meta_title,
            meta_desc: self.meta_desc,
        }
    }
}

/// CategoryOption
///
/// One `<option>` of the editor's category select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn category_options(selected: &str) -> Vec<CategoryOption> {
    content::CATEGORIES
        .iter()
        .map(|&(value, label)| CategoryOption {
            value,
            label,
            selected: value == selected,
        })
        .collect()
}

/// BookForm
///
/// `is_featured` is an HTML checkbox: present (`on`) when ticked, absent otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub price: String,
    pub buy_link: String,
    pub book_type: String,
    pub is_featured: Option<String>,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone().unwrap_or_default(),
            description: book.description.clone().unwrap_or_default(),
            cover_image: book.cover_image.clone().unwrap_or_default(),
            price: book.price.map(|p| p.to_string()).unwrap_or_default(),
            buy_link: book.buy_link.clone(),
            book_type: book.book_type.as_str().to_string(),
            is_featured: book.is_featured.then(|| "on".to_string()),
        }
    }

    pub fn featured(&self) -> bool {
        self.is_featured.is_some()
    }

    pub fn is_affiliate(&self) -> bool {
        self.book_type == BookType::Affiliate.as_str()
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() || self.buy_link.trim().is_empty() {
            return Err(BOOK_FIELDS_REQUIRED);
        }
        Ok(())
    }

    pub fn to_payload(&self) -> BookPayload {
        BookPayload {
            title: self.title.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            cover_image: self.cover_image.clone(),
            price: content::parse_price(&self.price),
            buy_link: self.buy_link.clone(),
            book_type: BookType::parse(&self.book_type).unwrap_or_default(),
            is_featured: self.featured(),
        }
    }
}
