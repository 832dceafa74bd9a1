//! Unsplash API endpoints and response schema.

use serde::Deserialize;
use wallfeed_core::Page;
use wallfeed_fetch::Request;

// ============================================================================
// Constants
// ============================================================================

/// Unsplash API base URL.
pub const API_BASE: &str = "https://api.unsplash.com";

/// API version header value.
const API_VERSION: &str = "v1";

/// Unsplash caps `count` on `/photos/random`.
pub const MAX_RANDOM_COUNT: u32 = 30;

/// Filters `/search/photos` understands.
pub const SEARCH_FILTERS: &[&str] = &["orientation", "color", "order_by", "content_filter"];

// ============================================================================
// Requests
// ============================================================================

fn request(path: &str, access_key: &str) -> Request {
    Request::get(format!("{API_BASE}{path}"))
        .header("Authorization", format!("Client-ID {access_key}"))
        .header("Accept-Version", API_VERSION)
}

fn paged(path: &str, access_key: &str, page: Page) -> Request {
    request(path, access_key)
        .query("page", page.page)
        .query("per_page", page.per_page)
}

pub fn featured(access_key: &str, page: Page) -> Request {
    paged("/photos", access_key, page).query("order_by", "popular")
}

pub fn search(access_key: &str, query: &str, page: Page) -> Request {
    paged("/search/photos", access_key, page).query("query", query)
}

pub fn photo(access_key: &str, id: &str) -> Request {
    request(&format!("/photos/{id}"), access_key)
}

pub fn random(access_key: &str, count: u32, category: Option<&str>) -> Request {
    request("/photos/random", access_key)
        .query("count", count.clamp(1, MAX_RANDOM_COUNT))
        .query_opt("query", category)
}

pub fn collections(access_key: &str, page: Page) -> Request {
    paged("/collections", access_key, page)
}

pub fn collection_photos(access_key: &str, collection_id: &str, page: Page) -> Request {
    paged(&format!("/collections/{collection_id}/photos"), access_key, page)
}

/// Download tracking endpoint required by the Unsplash API guidelines.
pub fn download(access_key: &str, id: &str) -> Request {
    request(&format!("/photos/{id}/download"), access_key)
}

// ============================================================================
// Response Types
// ============================================================================

/// A photo as returned by every photo endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashPhoto {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub urls: UnsplashUrls,
    #[serde(default)]
    pub links: UnsplashLinks,
    #[serde(default)]
    pub user: Option<UnsplashUser>,
    #[serde(default)]
    pub tags: Vec<UnsplashTag>,
    /// Unsplash+ content.
    #[serde(default)]
    pub premium: Option<bool>,
    #[serde(default)]
    pub plus: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashUrls {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub regular: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashLinks {
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub links: UnsplashLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashTag {
    #[serde(default)]
    pub title: Option<String>,
}

/// `/search/photos` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashSearchResponse {
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashCollection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_photos: Option<u32>,
    #[serde(default)]
    pub cover_photo: Option<UnsplashPhoto>,
}

/// `/photos/{id}/download` response; only acknowledged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnsplashDownload {
    #[serde(default)]
    pub url: Option<String>,
}
