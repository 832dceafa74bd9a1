//! Pixabay API endpoints and response schema.

use serde::Deserialize;
use wallfeed_core::Page;
use wallfeed_fetch::Request;

// ============================================================================
// Constants
// ============================================================================

/// Pixabay API endpoint. Every query goes to the same URL.
const API_URL: &str = "https://pixabay.com/api/";

/// Pixabay rejects `per_page` below 3.
const MIN_PER_PAGE: u32 = 3;

/// Result pages sampled for random picks.
pub const RANDOM_PAGE_SPAN: u32 = 20;

/// Filters the search endpoint understands.
pub const SEARCH_FILTERS: &[&str] = &[
    "image_type",
    "orientation",
    "category",
    "colors",
    "min_width",
    "min_height",
    "order",
    "safesearch",
];

// ============================================================================
// Requests
// ============================================================================

fn request(api_key: &str) -> Request {
    Request::get(API_URL).query("key", api_key)
}

fn paged(api_key: &str, page: Page) -> Request {
    request(api_key)
        .query("page", page.page)
        .query("per_page", page.per_page.max(MIN_PER_PAGE))
}

pub fn editors_choice(api_key: &str, page: Page) -> Request {
    paged(api_key, page)
        .query("editors_choice", "true")
        .query("order", "popular")
        .query("image_type", "photo")
}

pub fn search(api_key: &str, query: &str, page: Page) -> Request {
    paged(api_key, page).query("q", query)
}

pub fn by_id(api_key: &str, id: &str) -> Request {
    request(api_key).query("id", id)
}

pub fn latest(api_key: &str, page: Page, category: Option<&str>) -> Request {
    paged(api_key, page)
        .query("order", "latest")
        .query("image_type", "photo")
        .query_opt("category", category)
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixabayHit {
    pub id: u64,
    #[serde(default, rename = "pageURL")]
    pub page_url: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default, rename = "previewURL")]
    pub preview_url: Option<String>,
    #[serde(default, rename = "webformatURL")]
    pub webformat_url: Option<String>,
    #[serde(default, rename = "largeImageURL")]
    pub large_image_url: Option<String>,
    #[serde(default)]
    pub image_width: Option<u32>,
    #[serde(default)]
    pub image_height: Option<u32>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, rename = "user_id")]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixabayResponse {
    #[serde(default)]
    pub hits: Vec<PixabayHit>,
}
