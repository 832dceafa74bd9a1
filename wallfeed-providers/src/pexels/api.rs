//! Pexels API endpoints and response schema.

use serde::Deserialize;
use wallfeed_core::Page;
use wallfeed_fetch::Request;

// ============================================================================
// Constants
// ============================================================================

/// Pexels API base URL.
const API_BASE: &str = "https://api.pexels.com/v1";

/// Curated pages sampled for random picks.
pub const RANDOM_PAGE_SPAN: u32 = 50;

/// Filters `/search` understands.
pub const SEARCH_FILTERS: &[&str] = &["orientation", "size", "color", "locale"];

// ============================================================================
// Requests
// ============================================================================

fn request(path: &str, api_key: &str) -> Request {
    Request::get(format!("{API_BASE}{path}")).header("Authorization", api_key)
}

fn paged(path: &str, api_key: &str, page: Page) -> Request {
    request(path, api_key)
        .query("page", page.page)
        .query("per_page", page.per_page)
}

pub fn curated(api_key: &str, page: Page) -> Request {
    paged("/curated", api_key, page)
}

pub fn search(api_key: &str, query: &str, page: Page) -> Request {
    paged("/search", api_key, page).query("query", query)
}

pub fn photo(api_key: &str, id: &str) -> Request {
    request(&format!("/photos/{id}"), api_key)
}

pub fn featured_collections(api_key: &str, page: Page) -> Request {
    paged("/collections/featured", api_key, page)
}

pub fn collection_media(api_key: &str, collection_id: &str, page: Page) -> Request {
    paged(&format!("/collections/{collection_id}"), api_key, page).query("type", "photos")
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsPhoto {
    pub id: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Photo page on pexels.com.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub photographer_url: Option<String>,
    #[serde(default)]
    pub avg_color: Option<String>,
    #[serde(default)]
    pub src: PexelsSources,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsSources {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub large2x: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
}

/// `/curated` and `/search` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsPhotoPage {
    #[serde(default)]
    pub photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsCollection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photos_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsCollectionPage {
    #[serde(default)]
    pub collections: Vec<PexelsCollection>,
}

/// `/collections/{id}` envelope. Only photo media is requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsMediaPage {
    #[serde(default)]
    pub media: Vec<PexelsPhoto>,
}
