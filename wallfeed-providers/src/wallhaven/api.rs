//! Wallhaven API endpoints and response schema.

use serde::Deserialize;
use wallfeed_fetch::Request;

// ============================================================================
// Constants
// ============================================================================

/// Wallhaven API base URL.
const API_BASE: &str = "https://wallhaven.cc/api/v1";

/// Wallhaven always returns 24 results per page.
pub const PAGE_SIZE: u32 = 24;

/// Filters `/search` understands.
pub const SEARCH_FILTERS: &[&str] = &[
    "categories",
    "purity",
    "sorting",
    "order",
    "topRange",
    "atleast",
    "resolutions",
    "ratios",
    "colors",
];

// ============================================================================
// Requests
// ============================================================================

fn request(path: &str, api_key: Option<&str>) -> Request {
    let request = Request::get(format!("{API_BASE}{path}"));
    match api_key {
        Some(key) => request.header("X-API-Key", key),
        None => request,
    }
}

pub fn toplist(api_key: Option<&str>, page: u32) -> Request {
    request("/search", api_key)
        .query("sorting", "toplist")
        .query("page", page)
}

pub fn search(api_key: Option<&str>, query: &str, page: u32) -> Request {
    request("/search", api_key).query("q", query).query("page", page)
}

pub fn random(api_key: Option<&str>, category: Option<&str>) -> Request {
    request("/search", api_key)
        .query("sorting", "random")
        .query_opt("q", category)
}

pub fn wallpaper(api_key: Option<&str>, id: &str) -> Request {
    request(&format!("/w/{id}"), api_key)
}

/// Collections of the user owning `api_key`.
pub fn collections(api_key: &str) -> Request {
    request("/collections", Some(api_key))
}

pub fn collection_wallpapers(
    api_key: Option<&str>,
    username: &str,
    collection_id: &str,
    page: u32,
) -> Request {
    request(&format!("/collections/{username}/{collection_id}"), api_key).query("page", page)
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenWallpaper {
    pub id: String,
    /// Wallpaper page on wallhaven.cc.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `"WxH"`.
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    /// `"YYYY-MM-DD HH:MM:SS"`, UTC.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Full image URL.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub thumbs: WallhavenThumbs,
    /// Only present on `/w/{id}`.
    #[serde(default)]
    pub tags: Vec<WallhavenTag>,
    /// Only present on `/w/{id}`.
    #[serde(default)]
    pub uploader: Option<WallhavenUploader>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenThumbs {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenTag {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenUploader {
    #[serde(default)]
    pub username: Option<String>,
}

/// `/search` and collection listing envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenListing {
    #[serde(default)]
    pub data: Vec<WallhavenWallpaper>,
}

/// `/w/{id}` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenDetail {
    pub data: WallhavenWallpaper,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenCollection {
    pub id: u64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WallhavenCollections {
    #[serde(default)]
    pub data: Vec<WallhavenCollection>,
}
