//! Wallhaven schema mapper.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use wallfeed_core::{Collection, ProviderId, Wallpaper, namespaced_id};

use super::api::{WallhavenCollection, WallhavenWallpaper};

/// Width from which a wallpaper counts as premium (4K UHD).
pub const UHD_WIDTH: u32 = 3840;
/// Height from which a wallpaper counts as premium (4K UHD).
pub const UHD_HEIGHT: u32 = 2160;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,6})\s*[xX×]\s*(\d{1,6})\s*$").expect("Invalid regex")
});

/// Parses `"WxH"`. Anything malformed is `(0, 0)`.
pub fn parse_resolution(raw: &str) -> (u32, u32) {
    let Some(caps) = RESOLUTION_RE.captures(raw) else {
        return (0, 0);
    };
    let width = caps[1].parse().ok();
    let height = caps[2].parse().ok();
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        _ => (0, 0),
    }
}

/// 4K or larger, in either orientation.
fn is_uhd(width: u32, height: u32) -> bool {
    width.max(height) >= UHD_WIDTH && width.min(height) >= UHD_HEIGHT
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Maps one Wallhaven wallpaper.
///
/// Premium is a resolution rule: 3840x2160 or more.
pub fn map_wallpaper(wallpaper: WallhavenWallpaper) -> Wallpaper {
    let (width, height) = wallpaper
        .resolution
        .as_deref()
        .map_or((0, 0), parse_resolution);

    let thumbs = wallpaper.thumbs;
    let url = wallpaper
        .path
        .or_else(|| thumbs.original.clone())
        .unwrap_or_default();

    let author = wallpaper.uploader.and_then(|u| u.username);
    let profile = author
        .as_deref()
        .map(|name| format!("https://wallhaven.cc/user/{name}"));

    Wallpaper::builder(ProviderId::Wallhaven, &wallpaper.id, url)
        .title(wallpaper.category)
        .thumbnail(thumbs.small.or(thumbs.original.clone()))
        .preview(thumbs.large.or(thumbs.original))
        .author(author, profile)
        .attribution(wallpaper.url, None)
        .dimensions(width, height)
        .tags(wallpaper.tags.into_iter().filter_map(|t| t.name))
        .premium(is_uhd(width, height))
        .live(wallpaper.file_type.as_deref() == Some("image/gif"))
        .color(wallpaper.colors.into_iter().next())
        .created_at(wallpaper.created_at.as_deref().and_then(parse_timestamp))
        .build()
}

/// Maps one collection owned by `username`.
pub fn map_collection(collection: WallhavenCollection, username: Option<&str>) -> Collection {
    let native = match username {
        Some(user) => format!("{user}/{}", collection.id),
        None => collection.id.to_string(),
    };
    Collection {
        id: namespaced_id(ProviderId::Wallhaven, &native),
        provider: ProviderId::Wallhaven,
        title: collection
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| format!("Collection {}", collection.id)),
        description: None,
        cover_url: None,
        total: collection.count,
    }
}
