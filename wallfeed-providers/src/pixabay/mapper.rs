//! Pixabay schema mapper.

use wallfeed_core::{ProviderId, Wallpaper};

use super::api::PixabayHit;

const LICENSE: &str = "Pixabay Content License";

/// Splits Pixabay's comma-separated tag string.
pub fn split_tags(raw: Option<&str>) -> Vec<&str> {
    raw.map(|tags| tags.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default()
}

/// Maps one Pixabay hit. Pixabay content is never premium.
pub fn map_hit(hit: PixabayHit) -> Wallpaper {
    let url = hit
        .large_image_url
        .clone()
        .or_else(|| hit.webformat_url.clone())
        .unwrap_or_default();

    let profile = match (&hit.user, hit.user_id) {
        (Some(user), Some(user_id)) => Some(format!("https://pixabay.com/users/{user}-{user_id}/")),
        _ => None,
    };
    let tags = split_tags(hit.tags.as_deref());

    Wallpaper::builder(ProviderId::Pixabay, &hit.id.to_string(), url)
        // The first tag is the closest thing Pixabay has to a title.
        .title(tags.first().map(|t| (*t).to_string()))
        .thumbnail(hit.preview_url)
        .preview(hit.webformat_url)
        .author(hit.user, profile)
        .attribution(hit.page_url, Some(LICENSE))
        .dimensions(hit.image_width.unwrap_or(0), hit.image_height.unwrap_or(0))
        .tags(tags)
        .premium(false)
        .build()
}
