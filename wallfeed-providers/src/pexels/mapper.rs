//! Pexels schema mapper.

use wallfeed_core::{Collection, ProviderId, Wallpaper, namespaced_id};

use super::api::{PexelsCollection, PexelsPhoto};

const LICENSE: &str = "Pexels License";

/// Maps one Pexels photo. Everything on Pexels is free, so never premium.
pub fn map_photo(photo: PexelsPhoto) -> Wallpaper {
    let src = photo.src;
    let url = src
        .original
        .clone()
        .or_else(|| src.large2x.clone())
        .or_else(|| src.large.clone())
        .unwrap_or_default();

    Wallpaper::builder(ProviderId::Pexels, &photo.id.to_string(), url)
        .title(photo.alt)
        .thumbnail(src.medium.or(src.small))
        .preview(src.large2x.or(src.large))
        .author(photo.photographer, photo.photographer_url)
        .attribution(photo.url, Some(LICENSE))
        .dimensions(photo.width.unwrap_or(0), photo.height.unwrap_or(0))
        .premium(false)
        .color(photo.avg_color)
        .build()
}

/// Maps one Pexels collection.
pub fn map_collection(collection: PexelsCollection) -> Collection {
    Collection {
        id: namespaced_id(ProviderId::Pexels, &collection.id),
        provider: ProviderId::Pexels,
        title: collection
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Collection {}", collection.id)),
        description: collection.description.filter(|d| !d.trim().is_empty()),
        cover_url: None,
        total: collection.photos_count,
    }
}
