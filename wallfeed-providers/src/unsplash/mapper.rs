//! Unsplash schema mapper.

use chrono::{DateTime, Utc};
use wallfeed_core::{Collection, ProviderId, Wallpaper, namespaced_id};

use super::api::{UnsplashCollection, UnsplashPhoto};

const LICENSE: &str = "Unsplash License";
const PROFILE_BASE: &str = "https://unsplash.com/@";

/// Maps one Unsplash photo.
///
/// Premium means Unsplash+: either the `premium` or the `plus` flag is set.
pub fn map_photo(photo: UnsplashPhoto) -> Wallpaper {
    let urls = photo.urls;
    let url = urls
        .full
        .clone()
        .or_else(|| urls.regular.clone())
        .unwrap_or_default();

    let (author, profile) = match photo.user {
        Some(user) => {
            let profile = user.links.html.or_else(|| {
                user.username
                    .as_deref()
                    .map(|name| format!("{PROFILE_BASE}{name}"))
            });
            (user.name.or(user.username), profile)
        }
        None => (None, None),
    };

    let is_premium = photo.premium.unwrap_or(false) || photo.plus.unwrap_or(false);

    Wallpaper::builder(ProviderId::Unsplash, &photo.id, url)
        .title(photo.alt_description)
        .description(photo.description)
        .thumbnail(urls.small.or(urls.thumb))
        .preview(urls.regular)
        .author(author, profile)
        .attribution(photo.links.html, Some(LICENSE))
        .dimensions(photo.width.unwrap_or(0), photo.height.unwrap_or(0))
        .tags(photo.tags.into_iter().filter_map(|t| t.title))
        .premium(is_premium)
        .color(photo.color)
        .created_at(photo.created_at.as_deref().and_then(parse_timestamp))
        .build()
}

/// Maps one Unsplash collection.
pub fn map_collection(collection: UnsplashCollection) -> Collection {
    let cover_url = collection
        .cover_photo
        .and_then(|photo| photo.urls.regular.or(photo.urls.small));

    Collection {
        id: namespaced_id(ProviderId::Unsplash, &collection.id),
        provider: ProviderId::Unsplash,
        title: collection
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Collection {}", collection.id)),
        description: collection.description.filter(|d| !d.trim().is_empty()),
        cover_url,
        total: collection.total_photos,
    }
}

/// RFC 3339, as Unsplash sends it. Anything else is dropped.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn photo(value: serde_json::Value) -> UnsplashPhoto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_map_full_photo() {
        let wp = map_photo(photo(json!({
            "id": "Dwu85P9SOIk",
            "created_at": "2016-05-03T11:00:28-04:00",
            "width": 2448,
            "height": 3264,
            "color": "#6E633A",
            "description": "A man drinking a coffee.",
            "alt_description": "man holding cup",
            "urls": {
                "full": "https://images.unsplash.com/full.jpg",
                "regular": "https://images.unsplash.com/regular.jpg",
                "small": "https://images.unsplash.com/small.jpg",
                "thumb": "https://images.unsplash.com/thumb.jpg"
            },
            "links": { "html": "https://unsplash.com/photos/Dwu85P9SOIk" },
            "user": {
                "name": "Gilbert Kane",
                "username": "gilbertkane",
                "links": { "html": "https://unsplash.com/@gilbertkane" }
            },
            "tags": [{ "title": " coffee " }, { "title": "man" }, {}]
        })));

        assert_eq!(wp.id, "unsplash_Dwu85P9SOIk");
        assert_eq!(wp.provider, ProviderId::Unsplash);
        assert_eq!(wp.url, "https://images.unsplash.com/full.jpg");
        assert_eq!(wp.thumbnail_url, "https://images.unsplash.com/small.jpg");
        assert_eq!(wp.preview_url, "https://images.unsplash.com/regular.jpg");
        assert_eq!(wp.title.as_deref(), Some("man holding cup"));
        assert_eq!(wp.description.as_deref(), Some("A man drinking a coffee."));
        assert_eq!((wp.width, wp.height), (2448, 3264));
        assert_eq!(wp.tags, vec!["coffee", "man"]);
        assert_eq!(wp.author.as_ref().unwrap().name, "Gilbert Kane");
        assert_eq!(wp.attribution.license.as_deref(), Some(LICENSE));
        assert!(!wp.is_premium);
        assert!(wp.created_at.is_some());
        assert!(wp.validate().is_ok());
    }

    #[test]
    fn test_premium_or_plus() {
        let base = json!({ "id": "a", "urls": { "full": "u" } });
        assert!(!map_photo(photo(base)).is_premium);
        assert!(map_photo(photo(json!({ "id": "a", "premium": true }))).is_premium);
        assert!(map_photo(photo(json!({ "id": "a", "plus": true }))).is_premium);
        assert!(!map_photo(photo(json!({ "id": "a", "premium": false, "plus": null }))).is_premium);
    }

    #[test]
    fn test_minimal_photo_uses_defaults() {
        let wp = map_photo(photo(json!({ "id": "x" })));
        assert_eq!(wp.id, "unsplash_x");
        assert_eq!(wp.title, None);
        assert_eq!(wp.description, None);
        assert!(wp.tags.is_empty());
        assert_eq!((wp.width, wp.height), (0, 0));
        assert_eq!(wp.author, None);
        assert_eq!(wp.created_at, None);
    }

    #[test]
    fn test_author_profile_from_username() {
        let wp = map_photo(photo(json!({ "id": "x", "user": { "username": "jane" } })));
        let author = wp.author.unwrap();
        assert_eq!(author.name, "jane");
        assert_eq!(author.profile_url.as_deref(), Some("https://unsplash.com/@jane"));
    }

    #[test]
    fn test_bad_timestamp_is_dropped() {
        let wp = map_photo(photo(json!({ "id": "x", "created_at": "yesterday" })));
        assert_eq!(wp.created_at, None);
    }

    #[test]
    fn test_map_collection() {
        let c = map_collection(
            serde_json::from_value(json!({
                "id": "206",
                "title": "Makers: Cat and Ben",
                "total_photos": 12,
                "cover_photo": { "id": "p", "urls": { "regular": "https://img/cover.jpg" } }
            }))
            .unwrap(),
        );
        assert_eq!(c.id, "unsplash_206");
        assert_eq!(c.native_id(), "206");
        assert_eq!(c.total, Some(12));
        assert_eq!(c.cover_url.as_deref(), Some("https://img/cover.jpg"));

        let untitled = map_collection(serde_json::from_value(json!({ "id": "9" })).unwrap());
        assert_eq!(untitled.title, "Collection 9");
    }
}
