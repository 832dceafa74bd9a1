//! Integration tests for core model types.

use wallfeed_core::{CallOutcome, ProviderError, ProviderId, UsageCounters, Wallpaper};

#[test]
fn test_wallpaper_survives_cache_serialization() {
    let wallpaper = Wallpaper::builder(ProviderId::Unsplash, "Dwu85P9SOIk", "https://images/full")
        .title(Some("Mountain lake".to_string()))
        .tags(["lake", "mountain"])
        .dimensions(6000, 4000)
        .premium(true)
        .build();

    let json = serde_json::to_string(&wallpaper).unwrap();
    let parsed: Wallpaper = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, wallpaper);
}

#[test]
fn test_outcome_tagged_representation() {
    let outcome: CallOutcome<u32> =
        CallOutcome::Error(ProviderError::with_code(ProviderId::Pixabay, 429, "rate limit exceeded"));
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["state"], "error");
    assert_eq!(json["value"]["code"], 429);
    assert_eq!(json["value"]["provider"], "pixabay");
}

#[test]
fn test_counters_serialize_without_last_error() {
    let json = serde_json::to_string(&UsageCounters::default()).unwrap();
    assert_eq!(json, r#"{"calls":0,"successes":0,"errors":0}"#);
}
