//! Canonical content types.
//!
//! Schema mappers turn exactly one provider record into one [`Wallpaper`].
//! Values are immutable: a fresher fetch produces a new value under the
//! same id instead of mutating the old one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderId;
use crate::error::CoreError;

// ============================================================================
// Id Namespacing
// ============================================================================

/// Builds a globally unique id: `"{provider}_{native_id}"`.
pub fn namespaced_id(provider: ProviderId, native_id: &str) -> String {
    format!("{}_{}", provider.prefix(), native_id)
}

/// Splits a namespaced id back into provider and native id.
///
/// Returns `None` when the prefix is not a known provider or the native
/// part is empty.
pub fn split_namespaced_id(id: &str) -> Option<(ProviderId, &str)> {
    let (prefix, native) = id.split_once('_')?;
    if native.is_empty() {
        return None;
    }
    let provider = prefix.parse::<ProviderId>().ok()?;
    Some((provider, native))
}

// ============================================================================
// Wallpaper
// ============================================================================

/// Content author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Profile page, if the provider exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Attribution metadata required by provider terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Provider page for this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page: Option<String>,
    /// License name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// A provider-agnostic wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallpaper {
    /// Namespaced id, `"{provider}_{native_id}"`.
    pub id: String,
    /// Source provider.
    pub provider: ProviderId,
    /// Title, if any.
    #[serde(default)]
    pub title: Option<String>,
    /// Description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Full-size image URL.
    pub url: String,
    /// Small thumbnail URL.
    pub thumbnail_url: String,
    /// Medium preview URL.
    pub preview_url: String,
    /// Author, if known.
    #[serde(default)]
    pub author: Option<Author>,
    /// Attribution metadata.
    #[serde(default)]
    pub attribution: Attribution,
    /// Width in pixels (0 when unknown).
    pub width: u32,
    /// Height in pixels (0 when unknown).
    pub height: u32,
    /// Tags, in provider order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Premium content, per the provider's own rule.
    #[serde(default)]
    pub is_premium: bool,
    /// Animated/live content.
    #[serde(default)]
    pub is_live: bool,
    /// Dominant color as `#RRGGBB`, if known.
    #[serde(default)]
    pub color: Option<String>,
    /// Upstream creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Wallpaper {
    /// Starts a builder for the given provider and native id.
    pub fn builder(provider: ProviderId, native_id: &str, url: impl Into<String>) -> WallpaperBuilder {
        WallpaperBuilder::new(provider, native_id, url)
    }

    /// Width / height, or `None` for unknown dimensions.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }

    /// Resolution as `"WxH"`.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Native id with the provider prefix stripped.
    pub fn native_id(&self) -> &str {
        self.id
            .strip_prefix(self.provider.prefix())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(&self.id)
    }

    /// Validates invariants a mapper must uphold.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the id is not namespaced to
    /// `provider` or the primary URL is empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        match split_namespaced_id(&self.id) {
            Some((provider, _)) if provider == self.provider => {}
            _ => {
                return Err(CoreError::InvalidData(format!(
                    "id {} is not namespaced to {}",
                    self.id, self.provider
                )));
            }
        }
        if self.url.is_empty() {
            return Err(CoreError::InvalidData(format!("{} has no url", self.id)));
        }
        Ok(())
    }
}

/// Builder used by schema mappers.
#[derive(Debug, Clone)]
pub struct WallpaperBuilder {
    inner: Wallpaper,
}

impl WallpaperBuilder {
    /// Creates a builder. Thumbnail and preview default to `url`.
    pub fn new(provider: ProviderId, native_id: &str, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            inner: Wallpaper {
                id: namespaced_id(provider, native_id),
                provider,
                title: None,
                description: None,
                thumbnail_url: url.clone(),
                preview_url: url.clone(),
                url,
                author: None,
                attribution: Attribution::default(),
                width: 0,
                height: 0,
                tags: Vec::new(),
                is_premium: false,
                is_live: false,
                color: None,
                created_at: None,
            },
        }
    }

    /// Sets the title. Blank strings become `None`.
    pub fn title(mut self, title: Option<String>) -> Self {
        self.inner.title = non_blank(title);
        self
    }

    /// Sets the description. Blank strings become `None`.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.inner.description = non_blank(description);
        self
    }

    /// Sets the thumbnail URL when present.
    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        if let Some(url) = non_blank(url) {
            self.inner.thumbnail_url = url;
        }
        self
    }

    /// Sets the preview URL when present.
    pub fn preview(mut self, url: Option<String>) -> Self {
        if let Some(url) = non_blank(url) {
            self.inner.preview_url = url;
        }
        self
    }

    /// Sets the author.
    pub fn author(mut self, name: Option<String>, profile_url: Option<String>) -> Self {
        self.inner.author = non_blank(name).map(|name| Author {
            name,
            profile_url: non_blank(profile_url),
        });
        self
    }

    /// Sets attribution metadata.
    pub fn attribution(mut self, source_page: Option<String>, license: Option<&str>) -> Self {
        self.inner.attribution = Attribution {
            source_page: non_blank(source_page),
            license: license.map(str::to_string),
        };
        self
    }

    /// Sets dimensions.
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.inner.width = width;
        self.inner.height = height;
        self
    }

    /// Sets tags. Blank entries are dropped, the rest trimmed.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Marks premium content.
    pub fn premium(mut self, premium: bool) -> Self {
        self.inner.is_premium = premium;
        self
    }

    /// Marks animated content.
    pub fn live(mut self, live: bool) -> Self {
        self.inner.is_live = live;
        self
    }

    /// Sets the dominant color.
    pub fn color(mut self, color: Option<String>) -> Self {
        self.inner.color = non_blank(color);
        self
    }

    /// Sets the creation time.
    pub fn created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.inner.created_at = created_at;
        self
    }

    /// Finishes the wallpaper.
    pub fn build(self) -> Wallpaper {
        self.inner
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Collection
// ============================================================================

/// A provider-agnostic collection of wallpapers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Namespaced id, `"{provider}_{native_id}"`.
    pub id: String,
    /// Source provider.
    pub provider: ProviderId,
    /// Title.
    pub title: String,
    /// Description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover image URL, if any.
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Number of items, when reported.
    #[serde(default)]
    pub total: Option<u32>,
}

impl Collection {
    /// Native id with the provider prefix stripped.
    pub fn native_id(&self) -> &str {
        split_namespaced_id(&self.id).map_or(self.id.as_str(), |(_, native)| native)
    }
}

// ============================================================================
// Paging
// ============================================================================

/// A page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Page {
    /// Largest page size any provider accepts.
    pub const MAX_PER_PAGE: u32 = 80;

    /// Creates a page, clamping to valid bounds.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 24)
    }
}

// ============================================================================
// Tests
// ============================================================================
