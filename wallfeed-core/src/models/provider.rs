//! Provider identity.
//!
//! [`ProviderId`] is the closed set of upstream wallpaper sources. It is used
//! as a map key everywhere: quota tables, usage counters, the adapter
//! registry, and the id namespace of every [`Wallpaper`](super::Wallpaper).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported upstream wallpaper providers.
///
/// Declaration order is the enumeration order used for deterministic
/// tie-breaking in the load balancer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Unsplash
    #[default]
    Unsplash,
    /// Pexels
    Pexels,
    /// Pixabay
    Pixabay,
    /// Wallhaven
    Wallhaven,
}

impl ProviderId {
    /// Returns all provider ids in enumeration order.
    pub fn all() -> &'static [ProviderId] {
        &[Self::Unsplash, Self::Pexels, Self::Pixabay, Self::Wallhaven]
    }

    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unsplash => "Unsplash",
            Self::Pexels => "Pexels",
            Self::Pixabay => "Pixabay",
            Self::Wallhaven => "Wallhaven",
        }
    }

    /// Returns the id namespace prefix (`"{prefix}_{nativeId}"`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Unsplash => "unsplash",
            Self::Pexels => "pexels",
            Self::Pixabay => "pixabay",
            Self::Wallhaven => "wallhaven",
        }
    }

    /// Converts this provider to an index (position in the `all()` array).
    pub fn to_index(self) -> usize {
        match self {
            Self::Unsplash => 0,
            Self::Pexels => 1,
            Self::Pixabay => 2,
            Self::Wallhaven => 3,
        }
    }

    /// Creates a provider from an index (position in the `all()` array).
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Number of providers.
    pub const COUNT: usize = 4;
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for ProviderId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.prefix() == needle)
            .ok_or_else(|| CoreError::ProviderNotFound(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
