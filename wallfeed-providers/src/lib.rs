// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wallfeed Providers
//!
//! One adapter and one schema mapper per upstream wallpaper provider.
//!
//! Each provider module includes:
//!
//! - **api**: Endpoints and the provider's native response schema
//! - **mapper**: Pure, total functions from native records to [`Wallpaper`]
//! - **adapter**: The [`WallpaperProvider`] implementation, routing every
//!   request through the resilient caller
//!
//! ## Supported Providers
//!
//! | Provider | Key | Premium rule | Collections | Download tracking |
//! |----------|-----|--------------|-------------|-------------------|
//! | Unsplash | required | `premium` / `plus` flag | yes | yes |
//! | Pexels | required | never | featured | no |
//! | Pixabay | required | never | no | no |
//! | Wallhaven | optional | 3840x2160 or larger | key owner's | no |
//!
//! ## Usage
//!
//! ```ignore
//! use wallfeed_fetch::FetchContext;
//! use wallfeed_providers::{ApiKeys, ProviderRegistry, RegistryOptions};
//!
//! let ctx = FetchContext::new()?;
//! let options = RegistryOptions { keys: ApiKeys::from_env(), ..Default::default() };
//! let registry = ProviderRegistry::new(&ctx, &options);
//!
//! let adapter = registry.balanced().unwrap();
//! let outcome = adapter.get_featured(1, 24).await;
//! ```
//!
//! [`Wallpaper`]: wallfeed_core::Wallpaper
//! [`WallpaperProvider`]: wallfeed_core::WallpaperProvider

mod client;
pub mod credentials;
pub mod registry;

// Provider modules (alphabetical)
pub mod pexels;
pub mod pixabay;
pub mod unsplash;
pub mod wallhaven;

#[cfg(test)]
mod testing;

pub use credentials::{ApiKeys, default_env_var, requires_key};
pub use pexels::PexelsAdapter;
pub use pixabay::PixabayAdapter;
pub use registry::{ProviderRegistry, RegistryOptions};
pub use unsplash::UnsplashAdapter;
pub use wallhaven::WallhavenAdapter;

/// Domains the adapters talk to, for the HTTP allowlist.
pub const PROVIDER_DOMAINS: &[&str] = &["unsplash.com", "pexels.com", "pixabay.com", "wallhaven.cc"];
