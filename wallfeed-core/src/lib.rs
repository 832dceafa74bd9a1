// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Wallfeed` Core
//!
//! Core types, models, and traits for the `Wallfeed` aggregation layer.
//!
//! This crate provides the foundational abstractions used across all other
//! `Wallfeed` crates, including:
//!
//! - Domain models (providers, quotas, usage counters, wallpapers)
//! - The call outcome type every upstream call resolves to
//! - Error types
//! - The adapter trait every provider implements
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderId`] - Closed set of upstream wallpaper sources
//! - [`QuotaTable`] - Static per-provider calls-per-window limits
//! - [`UsageCounters`] - Per-provider call/success/error bookkeeping
//!
//! ### Outcomes
//! - [`CallOutcome`] - `Success` / `Error` / `Loading`
//! - [`ProviderError`] - Error payload carried by [`CallOutcome::Error`]
//!
//! ### Content
//! - [`Wallpaper`] - Provider-agnostic content item
//! - [`Collection`] - Provider-agnostic collection

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provider types
    ProviderId,
    ProviderQuota,
    QuotaTable,
    // Usage types
    UsageCounters,
    // Outcomes
    CallOutcome,
    ProviderError,
    // Content
    Attribution,
    Author,
    Collection,
    Page,
    Wallpaper,
    WallpaperBuilder,
    namespaced_id,
    split_namespaced_id,
};

// Re-export traits
pub use traits::{SearchFilters, WallpaperProvider};
