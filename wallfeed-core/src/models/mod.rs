//! Domain models for Wallfeed.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider identity ([`ProviderId`])
//! - [`quota`] - Static quota configuration ([`QuotaTable`])
//! - [`usage`] - Usage counters ([`UsageCounters`])
//! - [`outcome`] - Call outcomes ([`CallOutcome`], [`ProviderError`])
//! - [`wallpaper`] - Canonical content ([`Wallpaper`], [`Collection`])

mod outcome;
mod provider;
mod quota;
mod usage;
mod wallpaper;

pub use outcome::{CallOutcome, ProviderError};
pub use provider::ProviderId;
pub use quota::{ProviderQuota, QuotaTable};
pub use usage::UsageCounters;
pub use wallpaper::{
    namespaced_id, split_namespaced_id, Attribution, Author, Collection, Page, Wallpaper,
    WallpaperBuilder,
};
