// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wallfeed Fetch
//!
//! The resilience layer between adapters and upstream providers.
//!
//! ## Bookkeeping
//!
//! - [`tracker::UsageTracker`] - Per-provider call/success/error counters
//! - [`policy::RateLimitPolicy`] - Decides when a provider is rate limited
//! - [`balancer::LoadBalancer`] - Picks the least loaded provider under quota
//!
//! ## Calls
//!
//! - [`resilient::ResilientCaller`] - Rate-limit check, retry with linear
//!   backoff, error classification
//! - [`http::Transport`] - Transport seam adapters issue requests through
//! - [`http::HttpClient`] - reqwest-backed [`http::Transport`]
//! - [`context::FetchContext`] - Everything above, built once at startup
//!
//! ## Example
//!
//! ```ignore
//! use wallfeed_core::ProviderId;
//! use wallfeed_fetch::FetchContext;
//!
//! let ctx = FetchContext::new()?;
//! let provider = ctx.balancer.next_provider();
//! let outcome = ctx
//!     .caller
//!     .call_default(provider, || async { Ok::<_, wallfeed_fetch::TransportError>(42) })
//!     .await;
//! ```

pub mod balancer;
pub mod context;
pub mod error;
pub mod http;
pub mod policy;
pub mod resilient;
pub mod tracker;

// Re-export key types at crate root
pub use balancer::LoadBalancer;
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use error::{ErrorClass, TransportError};
pub use http::{HttpClient, Request, Transport};
pub use policy::{FixedWindowPolicy, NeverLimited, RateLimitPolicy};
pub use resilient::{ResilientCaller, RetryPolicy};
pub use tracker::UsageTracker;
