//! Unsplash provider implementation.
//!
//! Authenticates with a `Client-ID` access key header. Download events must
//! be reported through `/photos/{id}/download`.

mod adapter;
pub(crate) mod api;
pub(crate) mod mapper;

pub use adapter::UnsplashAdapter;
