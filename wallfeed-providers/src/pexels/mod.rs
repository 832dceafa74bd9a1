//! Pexels provider implementation.
//!
//! The API key goes in the `Authorization` header as-is. Pexels has no
//! random endpoint and no download tracking.

mod adapter;
pub(crate) mod api;
pub(crate) mod mapper;

pub use adapter::PexelsAdapter;
