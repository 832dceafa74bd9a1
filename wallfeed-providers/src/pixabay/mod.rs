//! Pixabay provider implementation.
//!
//! The API key is a query parameter. Pixabay offers neither collections nor
//! download tracking; both succeed without a request.

mod adapter;
pub(crate) mod api;
pub(crate) mod mapper;

pub use adapter::PixabayAdapter;
