//! Wallhaven provider implementation.
//!
//! Public endpoints work without a key; listing collections needs one.
//! Collection contents live under `/collections/{username}/{id}`, so
//! collection ids carry the owner as `"{username}/{id}"`.

mod adapter;
pub(crate) mod api;
pub(crate) mod mapper;

pub use adapter::WallhavenAdapter;
pub use mapper::{UHD_HEIGHT, UHD_WIDTH, parse_resolution};
