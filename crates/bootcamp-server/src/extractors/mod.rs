//! Request extractors

pub mod cache;
pub mod path;

pub use cache::CacheStore;
pub use path::{ApiPath, TextPath};
