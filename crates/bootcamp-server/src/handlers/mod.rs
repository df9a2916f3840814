//! HTTP handlers

pub mod cache;
pub mod health;
pub mod notes;

pub use health::{health, root};
