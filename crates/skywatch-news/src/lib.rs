//! News lookup for Skywatch
//!
//! Headline search against a NewsAPI-style provider. Lookup failures are
//! absorbed: callers always get a displayable list, falling back to the
//! built-in sample headlines when the API is unreachable.

pub mod client;
pub mod sample;
pub mod types;

pub use client::NewsClient;
pub use sample::sample_articles;
pub use types::{Article, NewsError};
