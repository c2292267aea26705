//! defence-digest domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `matcher`: Keyword relevance filter
//! - `text`: Markup stripping and truncation helpers
//! - `usecases`: Ingest, render, publish and the run loop tying them together

pub mod matcher;
pub mod model;
pub mod ports;
pub mod text;
pub mod usecases;

pub use matcher::{KeywordMatcher, match_keywords};
pub use model::*;
pub use ports::*;
