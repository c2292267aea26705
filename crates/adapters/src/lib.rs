//! defence-digest adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `feeds`: HTTP feed fetcher (reqwest + feed-rs) and a stub
//! - `state`: SQLite and in-memory seen-item stores
//! - `smtp`: SMTP mail transport and a stub
//! - `artifact`: local HTML copy of the latest digest

pub mod artifact;
pub mod feeds;
pub mod smtp;
mod state_memory;
mod state_sqlite;

/// Re-exports for state adapters
pub mod state {
    pub use crate::state_memory::InMemorySeenStore;
    pub use crate::state_sqlite::SqliteSeenStore;
}
