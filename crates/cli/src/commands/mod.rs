//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod feeds;
pub mod match_text;
pub mod run;
pub mod test_email;
