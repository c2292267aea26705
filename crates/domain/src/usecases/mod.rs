//! Application use cases / business logic

pub mod ingest;
pub mod publish;
pub mod render;
pub mod run_loop;
pub mod staging;

pub use ingest::{FeedIngestor, IngestError};
pub use publish::{DigestPublisher, PublishError, validate_mail_settings};
pub use render::{DigestRenderer, RenderConfig, format_date};
pub use run_loop::{RunLoop, RunLoopConfig, RunLoopError, RunReport};
pub use staging::StagedSeenStore;
