pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod throttle;

pub use api::RiksdagClient;
pub use config::{Config, DocumentType};
pub use models::{DocumentMetadata, DownloadStats, TaggedDocument};
pub use pipeline::{download_corpus, print_summary, RunOptions, TypeSummary};
pub use storage::DocumentArchive;
pub use throttle::Throttle;
