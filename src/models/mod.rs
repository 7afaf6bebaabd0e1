mod document;
mod stats;

pub use document::{DocumentList, DocumentListResponse, DocumentMetadata, TaggedDocument};
pub use stats::DownloadStats;
