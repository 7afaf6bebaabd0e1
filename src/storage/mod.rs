mod archive;

pub use archive::{sanitize_filename, DocumentArchive};
