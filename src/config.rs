use std::path::PathBuf;
use std::time::Duration;

/// A document type known to the Riksdag API, paired with the folder its
/// downloads are stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    /// Short type code used in API queries (e.g. "mot", "prop")
    pub code: String,
    /// Output folder name under the data directory (e.g. "motioner")
    pub folder: String,
}

impl DocumentType {
    pub fn new(code: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            folder: folder.into(),
        }
    }
}

/// Run configuration, built once at startup and passed explicitly to every
/// component. There is no config file; these are in-code constants, with the
/// struct existing so tests can point the pipeline at a mock server and a
/// temporary data directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Riksdag open data API
    pub base_url: String,
    /// Root directory that per-type output folders live under
    pub data_dir: PathBuf,
    /// Search terms, in processing order. Order matters: when a document
    /// matches several terms, the first term processed is the one recorded
    /// as its provenance.
    pub search_terms: Vec<String>,
    /// Document types to download, in processing order
    pub document_types: Vec<DocumentType>,
    /// Earliest document date to include (older OCR'd documents produce
    /// false positives for short search terms like "AI")
    pub date_from: String,
    /// Documents requested per search result page
    pub page_size: usize,
    /// Pause between successive search result pages
    pub page_delay: Duration,
    /// Pause between successive content downloads
    pub download_delay: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://data.riksdagen.se".to_string(),
            data_dir: PathBuf::from("data"),
            search_terms: vec!["artificiell intelligens".to_string(), "AI".to_string()],
            document_types: vec![
                DocumentType::new("mot", "motioner"),
                DocumentType::new("prop", "propositioner"),
            ],
            date_from: "1990-01-01".to_string(),
            page_size: 100,
            page_delay: Duration::from_millis(100),
            download_delay: Duration::from_millis(50),
            request_timeout: Duration::from_secs(60),
        }
    }
}
