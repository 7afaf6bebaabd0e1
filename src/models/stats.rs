/// Download counters for one document type, accumulated over a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Unique documents discovered across all search terms
    pub total_found: usize,
    /// Documents fetched and written to disk this run
    pub downloaded: usize,
    /// Documents whose content fetch failed (no file written)
    pub failed: usize,
    /// Documents skipped: already on disk, or missing an id
    pub skipped: usize,
}
