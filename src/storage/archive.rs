use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::DocumentMetadata;

/// Separator between the metadata header and the document body.
const HEADER_SEPARATOR_LEN: usize = 80;

/// Create a safe filename fragment from arbitrary title text.
///
/// Keeps alphanumerics, spaces, hyphens and underscores, truncates to
/// `max_length` characters, and trims surrounding whitespace. Already-clean
/// short input passes through unchanged.
pub fn sanitize_filename(text: &str, max_length: usize) -> String {
    let safe: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(max_length)
        .collect();
    safe.trim().to_string()
}

/// On-disk archive for one document type.
///
/// The folder listing is the only record of what has been downloaded: the
/// known-id set is loaded once from the filenames at startup and consulted
/// before every download. Writes are not atomic; an interrupted write leaves
/// a truncated file that later runs will treat as complete.
pub struct DocumentArchive {
    dir: PathBuf,
    known_ids: HashSet<String>,
}

impl DocumentArchive {
    /// Open (creating if needed) the archive folder and index the document
    /// ids already stored in it.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let mut known_ids = HashSet::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("Failed to list output directory {}", dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(id) = Self::id_from_file_stem(name) {
                    known_ids.insert(id.to_string());
                }
            }
        }

        Ok(Self { dir, known_ids })
    }

    /// Whether a document id already has a file in this archive.
    pub fn contains(&self, doc_id: &str) -> bool {
        self.known_ids.contains(doc_id)
    }

    /// Write a document file: metadata header, separator line, blank line,
    /// then the content. Returns the path written.
    pub fn save(
        &mut self,
        content: &str,
        metadata: &DocumentMetadata,
        search_term: &str,
    ) -> Result<PathBuf> {
        let path = self.dir.join(Self::build_filename(metadata));
        let header = Self::build_header(metadata, search_term);

        fs::write(&path, format!("{}{}", header, content))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        self.known_ids.insert(metadata.id.clone());
        Ok(path)
    }

    /// Count of `.txt` files and their total size in bytes, for the
    /// end-of-run disk usage report.
    pub fn disk_usage(&self) -> Result<(usize, u64)> {
        let mut files = 0;
        let mut bytes = 0;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list output directory {}", self.dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            files += 1;
            bytes += entry.metadata().context("Failed to stat file")?.len();
        }
        Ok((files, bytes))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename layout: `{date}_{doktyp}_{id}_{title}.txt` with the date
    /// compacted to digits.
    fn build_filename(metadata: &DocumentMetadata) -> String {
        let id = if metadata.id.is_empty() {
            "unknown"
        } else {
            &metadata.id
        };
        let title = if metadata.titel.is_empty() {
            "untitled".to_string()
        } else {
            sanitize_filename(&metadata.titel, 30)
        };
        let doc_type = if metadata.doktyp.is_empty() {
            "unknown"
        } else {
            &metadata.doktyp
        };
        let date: String = metadata
            .datum
            .chars()
            .take(10)
            .filter(|c| *c != '-')
            .collect();

        format!("{}_{}_{}_{}.txt", date, doc_type, id, title)
    }

    /// Recover the document id from a stored filename. Date and type codes
    /// never contain underscores, so the id is the third segment; only the
    /// sanitized title after it may contain more.
    fn id_from_file_stem(stem: &str) -> Option<&str> {
        let mut parts = stem.splitn(4, '_');
        let _date = parts.next()?;
        let _doc_type = parts.next()?;
        parts.next()
    }

    fn build_header(metadata: &DocumentMetadata, search_term: &str) -> String {
        format!(
            "SEARCH TERM: {}\n\
             DOCUMENT ID: {}\n\
             TITLE: {}\n\
             TYPE: {}\n\
             SUBTYPE: {}\n\
             DATE: {}\n\
             PARLIAMENTARY YEAR: {}\n\
             ORGANISATION: {}\n\
             STATUS: {}\n\
             DOWNLOADED: {}\n\
             {}\n\n",
            search_term,
            metadata.id,
            metadata.titel,
            metadata.doktyp,
            metadata.subtyp,
            metadata.datum,
            metadata.rm,
            metadata.organ,
            metadata.status,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(HEADER_SEPARATOR_LEN)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_metadata() -> DocumentMetadata {
        DocumentMetadata {
            id: "H802123".to_string(),
            titel: "AI och samhället".to_string(),
            datum: "2023-05-11".to_string(),
            doktyp: "prop".to_string(),
            subtyp: "prop".to_string(),
            rm: "2022/23".to_string(),
            organ: "N".to_string(),
            status: "klar".to_string(),
        }
    }

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(
            sanitize_filename("AI-strategi_2023 v2", 30),
            "AI-strategi_2023 v2"
        );
        assert_eq!(sanitize_filename("vad/är: AI?", 30), "vadär AI");
    }

    #[test]
    fn test_sanitize_truncates_and_trims() {
        let long = "a".repeat(50);
        assert_eq!(sanitize_filename(&long, 30).len(), 30);

        // Truncation can expose trailing whitespace; it must be trimmed
        assert_eq!(sanitize_filename("abc   def", 4), "abc");
        assert_eq!(sanitize_filename("  padded  ", 30), "padded");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_filename("Motion om AI (2023)", 30);
        assert_eq!(sanitize_filename(&once, 30), once);
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert_eq!(sanitize_filename("", 30), "");
    }

    #[test]
    fn test_filename_layout() {
        let name = DocumentArchive::build_filename(&test_metadata());
        assert_eq!(name, "20230511_prop_H802123_AI och samhället.txt");
    }

    #[test]
    fn test_filename_fallbacks_for_missing_fields() {
        let name = DocumentArchive::build_filename(&DocumentMetadata::default());
        assert_eq!(name, "_unknown_unknown_untitled.txt");
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();

        let meta = test_metadata();
        let content = "Regeringen föreslår...\nandra raden\n";
        let path = archive.save(content, &meta, "AI").unwrap();

        let stored = fs::read_to_string(&path).unwrap();

        // Body is recoverable as the suffix after the separator line
        let separator = format!("{}\n\n", "=".repeat(80));
        let (header, body) = stored.split_once(&separator).unwrap();
        assert_eq!(body, content);

        // Every metadata field appears verbatim in the header
        assert!(header.contains("SEARCH TERM: AI"));
        assert!(header.contains("DOCUMENT ID: H802123"));
        assert!(header.contains("TITLE: AI och samhället"));
        assert!(header.contains("TYPE: prop"));
        assert!(header.contains("SUBTYPE: prop"));
        assert!(header.contains("DATE: 2023-05-11"));
        assert!(header.contains("PARLIAMENTARY YEAR: 2022/23"));
        assert!(header.contains("ORGANISATION: N"));
        assert!(header.contains("STATUS: klar"));
        assert!(header.contains("DOWNLOADED: "));
    }

    #[test]
    fn test_save_registers_id() {
        let temp = TempDir::new().unwrap();
        let mut archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();

        assert!(!archive.contains("H802123"));
        archive.save("text", &test_metadata(), "AI").unwrap();
        assert!(archive.contains("H802123"));
    }

    #[test]
    fn test_open_indexes_existing_files() {
        let temp = TempDir::new().unwrap();
        {
            let mut archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();
            archive.save("text", &test_metadata(), "AI").unwrap();
        }

        // A fresh archive over the same folder sees the stored id
        let archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();
        assert!(archive.contains("H802123"));
        assert!(!archive.contains("H999999"));
    }

    #[test]
    fn test_open_ignores_unrelated_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.md"), "not a document").unwrap();
        fs::write(temp.path().join("stray.txt"), "no underscores").unwrap();

        let archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();
        assert!(!archive.contains("notes"));
        assert!(!archive.contains("stray"));
    }

    #[test]
    fn test_id_survives_underscored_title() {
        let temp = TempDir::new().unwrap();
        let mut archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();

        let meta = DocumentMetadata {
            titel: "AI_strategi_för_framtiden".to_string(),
            ..test_metadata()
        };
        archive.save("text", &meta, "AI").unwrap();

        let reopened = DocumentArchive::open(temp.path().to_path_buf()).unwrap();
        assert!(reopened.contains("H802123"));
    }

    #[test]
    fn test_disk_usage() {
        let temp = TempDir::new().unwrap();
        let mut archive = DocumentArchive::open(temp.path().to_path_buf()).unwrap();

        assert_eq!(archive.disk_usage().unwrap(), (0, 0));

        archive.save("1234", &test_metadata(), "AI").unwrap();
        let (files, bytes) = archive.disk_usage().unwrap();
        assert_eq!(files, 1);
        assert!(bytes > 4); // header plus the four content bytes
    }
}
