use serde::{Deserialize, Deserializer};

/// Metadata for one document as returned by the search endpoint.
///
/// Every field except `id` is routinely missing for older documents, so they
/// all default to the empty string. Documents without an `id` cannot be
/// downloaded and are counted as skipped by the pipeline.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub titel: String,
    #[serde(default)]
    pub datum: String,
    #[serde(default)]
    pub doktyp: String,
    #[serde(default)]
    pub subtyp: String,
    /// Parliamentary session label, e.g. "2023/24"
    #[serde(default)]
    pub rm: String,
    #[serde(default)]
    pub organ: String,
    #[serde(default)]
    pub status: String,
}

/// A document plus the search term that first surfaced it.
///
/// When a document matches more than one term, only the first term processed
/// is kept; later matches are dropped during deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedDocument {
    pub meta: DocumentMetadata,
    pub search_term: String,
}

/// Top-level search response. The API omits `dokumentlista` entirely for
/// some queries; that means zero results, not an error.
#[derive(Debug, Deserialize)]
pub struct DocumentListResponse {
    pub dokumentlista: Option<DocumentList>,
}

/// The `dokumentlista` envelope.
#[derive(Debug, Deserialize)]
pub struct DocumentList {
    /// Total hit count across all pages. The API serializes this as a
    /// string ("@traffar": "1234").
    #[serde(rename = "@traffar", default, deserialize_with = "count_field")]
    pub traffar: u64,
    /// The API returns a bare object instead of a one-element array when a
    /// page holds a single document.
    #[serde(default, deserialize_with = "one_or_many")]
    pub dokument: Vec<DocumentMetadata>,
}

fn count_field<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<DocumentMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Box<DocumentMetadata>),
        Many(Vec<DocumentMetadata>),
    }

    match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(doc) => Ok(vec![*doc]),
        OneOrMany::Many(docs) => Ok(docs),
    }
}
