use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;
use crate::models::{DocumentListResponse, DocumentMetadata};
use crate::pipeline::group_digits;
use crate::throttle::Throttle;

/// Marker that identifies a metadata stub returned by the document endpoint
/// instead of full text.
const STATUS_STUB_MARKER: &str = "<dokumentstatus>";

/// Bodies shorter than this that carry the stub marker are treated as stubs.
/// Real documents with embedded status markup are far larger.
const STATUS_STUB_MAX_BYTES: usize = 5000;

/// Client for the Riksdag open data API.
pub struct RiksdagClient {
    client: Client,
    base_url: String,
    page_size: usize,
    page_throttle: Throttle,
}

impl RiksdagClient {
    /// Create a new client. The underlying HTTP connection pool is shared
    /// across every request for the lifetime of the run.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("riksdag-corpus/", env!("CARGO_PKG_VERSION")))
                .timeout(config.request_timeout)
                .build()
                .context("Failed to create HTTP client")?,
            base_url: config.base_url.clone(),
            page_size: config.page_size,
            page_throttle: Throttle::new(config.page_delay),
        })
    }

    /// Fetch one page of document metadata for a (search term, type) pair.
    ///
    /// Returns the page's documents and the total hit count the API reports
    /// across all pages. A response without the `dokumentlista` envelope
    /// counts as zero results. A non-success HTTP status is an error and
    /// aborts the run.
    pub async fn fetch_document_list(
        &self,
        search_term: &str,
        doc_type: &str,
        date_from: &str,
        page: usize,
    ) -> Result<(Vec<DocumentMetadata>, u64)> {
        let page_str = page.to_string();
        let size_str = self.page_size.to_string();
        let params: [(&str, &str); 8] = [
            ("sok", search_term),
            ("doktyp", doc_type),
            ("from", date_from),
            ("utformat", "json"),
            ("sort", "datum"),
            ("sortorder", "desc"),
            ("p", &page_str),
            ("sz", &size_str),
        ];

        let url = format!("{}/dokumentlista/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("Failed to query document list")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Document list request failed for '{}' ({}): HTTP {}",
                search_term,
                doc_type,
                response.status()
            );
        }

        let body: DocumentListResponse = response
            .json()
            .await
            .context("Failed to parse document list response")?;

        match body.dokumentlista {
            Some(list) => Ok((list.dokument, list.traffar)),
            None => Ok((Vec::new(), 0)),
        }
    }

    /// Fetch all document metadata for a (search term, type) pair,
    /// paginating until the last page or until `limit` documents have been
    /// accumulated. With a limit, the result never exceeds it.
    pub async fn fetch_all_documents(
        &self,
        search_term: &str,
        doc_type: &str,
        date_from: &str,
        limit: Option<usize>,
    ) -> Result<Vec<DocumentMetadata>> {
        let mut all_docs: Vec<DocumentMetadata> = Vec::new();
        let mut page = 1;

        loop {
            let (docs, total_hits) = self
                .fetch_document_list(search_term, doc_type, date_from, page)
                .await?;

            if docs.is_empty() {
                break;
            }

            let page_count = docs.len();
            all_docs.extend(docs);
            println!(
                "      Page {}: {} docs (total: {}/{})",
                page,
                page_count,
                group_digits(all_docs.len()),
                group_digits(total_hits as usize)
            );

            if let Some(limit) = limit {
                if all_docs.len() >= limit {
                    all_docs.truncate(limit);
                    break;
                }
            }

            if page_count < self.page_size {
                // Last page
                break;
            }

            page += 1;
            self.page_throttle.pause().await;
        }

        Ok(all_docs)
    }

    /// Download the full text content of a document.
    ///
    /// Tries the document endpoint first (most complete). Some ids return a
    /// short XML metadata stub there; those fall back to the `.text`
    /// endpoint. Errors from either request are reported to the caller,
    /// which counts the document as failed and moves on.
    pub async fn fetch_document_content(&self, doc_id: &str) -> Result<String> {
        let url = format!("{}/dokument/{}", self.base_url, doc_id);
        let content = self.fetch_text(&url).await?;

        if Self::is_status_stub(&content) {
            let text_url = format!("{}/dokument/{}.text", self.base_url, doc_id);
            return self.fetch_text(&text_url).await;
        }

        Ok(content)
    }

    /// Detect the metadata-only stub some document ids return.
    fn is_status_stub(content: &str) -> bool {
        content.contains(STATUS_STUB_MARKER) && content.len() < STATUS_STUB_MAX_BYTES
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch document")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        response
            .text()
            .await
            .context("Failed to read document content")
    }
}
