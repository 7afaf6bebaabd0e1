use std::collections::HashSet;

use anyhow::Result;

use crate::api::RiksdagClient;
use crate::config::Config;
use crate::models::{DocumentMetadata, DownloadStats, TaggedDocument};
use crate::storage::DocumentArchive;
use crate::throttle::Throttle;

/// Emit an in-download progress line every this many documents.
const PROGRESS_INTERVAL: usize = 50;

/// Options from the CLI surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Count documents without downloading content
    pub dry_run: bool,
    /// Maximum documents fetched per (type, search term) pair
    pub limit: Option<usize>,
}

/// Per-type outcome of a run, in document-type registry order.
#[derive(Debug, Clone)]
pub struct TypeSummary {
    pub code: String,
    pub folder: String,
    pub stats: DownloadStats,
}

/// Append candidates to the unique list, keeping the first occurrence of
/// each id and tagging it with the term that produced it. Later duplicates,
/// including duplicates within one term's own pages, are dropped silently
/// along with their term tag.
pub fn merge_unique(
    unique: &mut Vec<TaggedDocument>,
    seen_ids: &mut HashSet<String>,
    docs: Vec<DocumentMetadata>,
    search_term: &str,
) {
    for doc in docs {
        if seen_ids.insert(doc.id.clone()) {
            unique.push(TaggedDocument {
                meta: doc,
                search_term: search_term.to_string(),
            });
        }
    }
}

/// Download the corpus for every configured document type and search term.
///
/// List-fetch failures abort the whole run; content-fetch failures only mark
/// that document as failed. Returns one summary per document type, in
/// registry order.
pub async fn download_corpus(config: &Config, options: RunOptions) -> Result<Vec<TypeSummary>> {
    let client = RiksdagClient::new(config)?;
    let download_throttle = Throttle::new(config.download_delay);
    let mut summaries = Vec::with_capacity(config.document_types.len());

    for doc_type in &config.document_types {
        let mut archive = DocumentArchive::open(config.data_dir.join(&doc_type.folder))?;
        let mut stats = DownloadStats::default();

        println!("\n{}", "=".repeat(60));
        println!("Document type: {} -> {}/", doc_type.code, doc_type.folder);
        println!("{}", "=".repeat(60));

        let mut unique: Vec<TaggedDocument> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for search_term in &config.search_terms {
            println!("\n  Searching for '{}'...", search_term);

            let docs = client
                .fetch_all_documents(
                    search_term,
                    &doc_type.code,
                    &config.date_from,
                    options.limit,
                )
                .await?;

            merge_unique(&mut unique, &mut seen_ids, docs, search_term);
        }

        stats.total_found = unique.len();
        println!("\n  Total unique documents: {}", group_digits(unique.len()));

        if options.dry_run {
            println!("  [DRY RUN - skipping downloads]");
            summaries.push(TypeSummary {
                code: doc_type.code.clone(),
                folder: doc_type.folder.clone(),
                stats,
            });
            continue;
        }

        println!("  Downloading content...");

        let total = unique.len();
        for (i, doc) in unique.iter().enumerate() {
            let position = i + 1;

            if doc.meta.id.is_empty() {
                stats.skipped += 1;
                continue;
            }

            if archive.contains(&doc.meta.id) {
                stats.skipped += 1;
                continue;
            }

            match client.fetch_document_content(&doc.meta.id).await {
                Ok(content) => {
                    archive.save(&content, &doc.meta, &doc.search_term)?;
                    stats.downloaded += 1;
                }
                Err(_) => {
                    stats.failed += 1;
                }
            }

            if position % PROGRESS_INTERVAL == 0 || position == total {
                println!(
                    "    Progress: {}/{}",
                    group_digits(position),
                    group_digits(total)
                );
            }

            download_throttle.pause().await;
        }

        summaries.push(TypeSummary {
            code: doc_type.code.clone(),
            folder: doc_type.folder.clone(),
            stats,
        });
    }

    Ok(summaries)
}

/// Print the end-of-run summary: per-type counters, totals, and disk usage
/// per output folder.
pub fn print_summary(config: &Config, summaries: &[TypeSummary]) {
    println!("\n{}", "=".repeat(60));
    println!("DOWNLOAD SUMMARY");
    println!("{}", "=".repeat(60));

    let mut totals = DownloadStats::default();

    for summary in summaries {
        let s = summary.stats;
        println!("\n{}/ ({}):", summary.folder, summary.code);
        println!("  Found:      {}", group_digits(s.total_found));
        println!("  Downloaded: {}", group_digits(s.downloaded));
        println!("  Skipped:    {}", group_digits(s.skipped));
        println!("  Failed:     {}", group_digits(s.failed));

        totals.total_found += s.total_found;
        totals.downloaded += s.downloaded;
        totals.skipped += s.skipped;
        totals.failed += s.failed;
    }

    println!("\nTOTAL:");
    println!("  Found:      {}", group_digits(totals.total_found));
    println!("  Downloaded: {}", group_digits(totals.downloaded));
    println!("  Skipped:    {}", group_digits(totals.skipped));
    println!("  Failed:     {}", group_digits(totals.failed));

    println!("\nDisk usage:");
    for summary in summaries {
        let dir = config.data_dir.join(&summary.folder);
        if !dir.exists() {
            continue;
        }
        match DocumentArchive::open(dir).and_then(|a| a.disk_usage()) {
            Ok((files, bytes)) => {
                let size_mb = bytes as f64 / (1024.0 * 1024.0);
                println!(
                    "  {}/: {} files, {:.1} MB",
                    summary.folder,
                    group_digits(files),
                    size_mb
                );
            }
            Err(err) => {
                println!("  {}/: unreadable ({})", summary.folder, err);
            }
        }
    }
}

/// Format a count with thousands separators, e.g. 1234567 -> "1,234,567".
pub fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
