use crate::artifact::write_page_records;
use crate::error::ExtractError;
use crate::extractor::PageSource;
use crate::models::{PageRecord, PipelineConfig, VolumeDescriptor, VolumeSummary};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PROGRESS_EVERY_PAGES: u32 = 100;

#[derive(Debug)]
pub struct ExtractionReport {
    pub records: Vec<PageRecord>,
    pub volumes: Vec<VolumeSummary>,
    pub missing: Vec<PathBuf>,
}

pub fn digest_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Walks the declared volumes in list order and collects one trimmed
/// `PageRecord` per physical page, numbered `first_logical_page + index`.
/// A missing volume is skipped and reported; a present but unreadable
/// volume aborts the run.
pub fn extract_corpus(
    volumes: &[VolumeDescriptor],
    source: &impl PageSource,
) -> Result<ExtractionReport, ExtractError> {
    let mut records = Vec::new();
    let mut summaries = Vec::new();
    let mut missing = Vec::new();

    for descriptor in volumes {
        if !descriptor.path.is_file() {
            warn!(path = %descriptor.path.display(), "volume file not found, skipping");
            missing.push(descriptor.path.clone());
            continue;
        }

        info!(path = %descriptor.path.display(), "reading volume");
        let checksum = digest_file(&descriptor.path)?;
        let pages = source.page_texts(&descriptor.path)?;

        for (index, raw) in pages.iter().enumerate() {
            let page = descriptor.first_logical_page + index as u32;
            records.push(PageRecord {
                page,
                text: raw.trim().to_string(),
            });
            if page % PROGRESS_EVERY_PAGES == 0 {
                info!(page, "extraction progress");
            }
        }

        summaries.push(VolumeSummary {
            path: descriptor.path.clone(),
            first_logical_page: descriptor.first_logical_page,
            physical_pages: pages.len(),
            checksum,
            read_at: Utc::now(),
        });
    }

    Ok(ExtractionReport {
        records,
        volumes: summaries,
        missing,
    })
}

/// Full extraction stage: collect every page, then write the intermediate
/// artifact in one atomic replace.
pub fn run_extraction(
    config: &PipelineConfig,
    source: &impl PageSource,
) -> Result<ExtractionReport, ExtractError> {
    let report = extract_corpus(&config.volumes, source)?;
    write_page_records(&config.intermediate_path, &report.records)?;
    info!(
        pages = report.records.len(),
        path = %config.intermediate_path.display(),
        "intermediate artifact written"
    );
    Ok(report)
}
