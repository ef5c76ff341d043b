use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::embeddings::DEFAULT_MODEL;
use crate::error::ArtifactError;

/// Declares that physical page 1 of the file at `path` is logical page
/// `first_logical_page`; each subsequent physical page increments the
/// logical page by one. The descriptor list is trusted as given — see
/// `validate_pagination` for the optional consistency check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeDescriptor {
    pub path: PathBuf,
    pub first_logical_page: u32,
}

/// One logical page of the corpus, text trimmed. Written once by the
/// extractor, read once by the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRecord {
    #[serde(rename = "pagina")]
    pub page: u32,
    #[serde(rename = "texto")]
    pub text: String,
}

/// A non-empty page paired with its vector. `embedding` has the same length
/// for every record produced by one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedPageRecord {
    #[serde(rename = "pagina")]
    pub page: u32,
    #[serde(rename = "texto")]
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Per-volume provenance captured during extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub path: PathBuf,
    pub first_logical_page: u32,
    pub physical_pages: usize,
    pub checksum: String,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub volumes: Vec<VolumeDescriptor>,
    pub intermediate_path: PathBuf,
    pub final_path: PathBuf,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}
