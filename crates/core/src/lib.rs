pub mod artifact;
pub mod embeddings;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod generate;
pub mod lock;
pub mod models;
pub mod validate;

pub use artifact::{read_page_records, write_embedded_records, write_page_records};
pub use embeddings::{
    embedder_for_model, Embedder, HashedNgramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_MODEL,
};
pub use error::{ArtifactError, EmbedError, ExtractError, LockError};
pub use extract::{extract_corpus, run_extraction, ExtractionReport};
pub use extractor::{LopdfExtractor, PageSource};
pub use generate::{embed_corpus, run_generation, EmbeddingReport};
pub use lock::RunLock;
pub use models::{
    EmbeddedPageRecord, PageRecord, PipelineConfig, VolumeDescriptor, VolumeSummary,
};
pub use validate::{validate_pagination, PaginationIssue};
