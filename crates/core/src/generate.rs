use crate::artifact::{read_page_records, write_embedded_records};
use crate::embeddings::Embedder;
use crate::error::EmbedError;
use crate::models::{EmbeddedPageRecord, PageRecord, PipelineConfig};
use tracing::{error, info};

const PROGRESS_EVERY_RECORDS: usize = 100;

#[derive(Debug)]
pub struct EmbeddingReport {
    pub embedded: usize,
    pub skipped_empty: usize,
    pub dimensions: usize,
}

/// Embeds every non-empty page in input order. Pages whose trimmed text is
/// empty are omitted entirely; they never receive a placeholder vector.
/// An embedding failure aborts the run after naming the offending page.
pub fn embed_corpus(
    records: &[PageRecord],
    embedder: &dyn Embedder,
) -> Result<(Vec<EmbeddedPageRecord>, EmbeddingReport), EmbedError> {
    let mut embedded = Vec::new();
    let mut skipped_empty = 0usize;

    info!(
        pages = records.len(),
        model = embedder.model_id(),
        "generating embeddings"
    );

    for record in records {
        let text = record.text.trim();
        if text.is_empty() {
            skipped_empty += 1;
            continue;
        }

        let embedding = match embedder.embed(text) {
            Ok(vector) => vector,
            Err(failure) => {
                error!(page = record.page, %failure, "embedding failed");
                return Err(EmbedError::Compute {
                    page: record.page,
                    detail: failure.to_string(),
                });
            }
        };

        embedded.push(EmbeddedPageRecord {
            page: record.page,
            text: text.to_string(),
            embedding,
        });

        if embedded.len() % PROGRESS_EVERY_RECORDS == 0 {
            info!(embedded = embedded.len(), "embedding progress");
        }
    }

    let report = EmbeddingReport {
        embedded: embedded.len(),
        skipped_empty,
        dimensions: embedder.dimensions(),
    };
    Ok((embedded, report))
}

/// Full generation stage: load the intermediate artifact, embed it, and
/// write the final artifact in one atomic replace.
pub fn run_generation(
    config: &PipelineConfig,
    embedder: &dyn Embedder,
) -> Result<EmbeddingReport, EmbedError> {
    let records = read_page_records(&config.intermediate_path)?;
    let (embedded, report) = embed_corpus(&records, embedder)?;
    write_embedded_records(&config.final_path, &embedded)?;
    info!(
        embedded = report.embedded,
        skipped_empty = report.skipped_empty,
        path = %config.final_path.display(),
        "final artifact written"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{embed_corpus, run_generation};
    use crate::artifact::write_page_records;
    use crate::embeddings::{Embedder, HashedNgramEmbedder};
    use crate::error::EmbedError;
    use crate::models::{EmbeddedPageRecord, PageRecord, PipelineConfig};
    use std::fs;
    use tempfile::tempdir;

    fn record(page: u32, text: &str) -> PageRecord {
        PageRecord {
            page,
            text: text.to_string(),
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn model_id(&self) -> &str {
            "failing"
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            if text == "will fail" {
                Err(EmbedError::Model("simulated outage".to_string()))
            } else {
                Ok(vec![0.0; 4])
            }
        }
    }

    #[test]
    fn empty_pages_are_omitted_from_the_final_records(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let embedder = HashedNgramEmbedder::new(16);
        let records = vec![
            record(56, "conduta clínica"),
            record(57, ""),
            record(58, "   "),
            record(59, "via aérea"),
        ];

        let (embedded, report) = embed_corpus(&records, &embedder)?;

        let pages: Vec<u32> = embedded.iter().map(|item| item.page).collect();
        assert_eq!(pages, vec![56, 59]);
        assert_eq!(report.embedded, 2);
        assert_eq!(report.skipped_empty, 2);
        Ok(())
    }

    #[test]
    fn every_record_has_the_model_dimensions() -> Result<(), Box<dyn std::error::Error>> {
        let embedder = HashedNgramEmbedder::new(32);
        let records = vec![record(1, "primeira"), record(2, "segunda página do texto")];

        let (embedded, report) = embed_corpus(&records, &embedder)?;

        assert_eq!(report.dimensions, 32);
        for item in &embedded {
            assert_eq!(item.embedding.len(), 32);
        }
        Ok(())
    }

    #[test]
    fn rerunning_on_the_same_input_is_bitwise_identical(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let embedder = HashedNgramEmbedder::new(64);
        let records = vec![record(1, "um texto qualquer"), record(2, "outro texto")];

        let (first, _) = embed_corpus(&records, &embedder)?;
        let (second, _) = embed_corpus(&records, &embedder)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn compute_failure_reports_the_offending_page() {
        let records = vec![record(1, "ok"), record(41, "will fail")];

        let result = embed_corpus(&records, &FailingEmbedder);

        match result {
            Err(EmbedError::Compute { page, .. }) => assert_eq!(page, 41),
            other => panic!("expected compute failure, got {other:?}"),
        }
    }

    #[test]
    fn run_generation_reads_and_writes_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = PipelineConfig {
            volumes: Vec::new(),
            intermediate_path: dir.path().join("pages.json"),
            final_path: dir.path().join("embeddings.json"),
            model: "hashed-ngram-16".to_string(),
        };
        write_page_records(
            &config.intermediate_path,
            &[record(1, "texto"), record(2, "")],
        )?;

        let embedder = HashedNgramEmbedder::new(16);
        let report = run_generation(&config, &embedder)?;

        assert_eq!(report.embedded, 1);
        assert_eq!(report.skipped_empty, 1);

        let raw = fs::read_to_string(&config.final_path)?;
        let loaded: Vec<EmbeddedPageRecord> = serde_json::from_str(&raw)?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].page, 1);
        assert_eq!(loaded[0].embedding.len(), 16);
        assert!(raw.contains("\"embedding\""));
        Ok(())
    }
}
