use crate::error::ExtractError;
use lopdf::Document;
use std::path::Path;

/// Raw text access to one source volume. Yields every physical page in
/// physical order; a page with no text layer yields an empty string.
pub trait PageSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PageSource for LopdfExtractor {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let document = Document::load(path).map_err(|error| ExtractError::PdfParse {
            path: path.display().to_string(),
            detail: error.to_string(),
        })?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| ExtractError::PdfParse {
                    path: path.display().to_string(),
                    detail: format!("physical page {page_no}: {error}"),
                })?;
            pages.push(text);
        }

        Ok(pages)
    }
}
