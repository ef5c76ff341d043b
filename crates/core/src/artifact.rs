use crate::error::ArtifactError;
use crate::models::{EmbeddedPageRecord, PageRecord};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn read_page_records(path: &Path) -> Result<Vec<PageRecord>, ArtifactError> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

pub fn write_page_records(path: &Path, records: &[PageRecord]) -> Result<(), ArtifactError> {
    write_json_atomic(path, records)
}

pub fn write_embedded_records(
    path: &Path,
    records: &[EmbeddedPageRecord],
) -> Result<(), ArtifactError> {
    write_json_atomic(path, records)
}

/// Serializes into a sibling temporary file and renames it into place, so
/// the destination always holds either the previous complete artifact or
/// the new one.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    let written = (|| {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok::<_, ArtifactError>(())
    })();

    if let Err(error) = written {
        let _ = fs::remove_file(&tmp);
        return Err(error);
    }

    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::{read_page_records, write_page_records};
    use crate::models::PageRecord;
    use std::fs;
    use tempfile::tempdir;

    fn sample(pages: &[(u32, &str)]) -> Vec<PageRecord> {
        pages
            .iter()
            .map(|(page, text)| PageRecord {
                page: *page,
                text: (*text).to_string(),
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_order_and_content() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("pages.json");
        let records = sample(&[(1, "um"), (2, ""), (3, "três")]);

        write_page_records(&path, &records)?;
        let loaded = read_page_records(&path)?;

        assert_eq!(loaded, records);
        Ok(())
    }

    #[test]
    fn write_leaves_no_temporary_file_and_replaces_content(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("pages.json");

        write_page_records(&path, &sample(&[(1, "old")]))?;
        write_page_records(&path, &sample(&[(1, "new")]))?;

        assert!(!dir.path().join("pages.json.tmp").exists());
        let loaded = read_page_records(&path)?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "new");
        Ok(())
    }

    #[test]
    fn artifact_keeps_wire_names_and_unescaped_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("pages.json");

        write_page_records(&path, &sample(&[(12, "Seção de emergência")]))?;

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"pagina\""));
        assert!(raw.contains("\"texto\""));
        assert!(raw.contains("Seção de emergência"));
        Ok(())
    }
}
