use super::{OutputError, OutputResult};
use crate::record::CandidateRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Consolidated output of a run
pub const FINAL_FILE_NAME: &str = "final_data.json";

/// HTML of the last page rendered
pub const RAW_HTML_FILE_NAME: &str = "raw_page.html";

/// Writes run artifacts as pretty-printed JSON under one directory
#[derive(Debug, Clone)]
pub struct JsonOutput {
    dir: PathBuf,
}

impl JsonOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory if it does not exist
    ///
    /// Failing here is fatal to a run, so the raw I/O error is returned.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Path of the file holding one category's records
    ///
    /// # Arguments
    ///
    /// * `index` - One-based position of the category in the run
    /// * `name` - Category name
    pub fn category_path(&self, index: usize, name: &str) -> PathBuf {
        self.dir.join(format!("{:03}_{}.json", index, name))
    }

    /// Writes one category's records, returning the file path
    pub fn write_category(
        &self,
        index: usize,
        name: &str,
        records: &[CandidateRecord],
    ) -> OutputResult<PathBuf> {
        let path = self.category_path(index, name);
        self.write_records(&path, records)?;
        tracing::info!("Saved {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Reads a previously written category file
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_category(
        &self,
        index: usize,
        name: &str,
    ) -> OutputResult<Option<Vec<CandidateRecord>>> {
        let path = self.category_path(index, name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| OutputError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Writes the consolidated, deduplicated record set
    pub fn write_consolidated(&self, records: &[CandidateRecord]) -> OutputResult<PathBuf> {
        let path = self.dir.join(FINAL_FILE_NAME);
        self.write_records(&path, records)?;
        tracing::info!(
            "Saved {} consolidated records to {}",
            records.len(),
            path.display()
        );
        Ok(path)
    }

    /// Overwrites the raw HTML dump with the given page content
    pub fn write_raw_html(&self, html: &str) -> OutputResult<PathBuf> {
        let path = self.dir.join(RAW_HTML_FILE_NAME);
        fs::write(&path, html).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn write_records(&self, path: &Path, records: &[CandidateRecord]) -> OutputResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(path, json).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AffiliateSource, RecordDraft};
    use tempfile::TempDir;

    fn record(url: &str) -> CandidateRecord {
        RecordDraft::new("Some Site", url, AffiliateSource::Porndude, "general")
            .build()
            .unwrap()
    }

    #[test]
    fn test_category_path_is_zero_padded() {
        let output = JsonOutput::new("/data");
        assert_eq!(
            output.category_path(3, "tubes"),
            PathBuf::from("/data/003_tubes.json")
        );
    }

    #[test]
    fn test_write_and_read_category() {
        let dir = TempDir::new().unwrap();
        let output = JsonOutput::new(dir.path());
        let records = vec![record("https://a.example"), record("https://b.example")];

        let path = output.write_category(1, "webcams", &records).unwrap();
        assert!(path.ends_with("001_webcams.json"));

        let loaded = output.read_category(1, "webcams").unwrap().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_read_missing_category() {
        let dir = TempDir::new().unwrap();
        let output = JsonOutput::new(dir.path());
        assert!(output.read_category(2, "general").unwrap().is_none());
    }

    #[test]
    fn test_read_corrupt_category() {
        let dir = TempDir::new().unwrap();
        let output = JsonOutput::new(dir.path());
        fs::write(output.category_path(2, "general"), "[{").unwrap();
        assert!(matches!(
            output.read_category(2, "general"),
            Err(OutputError::Format(_))
        ));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let output = JsonOutput::new(dir.path().join("a/b"));
        output.ensure_dir().unwrap();
        assert!(output.dir().is_dir());
    }

    #[test]
    fn test_consolidated_and_raw_html() {
        let dir = TempDir::new().unwrap();
        let output = JsonOutput::new(dir.path());

        output.write_consolidated(&[record("https://a.example")]).unwrap();
        output.write_raw_html("<html></html>").unwrap();

        let json = fs::read_to_string(dir.path().join(FINAL_FILE_NAME)).unwrap();
        assert!(json.contains("\"source_url\": \"https://a.example\""));
        assert_eq!(
            fs::read_to_string(dir.path().join(RAW_HTML_FILE_NAME)).unwrap(),
            "<html></html>"
        );
    }
}
