//! Labeled descriptors and their JSON persistence.

use crate::error::{Error, Result};
use rollcall_core::Descriptor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One enrolled face. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "ID")]
    label: String,
    #[serde(rename = "Descriptor")]
    descriptor: Descriptor,
}

impl DatasetEntry {
    pub fn new(label: impl Into<String>, descriptor: Descriptor) -> Self {
        Self { label: label.into(), descriptor }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// Ordered entries. An entry's position is its ordinal; labels may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&DatasetEntry> {
        self.entries.get(ordinal)
    }

    /// Append an entry and return its ordinal.
    pub fn push(&mut self, entry: DatasetEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Parallel descriptor and ordinal lists, in dataset order.
    pub fn samples(&self) -> (Vec<Descriptor>, Vec<usize>) {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.descriptor.clone(), i))
            .unzip()
    }

    /// Write every entry as a JSON array, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut data = serde_json::to_vec(&self.entries)?;
        data.push(b'\n');
        std::fs::write(path, data)?;
        tracing::info!(path = %path.display(), entries = self.len(), "dataset saved");
        Ok(())
    }

    /// Append the entries stored at `path`. Returns how many were appended.
    ///
    /// The file is fully decoded before anything is appended.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        let loaded: Vec<DatasetEntry> = serde_json::from_slice(&data)?;
        let count = loaded.len();
        self.entries.extend(loaded);
        tracing::info!(path = %path.display(), appended = count, total = self.len(), "dataset loaded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(label: &str, values: &[f32]) -> DatasetEntry {
        DatasetEntry::new(label, Descriptor::new(values.to_vec()))
    }

    #[test]
    fn test_push_returns_ordinal() {
        let mut ds = Dataset::new();
        assert_eq!(ds.push(entry("Amy", &[0.1])), 0);
        assert_eq!(ds.push(entry("Amy", &[0.2])), 1);
        // Duplicate labels are separate entries
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().descriptor().values, vec![0.2]);
    }

    #[test]
    fn test_samples_are_parallel() {
        let mut ds = Dataset::new();
        ds.push(entry("Amy", &[1.0]));
        ds.push(entry("Raj", &[2.0]));
        let (descriptors, ordinals) = ds.samples();
        assert_eq!(ordinals, vec![0, 1]);
        assert_eq!(descriptors[1].values, vec![2.0]);
    }

    #[test]
    fn test_json_schema() {
        let json = serde_json::to_string(&entry("Penny", &[0.5, -0.25])).unwrap();
        assert_eq!(json, r#"{"ID":"Penny","Descriptor":[0.5,-0.25]}"#);
    }

    #[test]
    fn test_save_then_load_into_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");

        let mut ds = Dataset::new();
        ds.push(entry("Sheldon", &[0.1, 0.2, 0.3]));
        ds.push(entry("Leonard", &[-0.4, 0.5, 0.6]));
        ds.save(&path).unwrap();

        let mut restored = Dataset::new();
        assert_eq!(restored.load(&path).unwrap(), 2);
        assert_eq!(restored, ds);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");
        std::fs::write(&path, "garbage that is much longer than the dataset will be").unwrap();

        let mut ds = Dataset::new();
        ds.push(entry("Raj", &[1.0]));
        ds.save(&path).unwrap();

        let mut restored = Dataset::new();
        restored.load(&path).unwrap();
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_load_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");
        std::fs::write(&path, r#"[{"ID":"Howard","Descriptor":[1.0,2.0]}]"#).unwrap();

        let mut ds = Dataset::new();
        ds.push(entry("Bernadette", &[3.0, 4.0]));
        ds.load(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).unwrap().label(), "Bernadette");
        assert_eq!(ds.get(1).unwrap().label(), "Howard");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut ds = Dataset::new();
        ds.push(entry("Amy", &[1.0]));

        let err = ds.load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Dataset::new().load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_load_malformed_leaves_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");
        std::fs::write(&path, r#"[{"ID":"Amy","Descriptor":[1.0]}, {"ID": 3}]"#).unwrap();

        let mut ds = Dataset::new();
        let err = ds.load(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(ds.is_empty());
    }
}
