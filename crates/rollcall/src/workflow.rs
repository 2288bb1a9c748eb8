//! Enrollment and classification on top of a [`FaceEngine`].

use crate::config::RecognizerOptions;
use crate::dataset::{Dataset, DatasetEntry};
use crate::error::{Error, Result};
use crate::imaging;
use rollcall_core::{Descriptor, DetectedFace, FaceEngine, Rect};
use std::path::Path;

/// Temp-file prefix for query images.
const QUERY_TEMP_PREFIX: &str = "64ab59ac42d69274f06eadb11348969e";

/// A detected face joined with the dataset entry it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFace {
    pub label: String,
    pub descriptor: Descriptor,
    pub rect: Rect,
}

impl ClassifiedFace {
    fn new(entry: &DatasetEntry, rect: Rect) -> Self {
        Self {
            label: entry.label().to_string(),
            descriptor: entry.descriptor().clone(),
            rect,
        }
    }
}

/// Owns the engine and the dataset.
///
/// Call [`rebuild_index`](Self::rebuild_index) after enrolling and before
/// classifying. [`close`](Self::close) releases the engine.
pub struct Recognizer<E: FaceEngine> {
    engine: E,
    options: RecognizerOptions,
    dataset: Dataset,
    index_stale: bool,
}

impl<E: FaceEngine> Recognizer<E> {
    pub fn new(engine: E, options: RecognizerOptions) -> Self {
        Self {
            engine,
            options,
            dataset: Dataset::new(),
            index_stale: false,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Enroll the single face in `path` under `label`.
    pub fn enroll(&mut self, path: &Path, label: &str) -> Result<()> {
        let face = self.detect_one(path, label)?;
        let ordinal = self.dataset.push(DatasetEntry::new(label, face.descriptor));
        self.index_stale = true;
        tracing::info!(label, ordinal, path = %path.display(), "enrolled");
        Ok(())
    }

    /// Install the current dataset into the engine as its sample index.
    pub fn rebuild_index(&mut self) {
        let (descriptors, ordinals) = self.dataset.samples();
        self.engine.set_samples(descriptors, ordinals);
        self.index_stale = false;
        tracing::info!(samples = self.dataset.len(), "sample index rebuilt");
    }

    /// The only face in `path`, unclassified.
    pub fn recognize_single(&mut self, path: &Path) -> Result<DetectedFace> {
        self.detect_one(path, QUERY_TEMP_PREFIX)
    }

    /// Every face in `path`, unclassified, in engine order.
    pub fn recognize_multiple(&mut self, path: &Path) -> Result<Vec<DetectedFace>> {
        self.detect_file(path, QUERY_TEMP_PREFIX)
    }

    /// Identify the only face in `path`.
    pub fn classify_single(&mut self, path: &Path) -> Result<ClassifiedFace> {
        let face = self.recognize_single(path)?;
        self.warn_if_stale();
        self.match_face(&face).ok_or(Error::NoMatch)
    }

    /// Identify every face in `path`. Unmatched faces are left out.
    pub fn classify_multiple(&mut self, path: &Path) -> Result<Vec<ClassifiedFace>> {
        let faces = self.recognize_multiple(path)?;
        self.warn_if_stale();
        let classified: Vec<ClassifiedFace> =
            faces.iter().filter_map(|f| self.match_face(f)).collect();
        tracing::info!(
            path = %path.display(),
            detected = faces.len(),
            matched = classified.len(),
            "classified"
        );
        Ok(classified)
    }

    pub fn save_dataset(&self, path: &Path) -> Result<()> {
        self.dataset.save(path)
    }

    /// Append the entries stored at `path` to the dataset.
    pub fn load_dataset(&mut self, path: &Path) -> Result<usize> {
        let count = self.dataset.load(path)?;
        if count > 0 {
            self.index_stale = true;
        }
        Ok(count)
    }

    /// Release the engine.
    pub fn close(self) {
        self.engine.release();
    }

    fn warn_if_stale(&self) {
        if self.index_stale {
            tracing::warn!("classifying against a stale sample index; call rebuild_index first");
        }
    }

    fn match_face(&self, face: &DetectedFace) -> Option<ClassifiedFace> {
        let ordinal = self
            .engine
            .classify_threshold(&face.descriptor, self.options.tolerance)?;
        let entry = self.dataset.get(ordinal)?;
        tracing::debug!(label = entry.label(), ordinal, rect = ?face.rect, "face matched");
        Some(ClassifiedFace::new(entry, face.rect))
    }

    fn detect_one(&mut self, path: &Path, temp_prefix: &str) -> Result<DetectedFace> {
        let mut faces = self.detect_file(path, temp_prefix)?;
        match faces.len() {
            0 => Err(Error::NoFaceFound),
            1 => Ok(faces.remove(0)),
            n => Err(Error::AmbiguousFace(n)),
        }
    }

    /// Run detection, on a grayscale temp copy when configured.
    fn detect_file(&mut self, path: &Path, temp_prefix: &str) -> Result<Vec<DetectedFace>> {
        let model = self.options.detection;
        if !self.options.use_gray {
            return Ok(self.engine.detect(path, model)?);
        }

        // Removed on drop, whichever way detection ends.
        let temp = imaging::gray_temp_file(path, temp_prefix)?;
        Ok(self.engine.detect(temp.path(), model)?)
    }
}
