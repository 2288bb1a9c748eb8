use serde::{Deserialize, Serialize};

/// Raw detector output in source-image coordinates, with optional facial landmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    /// Five-point facial landmarks: [left_eye, right_eye, nose, left_mouth, right_mouth].
    pub landmarks: Option<[(f32, f32); 5]>,
}

/// Integer pixel rectangle of a face in the image it was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Y coordinate one past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

impl From<&BoundingBox> for Rect {
    fn from(b: &BoundingBox) -> Self {
        Self {
            x: b.x.round() as i32,
            y: b.y.round() as i32,
            width: b.width.max(0.0).round() as u32,
            height: b.height.max(0.0).round() as u32,
        }
    }
}

/// Face descriptor vector. Serialized as a bare array of floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor {
    pub values: Vec<f32>,
}

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Euclidean distance between two descriptors. Infinite when their lengths differ.
    pub fn distance(&self, other: &Descriptor) -> f32 {
        if self.values.len() != other.values.len() {
            return f32::INFINITY;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// A face found by the engine: where it is and what it looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub rect: Rect,
    pub descriptor: Descriptor,
}

/// Known descriptors paired with caller-assigned ordinals.
///
/// `descriptors[i]` belongs to `ordinals[i]`. Lookup always scans every sample.
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    descriptors: Vec<Descriptor>,
    ordinals: Vec<usize>,
}

impl SampleIndex {
    /// Build an index from parallel lists. Extra elements in the longer list are ignored.
    pub fn new(mut descriptors: Vec<Descriptor>, mut ordinals: Vec<usize>) -> Self {
        let len = descriptors.len().min(ordinals.len());
        if descriptors.len() != ordinals.len() {
            tracing::warn!(
                descriptors = descriptors.len(),
                ordinals = ordinals.len(),
                "sample lists differ in length; truncating"
            );
        }
        descriptors.truncate(len);
        ordinals.truncate(len);
        Self { descriptors, ordinals }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Ordinal of the closest sample, if its distance is within `tolerance`.
    pub fn classify(&self, probe: &Descriptor, tolerance: f32) -> Option<usize> {
        let mut best_dist = f32::INFINITY;
        let mut best_idx: Option<usize> = None;

        for (i, sample) in self.descriptors.iter().enumerate() {
            let dist = probe.distance(sample);
            if dist < best_dist {
                best_dist = dist;
                best_idx = Some(i);
            }
        }

        match best_idx {
            Some(idx) if best_dist <= tolerance => {
                tracing::debug!(distance = best_dist, ordinal = self.ordinals[idx], "sample matched");
                Some(self.ordinals[idx])
            }
            _ => {
                tracing::debug!(distance = best_dist, tolerance, "no sample within tolerance");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(values: &[f32]) -> Descriptor {
        Descriptor::new(values.to_vec())
    }

    #[test]
    fn test_distance_identical() {
        assert_eq!(d(&[1.0, 2.0, 3.0]).distance(&d(&[1.0, 2.0, 3.0])), 0.0);
    }

    #[test]
    fn test_distance_pythagorean() {
        assert!((d(&[0.0, 0.0]).distance(&d(&[3.0, 4.0])) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_length_mismatch() {
        assert_eq!(d(&[0.1, 0.2]).distance(&d(&[0.1, 0.2, 0.9])), f32::INFINITY);
    }

    #[test]
    fn test_classify_skips_other_dimension_samples() {
        // A 2-d sample sharing the query's prefix must not match a 3-d query
        let index = SampleIndex::new(vec![d(&[0.1, 0.2]), d(&[0.1, 0.2, 0.5])], vec![0, 1]);
        assert_eq!(index.classify(&d(&[0.1, 0.2, 0.9]), 0.4), Some(1));

        let only_short = SampleIndex::new(vec![d(&[0.1, 0.2])], vec![0]);
        assert_eq!(only_short.classify(&d(&[0.1, 0.2, 0.9]), 0.4), None);
    }

    #[test]
    fn test_classify_scans_whole_index() {
        // Best match is the last sample
        let index = SampleIndex::new(
            vec![d(&[0.0, 1.0, 0.0]), d(&[0.0, 0.0, 1.0]), d(&[1.0, 0.0, 0.0])],
            vec![0, 1, 2],
        );
        assert_eq!(index.classify(&d(&[1.0, 0.0, 0.0]), 0.5), Some(2));
    }

    #[test]
    fn test_classify_returns_ordinal_not_position() {
        let index = SampleIndex::new(vec![d(&[0.0]), d(&[5.0])], vec![7, 3]);
        assert_eq!(index.classify(&d(&[5.1]), 0.5), Some(3));
    }

    #[test]
    fn test_classify_exact_match_any_tolerance() {
        let index = SampleIndex::new(vec![d(&[0.25, 0.5])], vec![0]);
        assert_eq!(index.classify(&d(&[0.25, 0.5]), 1e-6), Some(0));
    }

    #[test]
    fn test_classify_tolerance_is_inclusive() {
        let index = SampleIndex::new(vec![d(&[0.0, 0.0])], vec![0]);
        assert_eq!(index.classify(&d(&[3.0, 4.0]), 5.0), Some(0));
        assert_eq!(index.classify(&d(&[3.0, 4.0]), 4.9), None);
    }

    #[test]
    fn test_classify_empty_index() {
        let index = SampleIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.classify(&d(&[1.0]), 10.0), None);
    }

    #[test]
    fn test_sample_index_truncates_mismatched_lists() {
        let index = SampleIndex::new(vec![d(&[0.0]), d(&[1.0])], vec![0]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rect_from_bbox() {
        let b = BoundingBox {
            x: 10.4, y: -2.6, width: 30.5, height: -1.0,
            confidence: 0.9, landmarks: None,
        };
        let r = Rect::from(&b);
        assert_eq!(r, Rect::new(10, -3, 31, 0));
        assert_eq!(Rect::new(0, 5, 10, 20).bottom(), 25);
    }

    #[test]
    fn test_descriptor_serializes_as_array() {
        let json = serde_json::to_string(&d(&[0.5, -1.0])).unwrap();
        assert_eq!(json, "[0.5,-1.0]");
    }
}
