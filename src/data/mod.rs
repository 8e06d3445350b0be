//! Labeled datasets for training and evaluation.
//!
//! `Dataset::load` pairs an IDX image file with its label file. What happens
//! when a split cannot be opened is decided by `MissingDataPolicy`.

pub mod idx;

use crate::error::{ensure_len, NetworkError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

pub use idx::{decode_images, decode_labels, one_hot, read_images, read_labels, NUM_CLASSES};

/// Reaction to a dataset file that cannot be opened or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Propagate the I/O error.
    #[default]
    Abort,
    /// Log a warning and continue with an empty dataset.
    Skip,
}

/// Parallel input and one-hot target vectors.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub inputs: Vec<Array1<f64>>,
    pub targets: Vec<Array1<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Array1<f64>>, targets: Vec<Array1<f64>>) -> Result<Self> {
        ensure_len("label count", inputs.len(), targets.len())?;
        Ok(Self { inputs, targets })
    }

    /// Loads an image file and its label file.
    ///
    /// Malformed files are always an error; unreadable ones follow `policy`.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        images: P,
        labels: Q,
        num_classes: usize,
        policy: MissingDataPolicy,
    ) -> Result<Self> {
        let images = images.as_ref();
        let labels = labels.as_ref();

        let loaded = read_images(images)
            .and_then(|inputs| Ok((inputs, read_labels(labels, num_classes)?)))
            .and_then(|(inputs, targets)| Self::new(inputs, targets));

        match (loaded, policy) {
            (Ok(dataset), _) => {
                info!(
                    "loaded {} samples from {} / {}",
                    dataset.len(),
                    images.display(),
                    labels.display()
                );
                Ok(dataset)
            }
            (Err(NetworkError::Io(err)), MissingDataPolicy::Skip) => {
                warn!(
                    "could not read {} / {} ({}), continuing with no samples",
                    images.display(),
                    labels.display(),
                    err
                );
                Ok(Self::default())
            }
            (Err(err), _) => Err(err),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Length of the feature vectors, `None` for an empty dataset.
    pub fn feature_len(&self) -> Option<usize> {
        self.inputs.first().map(|input| input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_requires_matching_counts() {
        let err = Dataset::new(vec![array![0.0]], Vec::new()).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { .. }));

        let dataset = Dataset::new(vec![array![0.0, 1.0]], vec![array![1.0, 0.0]]).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.feature_len(), Some(2));
    }

    #[test]
    fn test_missing_files_follow_policy() {
        let missing = "definitely/not/here-images.idx3-ubyte";
        let err = Dataset::load(missing, missing, NUM_CLASSES, MissingDataPolicy::Abort).unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)));

        let dataset = Dataset::load(missing, missing, NUM_CLASSES, MissingDataPolicy::Skip).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.feature_len(), None);
    }
}
