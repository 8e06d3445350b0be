//! Training configuration
//!
//! Hyperparameters and data locations for a training run, read from JSON.
//! Every field is optional; missing fields take the defaults below.

use crate::data::MissingDataPolicy;
use crate::error::{NetworkError, Result};
use crate::layers::WeightInit;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const TRAIN_IMAGES_FILE: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS_FILE: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES_FILE: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS_FILE: &str = "t10k-labels-idx1-ubyte";

/// Configuration for a training run.
///
/// # Example
///
/// ```json
/// {
///   "learning_rate": 0.1,
///   "epochs": 3,
///   "seed": 42,
///   "weight_init": "xavier",
///   "missing_data": "abort",
///   "data_dir": "data/MNIST/raw"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Gradient descent step size
    pub learning_rate: f64,

    /// Passes over the training set
    pub epochs: usize,

    /// Seed for weight initialization; time-based when absent
    pub seed: Option<u64>,

    /// Weight initialization scheme: "xavier" or "uniform"
    pub weight_init: WeightInit,

    /// What to do when a dataset file cannot be read: "abort" or "skip"
    pub missing_data: MissingDataPolicy,

    /// Directory holding the four MNIST IDX files
    pub data_dir: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 3,
            seed: None,
            weight_init: WeightInit::default(),
            missing_data: MissingDataPolicy::default(),
            data_dir: PathBuf::from("data/MNIST/raw"),
        }
    }
}

impl TrainingConfig {
    pub fn train_images(&self) -> PathBuf {
        self.data_dir.join(TRAIN_IMAGES_FILE)
    }

    pub fn train_labels(&self) -> PathBuf {
        self.data_dir.join(TRAIN_LABELS_FILE)
    }

    pub fn test_images(&self) -> PathBuf {
        self.data_dir.join(TEST_IMAGES_FILE)
    }

    pub fn test_labels(&self) -> PathBuf {
        self.data_dir.join(TEST_LABELS_FILE)
    }
}

/// Loads a training configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use backprop_mlp::config::load_config;
///
/// let cfg = load_config("config/mnist.json").unwrap();
/// assert!(cfg.learning_rate > 0.0);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges that the JSON schema cannot express.
pub fn validate_config(config: &TrainingConfig) -> Result<()> {
    if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
        return Err(NetworkError::Config(format!(
            "learning_rate must be a positive number, got {}",
            config.learning_rate
        )));
    }

    if config.epochs == 0 {
        return Err(NetworkError::Config(
            "epochs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
