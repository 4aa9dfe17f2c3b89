//! Trainable classifier boundary.
//!
//! Consumes a [`Dataset`](crate::data::model::Dataset) for training and a
//! single [`BinaryVector`](crate::data::model::BinaryVector) for
//! classification. The label vocabulary is whatever set of labels the
//! training dataset contains.

pub mod network;

use thiserror::Error;

use crate::data::model::{BinaryVector, Dataset};

pub use network::FeedForwardNet;

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

/// Knobs for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Stop once the mean squared error drops to this value.
    pub error_threshold: f64,
    /// Upper bound on passes over the dataset.
    pub iterations: usize,
    /// Request a GPU backend. Only a CPU backend exists; the flag is logged.
    pub use_gpu: bool,
    /// Neuron count of each hidden layer.
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            error_threshold: 0.005,
            iterations: 2000,
            use_gpu: false,
            hidden_layers: vec![16],
            learning_rate: 0.3,
        }
    }
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStats {
    /// Passes actually performed.
    pub iterations: usize,
    /// Mean squared error after the last pass.
    pub error: f64,
    /// `(iteration, error)` sampled during training, for plotting.
    pub error_history: Vec<(usize, f64)>,
    /// Stopping threshold this run was trained against.
    pub error_threshold: f64,
}

/// Outcome of classifying one vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Most likely label.
    pub label: String,
    /// Output activation of `label`, in `[0, 1]`.
    pub confidence: f64,
    /// Every known label with its activation, highest first.
    pub scores: Vec<(String, f64)>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error("input has {actual} values, network expects {expected}")]
    InputSize { expected: usize, actual: usize },

    #[error("classifier has not been trained")]
    NotTrained,
}

// ---------------------------------------------------------------------------
// The boundary itself
// ---------------------------------------------------------------------------

pub trait Classifier {
    /// Fit to `dataset`, replacing whatever was learned before.
    fn train(
        &mut self,
        dataset: &Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainingStats, ClassifierError>;

    /// Most likely label for `input`.
    fn classify(&self, input: &BinaryVector) -> Result<Classification, ClassifierError>;
}
