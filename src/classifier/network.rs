//! Fully connected sigmoid network trained with per-sample backpropagation
//! and momentum.

use super::{Classification, Classifier, ClassifierError, TrainingConfig, TrainingStats};
use crate::data::model::{BinaryVector, Dataset};
use crate::rng::SimpleRng;

const MOMENTUM: f64 = 0.1;
const WEIGHT_SEED: u64 = 0x5eed_61f5;
/// Record the training error every this many iterations.
const HISTORY_PERIOD: usize = 10;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Layer {
    input_size: usize,
    output_size: usize,
    /// Row-major `output_size x input_size`: row `j` feeds neuron `j`.
    weights: Vec<f64>,
    biases: Vec<f64>,
    /// Previous weight update, for momentum.
    changes: Vec<f64>,
}

impl Layer {
    fn new(input_size: usize, output_size: usize, rng: &mut SimpleRng) -> Self {
        let weights = (0..input_size * output_size)
            .map(|_| rng.range(-0.2, 0.2))
            .collect();
        let biases = (0..output_size).map(|_| rng.range(-0.2, 0.2)).collect();
        Layer {
            input_size,
            output_size,
            weights,
            biases,
            changes: vec![0.0; input_size * output_size],
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        (0..self.output_size)
            .map(|j| {
                let row = &self.weights[j * self.input_size..(j + 1) * self.input_size];
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                sigmoid(z + self.biases[j])
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A small feed-forward classifier. Untrained until [`Classifier::train`]
/// succeeds; every training run starts from freshly seeded weights.
#[derive(Debug, Clone, Default)]
pub struct FeedForwardNet {
    labels: Vec<String>,
    layers: Vec<Layer>,
}

impl FeedForwardNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels in output-neuron order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Expected input length, once trained.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.input_size)
    }

    /// Activations of every layer, input included.
    fn activations(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut outs = Vec::with_capacity(self.layers.len() + 1);
        outs.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(&outs[outs.len() - 1]);
            outs.push(next);
        }
        outs
    }

    /// One backpropagation step on a single pattern. Returns its MSE.
    fn train_pattern(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> f64 {
        let outs = self.activations(input);
        let output = &outs[outs.len() - 1];

        let errors: Vec<f64> = target.iter().zip(output).map(|(t, o)| t - o).collect();
        let mse = errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64;

        // Deltas from the output layer backwards.
        let mut delta: Vec<f64> = errors
            .iter()
            .zip(output)
            .map(|(e, o)| e * o * (1.0 - o))
            .collect();

        for idx in (0..self.layers.len()).rev() {
            let incoming = &outs[idx];

            // Delta of the layer below, computed with the weights before update.
            let prev_delta = (idx > 0).then(|| {
                let layer = &self.layers[idx];
                (0..layer.input_size)
                    .map(|k| {
                        let err: f64 = (0..layer.output_size)
                            .map(|j| delta[j] * layer.weights[j * layer.input_size + k])
                            .sum();
                        err * incoming[k] * (1.0 - incoming[k])
                    })
                    .collect::<Vec<f64>>()
            });

            let layer = &mut self.layers[idx];
            for j in 0..layer.output_size {
                let d = delta[j];
                for k in 0..layer.input_size {
                    let w = j * layer.input_size + k;
                    let change = learning_rate * d * incoming[k] + MOMENTUM * layer.changes[w];
                    layer.changes[w] = change;
                    layer.weights[w] += change;
                }
                layer.biases[j] += learning_rate * d;
            }

            if let Some(pd) = prev_delta {
                delta = pd;
            }
        }

        mse
    }
}

impl Classifier for FeedForwardNet {
    fn train(
        &mut self,
        dataset: &Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainingStats, ClassifierError> {
        let first = dataset.samples().first().ok_or(ClassifierError::EmptyDataset)?;
        let input_size = first.input.len();
        if let Some(bad) = dataset
            .samples()
            .iter()
            .find(|s| s.input.len() != input_size)
        {
            return Err(ClassifierError::InputSize {
                expected: input_size,
                actual: bad.input.len(),
            });
        }

        if config.use_gpu {
            log::warn!("GPU training requested but no GPU backend is available, using CPU");
        }

        let labels = dataset.labels();
        let patterns: Vec<(Vec<f64>, Vec<f64>)> = dataset
            .samples()
            .iter()
            .map(|s| {
                // Labels absent from a sample's output are zero targets.
                let target = labels
                    .iter()
                    .map(|l| s.output.get(l).copied().map(f64::from).unwrap_or(0.0))
                    .collect();
                (s.input.as_f64(), target)
            })
            .collect();

        let mut sizes = vec![input_size];
        sizes.extend(config.hidden_layers.iter().copied().filter(|&n| n > 0));
        sizes.push(labels.len());

        let mut rng = SimpleRng::new(WEIGHT_SEED);
        self.layers = sizes
            .windows(2)
            .map(|w| Layer::new(w[0], w[1], &mut rng))
            .collect();
        self.labels = labels;

        let mut error = 1.0;
        let mut iterations = 0;
        let mut error_history = Vec::new();

        while iterations < config.iterations && error > config.error_threshold {
            let mut sum = 0.0;
            for (input, target) in &patterns {
                sum += self.train_pattern(input, target, config.learning_rate);
            }
            error = sum / patterns.len() as f64;
            iterations += 1;

            if iterations % HISTORY_PERIOD == 0 || iterations == 1 {
                error_history.push((iterations, error));
            }
        }
        if error_history.last().map(|&(i, _)| i) != Some(iterations) && iterations > 0 {
            error_history.push((iterations, error));
        }

        log::info!(
            "Trained {:?} on {} samples: {} iterations, error {:.5}",
            sizes,
            patterns.len(),
            iterations,
            error
        );

        Ok(TrainingStats {
            iterations,
            error,
            error_history,
            error_threshold: config.error_threshold,
        })
    }

    fn classify(&self, input: &BinaryVector) -> Result<Classification, ClassifierError> {
        let expected = self.input_size().ok_or(ClassifierError::NotTrained)?;
        if input.len() != expected {
            return Err(ClassifierError::InputSize {
                expected,
                actual: input.len(),
            });
        }

        let outs = self.activations(&input.as_f64());
        let output = &outs[outs.len() - 1];

        let mut scores: Vec<(String, f64)> = self
            .labels
            .iter()
            .cloned()
            .zip(output.iter().copied())
            .collect();
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (label, confidence) = scores.first().cloned().ok_or(ClassifierError::NotTrained)?;
        Ok(Classification {
            label,
            confidence,
            scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LabeledSample;

    fn vector(bits: &[u8]) -> BinaryVector {
        BinaryVector::from_bits(bits.to_vec())
    }

    fn toy_dataset() -> Dataset {
        vec![
            LabeledSample::new(vector(&[1, 1, 0, 0]), "left"),
            LabeledSample::new(vector(&[0, 0, 1, 1]), "right"),
            LabeledSample::new(vector(&[1, 0, 0, 0]), "left"),
            LabeledSample::new(vector(&[0, 0, 0, 1]), "right"),
        ]
        .into_iter()
        .collect()
    }

    fn toy_config() -> TrainingConfig {
        TrainingConfig {
            iterations: 5000,
            hidden_layers: vec![4],
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn learns_a_separable_toy_problem() {
        let mut net = FeedForwardNet::new();
        let stats = net.train(&toy_dataset(), &toy_config()).unwrap();

        assert!(stats.iterations <= 5000);
        assert!(stats.error < 0.05, "error {}", stats.error);
        assert_eq!(net.labels(), &["left".to_string(), "right".to_string()]);

        let c = net.classify(&vector(&[1, 1, 0, 0])).unwrap();
        assert_eq!(c.label, "left");
        assert!(c.confidence > 0.5);
        assert_eq!(c.scores.len(), 2);
        assert!(c.scores[0].1 >= c.scores[1].1);

        assert_eq!(net.classify(&vector(&[0, 0, 1, 1])).unwrap().label, "right");
    }

    #[test]
    fn training_is_deterministic() {
        let mut a = FeedForwardNet::new();
        let mut b = FeedForwardNet::new();
        let sa = a.train(&toy_dataset(), &toy_config()).unwrap();
        let sb = b.train(&toy_dataset(), &toy_config()).unwrap();
        assert_eq!(sa, sb);
    }

    #[test]
    fn iteration_cap_is_respected() {
        let config = TrainingConfig {
            iterations: 3,
            error_threshold: 0.0,
            ..toy_config()
        };
        let stats = FeedForwardNet::new().train(&toy_dataset(), &config).unwrap();
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.error_history.first().map(|h| h.0), Some(1));
        assert_eq!(stats.error_history.last().map(|h| h.0), Some(3));
        assert_eq!(stats.error_threshold, 0.0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = FeedForwardNet::new()
            .train(&Dataset::new(), &TrainingConfig::default())
            .unwrap_err();
        assert_eq!(err, ClassifierError::EmptyDataset);
    }

    #[test]
    fn mixed_input_sizes_are_rejected() {
        let ds: Dataset = vec![
            LabeledSample::new(vector(&[1, 0]), "a"),
            LabeledSample::new(vector(&[1, 0, 1]), "b"),
        ]
        .into_iter()
        .collect();
        let err = FeedForwardNet::new()
            .train(&ds, &TrainingConfig::default())
            .unwrap_err();
        assert_eq!(err, ClassifierError::InputSize { expected: 2, actual: 3 });
    }

    #[test]
    fn classify_before_training_fails() {
        let err = FeedForwardNet::new().classify(&vector(&[1])).unwrap_err();
        assert_eq!(err, ClassifierError::NotTrained);
    }

    #[test]
    fn classify_checks_input_length() {
        let mut net = FeedForwardNet::new();
        net.train(&toy_dataset(), &toy_config()).unwrap();
        let err = net.classify(&vector(&[1, 0])).unwrap_err();
        assert_eq!(err, ClassifierError::InputSize { expected: 4, actual: 2 });
    }

    #[test]
    fn single_label_dataset_still_trains() {
        let ds: Dataset = vec![LabeledSample::new(vector(&[1, 0, 1]), "only")]
            .into_iter()
            .collect();
        let mut net = FeedForwardNet::new();
        net.train(&ds, &toy_config()).unwrap();
        let c = net.classify(&vector(&[0, 1, 0])).unwrap();
        assert_eq!(c.label, "only");
    }
}
