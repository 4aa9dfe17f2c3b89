use thiserror::Error;

use crate::classifier::TrainingConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("error threshold must be a number between 0 and 1, got {0:?}")]
    ErrorThreshold(String),

    #[error("iterations must be a positive whole number, got {0:?}")]
    Iterations(String),

    #[error("hidden layers must be comma-separated positive sizes, got {0:?}")]
    HiddenLayers(String),
}

// ---------------------------------------------------------------------------
// Settings form
// ---------------------------------------------------------------------------

/// Raw contents of the settings panel, exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub error_threshold: String,
    pub iterations: String,
    pub hidden_layers: String,
    pub use_gpu: bool,
    /// Treat light pixels as ink when extracting.
    pub invert: bool,
}

impl Default for SettingsForm {
    fn default() -> Self {
        let defaults = TrainingConfig::default();
        Self {
            error_threshold: defaults.error_threshold.to_string(),
            iterations: defaults.iterations.to_string(),
            hidden_layers: join_sizes(&defaults.hidden_layers),
            use_gpu: defaults.use_gpu,
            invert: false,
        }
    }
}

impl SettingsForm {
    /// Validate the form into a training configuration.
    pub fn parse(&self) -> Result<TrainingConfig, ConfigError> {
        let threshold_text = self.error_threshold.trim();
        let error_threshold = threshold_text
            .parse::<f64>()
            .ok()
            .filter(|v| *v > 0.0 && *v < 1.0)
            .ok_or_else(|| ConfigError::ErrorThreshold(threshold_text.to_string()))?;

        let iterations_text = self.iterations.trim();
        let iterations = iterations_text
            .parse::<usize>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| ConfigError::Iterations(iterations_text.to_string()))?;

        let hidden_layers = parse_sizes(&self.hidden_layers)?;

        Ok(TrainingConfig {
            error_threshold,
            iterations,
            use_gpu: self.use_gpu,
            hidden_layers,
            ..TrainingConfig::default()
        })
    }
}

fn parse_sizes(text: &str) -> Result<Vec<usize>, ConfigError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|tok| {
            tok.trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ConfigError::HiddenLayers(text.to_string()))
        })
        .collect()
}

fn join_sizes(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
