use crate::canvas::{capture_vector, DrawingBoard};
use crate::classifier::{Classification, Classifier, FeedForwardNet, TrainingStats};
use crate::color::LabelColors;
use crate::data::batch::{BatchProcessor, BatchProgress, ProcessorState};
use crate::data::model::{BinaryVector, Dataset};
use crate::data::source::ImageSource;
use crate::settings::SettingsForm;

// ---------------------------------------------------------------------------
// Small state enums
// ---------------------------------------------------------------------------

/// Which dataset a submitted batch becomes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BatchTarget {
    Training,
    Testing,
}

impl BatchTarget {
    pub fn describe(self) -> &'static str {
        match self {
            BatchTarget::Training => "training",
            BatchTarget::Testing => "test",
        }
    }
}

/// Whether the classifier reflects the current training set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClassifierStatus {
    Untrained,
    Trained,
    /// Trained, but the training set has changed since.
    Stale,
}

/// One row of a test run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub expected: String,
    pub predicted: String,
    pub confidence: f64,
}

impl TestResult {
    pub fn is_correct(&self) -> bool {
        self.expected == self.predicted
    }
}

/// A loaded dataset plus its cached JSON-lines view.
#[derive(Debug, Clone)]
pub struct LoadedSet {
    pub dataset: Dataset,
    pub json_lines: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: SettingsForm,
    pub board: DrawingBoard,

    pub training_set: Option<LoadedSet>,
    pub test_set: Option<LoadedSet>,

    /// Where dropped files go.
    pub drop_target: BatchTarget,
    /// Batch currently being read, one item per frame.
    pending: Option<(BatchTarget, BatchProcessor)>,
    /// `(done, total)` of the pending batch.
    pub batch_progress: Option<(usize, usize)>,

    classifier: FeedForwardNet,
    pub classifier_status: ClassifierStatus,
    pub label_colors: LabelColors,
    pub training_stats: Option<TrainingStats>,

    /// Last vector captured from the board, and what it was classified as.
    pub test_vector: Option<BinaryVector>,
    pub drawing_result: Option<Classification>,

    pub test_results: Vec<TestResult>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            settings: SettingsForm::default(),
            board: DrawingBoard::new(),
            training_set: None,
            test_set: None,
            drop_target: BatchTarget::Training,
            pending: None,
            batch_progress: None,
            classifier: FeedForwardNet::new(),
            classifier_status: ClassifierStatus::Untrained,
            label_colors: LabelColors::default(),
            training_stats: None,
            test_vector: None,
            drawing_result: None,
            test_results: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Whether a batch is being read.
    pub fn is_busy(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|(_, p)| matches!(p.state(), ProcessorState::ProcessingAt(_)))
    }

    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    /// Queue a batch of image sources. Refused while another batch runs.
    pub fn submit_batch(&mut self, target: BatchTarget, sources: Vec<Box<dyn ImageSource>>) -> bool {
        if self.is_busy() {
            self.status_message = Some("Still reading the previous batch".to_string());
            return false;
        }
        if sources.is_empty() {
            return false;
        }
        log::info!("Reading {} {} image(s)", sources.len(), target.describe());
        let mut processor = BatchProcessor::new(sources, self.settings.invert);
        processor.start();
        self.batch_progress = Some((0, processor.total()));
        self.pending = Some((target, processor));
        self.status_message = None;
        true
    }

    /// Advance the pending batch by one item. Returns `true` while work remains.
    pub fn poll_batch(&mut self) -> bool {
        let Some((target, processor)) = self.pending.as_mut() else {
            return false;
        };
        let target = *target;

        match processor.step() {
            BatchProgress::Pending { done, total } => {
                self.batch_progress = Some((done, total));
                true
            }
            BatchProgress::Finished(dataset) => {
                self.pending = None;
                self.batch_progress = None;
                self.accept_dataset(target, dataset);
                false
            }
            BatchProgress::Aborted(e) => {
                self.pending = None;
                self.batch_progress = None;
                let err = anyhow::Error::new(e);
                log::error!("Failed to read {} batch: {err:#}", target.describe());
                self.status_message = Some(format!("Error: {err:#}"));
                false
            }
            BatchProgress::Spent => {
                self.pending = None;
                self.batch_progress = None;
                false
            }
        }
    }

    fn accept_dataset(&mut self, target: BatchTarget, dataset: Dataset) {
        let json_lines = match dataset.to_json_lines() {
            Ok(text) => text,
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };
        log::info!(
            "Loaded {} {} samples with labels {:?}",
            dataset.len(),
            target.describe(),
            dataset.labels()
        );
        let loaded = LoadedSet {
            dataset,
            json_lines,
        };
        match target {
            BatchTarget::Training => {
                self.training_set = Some(loaded);
                if self.classifier_status == ClassifierStatus::Trained {
                    self.classifier_status = ClassifierStatus::Stale;
                }
            }
            BatchTarget::Testing => {
                self.test_set = Some(loaded);
                self.test_results.clear();
            }
        }
    }

    /// Train a fresh classifier on the training set.
    ///
    /// The previous classifier is only replaced when training succeeds.
    pub fn train(&mut self) {
        let config = match self.settings.parse() {
            Ok(c) => c,
            Err(e) => {
                self.status_message = Some(format!("Settings: {e}"));
                return;
            }
        };
        let Some(set) = &self.training_set else {
            self.status_message = Some("Load training images first".to_string());
            return;
        };

        let mut candidate = FeedForwardNet::new();
        match candidate.train(&set.dataset, &config) {
            Ok(stats) => {
                self.status_message = Some(format!(
                    "Trained: {} iterations, error {:.5}",
                    stats.iterations, stats.error
                ));
                self.classifier = candidate;
                self.classifier_status = ClassifierStatus::Trained;
                self.label_colors = LabelColors::new(self.classifier.labels());
                self.training_stats = Some(stats);
                self.test_results.clear();
                self.drawing_result = None;
            }
            Err(e) => {
                log::error!("Training failed: {e}");
                self.status_message = Some(format!("Training failed: {e}"));
            }
        }
    }

    fn ensure_trained(&mut self) -> bool {
        match self.classifier_status {
            ClassifierStatus::Trained => true,
            ClassifierStatus::Untrained => {
                self.status_message = Some("Train the network first".to_string());
                false
            }
            ClassifierStatus::Stale => {
                self.status_message =
                    Some("Training images changed since the last training; train again".to_string());
                false
            }
        }
    }

    /// Classify every sample of the test set.
    pub fn test_dataset(&mut self) {
        if !self.ensure_trained() {
            return;
        }
        let Some(set) = &self.test_set else {
            self.status_message = Some("Load test images first".to_string());
            return;
        };

        let mut results = Vec::with_capacity(set.dataset.len());
        for sample in set.dataset.samples() {
            match self.classifier.classify(&sample.input) {
                Ok(c) => results.push(TestResult {
                    expected: sample.label().to_string(),
                    predicted: c.label,
                    confidence: c.confidence,
                }),
                Err(e) => {
                    self.status_message = Some(format!("Test failed: {e}"));
                    return;
                }
            }
        }

        self.test_results = results;
        if let Some(acc) = self.test_accuracy() {
            log::info!("Test accuracy {:.1}%", acc * 100.0);
            self.status_message = Some(format!("Test accuracy {:.1}%", acc * 100.0));
        }
    }

    /// Fraction of correct rows in the last test run.
    pub fn test_accuracy(&self) -> Option<f64> {
        if self.test_results.is_empty() {
            return None;
        }
        let correct = self.test_results.iter().filter(|r| r.is_correct()).count();
        Some(correct as f64 / self.test_results.len() as f64)
    }

    /// Capture the board and classify it.
    pub fn classify_drawing(&mut self) {
        if !self.ensure_trained() {
            return;
        }
        let vector = capture_vector(&self.board, self.settings.invert);
        match self.classifier.classify(&vector) {
            Ok(c) => {
                self.test_vector = Some(vector);
                self.drawing_result = Some(c);
                self.status_message = None;
            }
            Err(e) => {
                self.status_message = Some(format!("Cannot classify drawing: {e}"));
            }
        }
    }

    pub fn clear_board(&mut self) {
        self.board.clear();
        self.drawing_result = None;
    }
}
