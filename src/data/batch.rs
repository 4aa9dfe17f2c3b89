use super::extract::RenderSurface;
use super::model::{label_from_name, Dataset, LabeledSample};
use super::source::{DecodeError, ImageSource};

/// Where a processor is in its batch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProcessorState {
    /// Not started yet.
    Idle,
    /// The next `step()` handles the item at this index.
    ProcessingAt(usize),
    /// Every item was extracted; the dataset has been handed out.
    Done,
    /// An item failed to decode; nothing was handed out.
    Failed,
}

/// Result of one [`BatchProcessor::step`].
#[derive(Debug)]
pub enum BatchProgress {
    /// `done` of `total` items recorded so far.
    Pending { done: usize, total: usize },
    /// The complete dataset, delivered once.
    Finished(Dataset),
    /// The batch was abandoned, delivered once.
    Aborted(DecodeError),
    /// The processor already reached a terminal state.
    Spent,
}

/// Turns an ordered batch of image sources into a labeled [`Dataset`].
///
/// Items are handled one per [`step`](Self::step), strictly in submission
/// order. A decode failure abandons the whole batch: no partial dataset is
/// ever delivered.
pub struct BatchProcessor {
    sources: Vec<Box<dyn ImageSource>>,
    surface: RenderSurface,
    invert: bool,
    dataset: Dataset,
    state: ProcessorState,
}

impl BatchProcessor {
    pub fn new(sources: Vec<Box<dyn ImageSource>>, invert: bool) -> Self {
        BatchProcessor {
            sources,
            surface: RenderSurface::new(),
            invert,
            dataset: Dataset::new(),
            state: ProcessorState::Idle,
        }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Number of items in the batch.
    pub fn total(&self) -> usize {
        self.sources.len()
    }

    /// Leave `Idle`. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.state == ProcessorState::Idle {
            self.state = ProcessorState::ProcessingAt(0);
        }
    }

    /// Handle exactly one item and report progress.
    ///
    /// An `Idle` processor is started first. An empty batch finishes on its
    /// first step with an empty dataset.
    pub fn step(&mut self) -> BatchProgress {
        self.start();

        let index = match self.state {
            ProcessorState::ProcessingAt(i) => i,
            _ => return BatchProgress::Spent,
        };
        let total = self.sources.len();

        if index < total {
            let source = &self.sources[index];
            let image = match source.decode() {
                Ok(img) => img,
                Err(e) => {
                    self.state = ProcessorState::Failed;
                    self.dataset = Dataset::new();
                    return BatchProgress::Aborted(e);
                }
            };

            self.surface.paint(&image);
            let vector = self.surface.extract(self.invert);
            let label = label_from_name(source.name());
            let (w, h) = self.surface.dimensions();
            log::debug!(
                "[{}/{}] {} ({w}x{h}) -> label {:?}, {} set",
                index + 1,
                total,
                source.name(),
                label,
                vector.ones()
            );
            self.dataset.push(LabeledSample::new(vector, label));
        }

        let next = index + 1;
        if next < total {
            self.state = ProcessorState::ProcessingAt(next);
            BatchProgress::Pending { done: next, total }
        } else {
            self.state = ProcessorState::Done;
            BatchProgress::Finished(std::mem::take(&mut self.dataset))
        }
    }

    /// Step until the batch resolves. `None` once the result was already
    /// handed out.
    pub fn finish(&mut self) -> Option<Result<Dataset, DecodeError>> {
        loop {
            match self.step() {
                BatchProgress::Pending { .. } => {}
                BatchProgress::Finished(dataset) => return Some(Ok(dataset)),
                BatchProgress::Aborted(e) => return Some(Err(e)),
                BatchProgress::Spent => return None,
            }
        }
    }
}

/// Process a whole batch, resolving once with the dataset or once with the
/// first decode error.
pub fn run(sources: Vec<Box<dyn ImageSource>>, invert: bool) -> Result<Dataset, DecodeError> {
    // A fresh processor always resolves.
    BatchProcessor::new(sources, invert)
        .finish()
        .unwrap_or_else(|| Ok(Dataset::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::tests::png_bytes;
    use crate::data::source::MemorySource;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn solid(name: &str, w: u32, h: u32, color: [u8; 4]) -> Box<dyn ImageSource> {
        Box::new(MemorySource::new(name, png_bytes(w, h, color)))
    }

    #[test]
    fn cat_and_dog_all_light() {
        let batch = vec![solid("cat.png", 4, 4, WHITE), solid("dog.jpg", 4, 4, WHITE)];
        let ds = run(batch, false).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples()[0].label(), "cat");
        assert_eq!(ds.samples()[1].label(), "dog");
        for sample in ds.samples() {
            assert_eq!(sample.input.len(), 16);
            assert_eq!(sample.input.ones(), 0);
            assert_eq!(sample.output.len(), 1);
        }
    }

    #[test]
    fn samples_follow_submission_order() {
        let names = ["z.png", "a.png", "m.png", "a.png"];
        let batch = names.iter().map(|n| solid(n, 2, 2, BLACK)).collect();
        let ds = run(batch, false).unwrap();
        let labels: Vec<&str> = ds.samples().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["z", "a", "m", "a"]);
    }

    #[test]
    fn mixed_sizes_keep_their_own_lengths() {
        let batch = vec![
            solid("big.png", 8, 8, BLACK),
            solid("small.png", 2, 3, BLACK),
            solid("big.png", 8, 8, WHITE),
        ];
        let ds = run(batch, false).unwrap();
        let lens: Vec<usize> = ds.samples().iter().map(|s| s.input.len()).collect();
        assert_eq!(lens, vec![64, 6, 64]);
        assert_eq!(ds.samples()[0].input.ones(), 64);
        assert_eq!(ds.samples()[2].input.ones(), 0);
    }

    #[test]
    fn invert_flag_reaches_every_item() {
        let batch = vec![solid("a.png", 3, 1, WHITE), solid("b.png", 3, 1, BLACK)];
        let ds = run(batch, true).unwrap();
        assert_eq!(ds.samples()[0].input.bits(), &[1, 1, 1]);
        assert_eq!(ds.samples()[1].input.bits(), &[0, 0, 0]);
    }

    #[test]
    fn one_bad_file_aborts_everything() {
        let batch: Vec<Box<dyn ImageSource>> = vec![
            solid("a.png", 2, 2, WHITE),
            Box::new(MemorySource::new("broken.png", vec![0u8; 10])),
            solid("c.png", 2, 2, WHITE),
        ];
        let err = run(batch, false).unwrap_err();
        assert!(err.to_string().starts_with("broken.png"));
    }

    #[test]
    fn state_machine_walks_each_index_once() {
        let batch = vec![
            solid("a.png", 1, 1, WHITE),
            solid("b.png", 1, 1, WHITE),
            solid("c.png", 1, 1, WHITE),
        ];
        let mut p = BatchProcessor::new(batch, false);
        assert_eq!(p.state(), ProcessorState::Idle);

        p.start();
        assert_eq!(p.state(), ProcessorState::ProcessingAt(0));

        assert!(matches!(p.step(), BatchProgress::Pending { done: 1, total: 3 }));
        assert_eq!(p.state(), ProcessorState::ProcessingAt(1));
        assert!(matches!(p.step(), BatchProgress::Pending { done: 2, total: 3 }));
        assert_eq!(p.state(), ProcessorState::ProcessingAt(2));

        match p.step() {
            BatchProgress::Finished(ds) => assert_eq!(ds.len(), 3),
            other => panic!("expected Finished, got {other:?}"),
        }
        assert_eq!(p.state(), ProcessorState::Done);

        // Delivered exactly once.
        assert!(matches!(p.step(), BatchProgress::Spent));
    }

    #[test]
    fn failure_is_terminal_and_delivered_once() {
        let batch: Vec<Box<dyn ImageSource>> = vec![
            solid("a.png", 1, 1, WHITE),
            Box::new(MemorySource::missing("b.png")),
        ];
        let mut p = BatchProcessor::new(batch, false);
        assert!(matches!(p.step(), BatchProgress::Pending { .. }));
        assert!(matches!(p.step(), BatchProgress::Aborted(DecodeError::Empty { .. })));
        assert_eq!(p.state(), ProcessorState::Failed);
        assert!(matches!(p.step(), BatchProgress::Spent));
    }

    #[test]
    fn finish_resolves_only_once() {
        let mut p = BatchProcessor::new(vec![solid("cat.png", 2, 2, WHITE)], false);
        let ds = p.finish().unwrap().unwrap();
        assert_eq!(ds.len(), 1);
        assert!(p.finish().is_none());

        let missing: Box<dyn ImageSource> = Box::new(MemorySource::missing("gone.png"));
        let mut p = BatchProcessor::new(vec![missing], false);
        assert!(matches!(p.finish(), Some(Err(DecodeError::Empty { .. }))));
        assert!(p.finish().is_none());
    }

    #[test]
    fn empty_batch_finishes_immediately() {
        let mut p = BatchProcessor::new(Vec::new(), false);
        match p.step() {
            BatchProgress::Finished(ds) => assert!(ds.is_empty()),
            other => panic!("expected Finished, got {other:?}"),
        }
        assert_eq!(p.state(), ProcessorState::Done);
    }
}
