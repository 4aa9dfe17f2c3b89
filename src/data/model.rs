use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// BinaryVector – one flattened glyph
// ---------------------------------------------------------------------------

/// Row-major sequence of 0/1 bits extracted from an image.
/// Length is always `width * height` of the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BinaryVector(Vec<u8>);

impl BinaryVector {
    pub(crate) fn from_bits(bits: Vec<u8>) -> Self {
        debug_assert!(bits.iter().all(|&b| b <= 1));
        BinaryVector(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    /// Number of bits set to 1.
    pub fn ones(&self) -> usize {
        self.0.iter().filter(|&&b| b == 1).count()
    }

    /// Bits as network activations.
    pub fn as_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&b| f64::from(b)).collect()
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Derive a class label from a file name: everything before the first `.`.
///
/// `"cat.png"` → `"cat"`, `"cat.v2.png"` → `"cat"`, `"README"` → `"README"`.
pub fn label_from_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

// ---------------------------------------------------------------------------
// LabeledSample – one training example
// ---------------------------------------------------------------------------

/// `{ "input": [...], "output": { "<label>": 1 } }`
///
/// The output mapping is a sparse one-hot encoding: it holds only the
/// sample's own label. Every other label is implicitly zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSample {
    pub input: BinaryVector,
    pub output: BTreeMap<String, u8>,
}

impl LabeledSample {
    pub fn new(input: BinaryVector, label: &str) -> Self {
        let mut output = BTreeMap::new();
        output.insert(label.to_string(), 1);
        LabeledSample { input, output }
    }

    /// The single label this sample is tagged with.
    pub fn label(&self) -> &str {
        self.output
            .iter()
            .find(|&(_, &v)| v == 1)
            .map(|(k, _)| k.as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Dataset – ordered collection of samples
// ---------------------------------------------------------------------------

/// Samples in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: LabeledSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct labels in the order they were first seen.
    pub fn labels(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for sample in &self.samples {
            for key in sample.output.keys() {
                if !seen.contains(key) {
                    seen.push(key.clone());
                }
            }
        }
        seen
    }

    /// One JSON object per sample, each terminated by `\n`.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for sample in &self.samples {
            out.push_str(&serde_json::to_string(sample)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl FromIterator<LabeledSample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledSample>>(iter: I) -> Self {
        Dataset {
            samples: iter.into_iter().collect(),
        }
    }
}
