/// Data layer: image sources, pixel extraction, and dataset assembly.
///
/// Architecture:
/// ```text
///  dropped / picked files
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  name + decode → DynamicImage
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  batch    │  one item at a time, in submission order
///   └──────────┘
///        │  paint onto RenderSurface, threshold
///        ▼
///   ┌──────────┐
///   │  extract  │  RGBA → BinaryVector
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  LabeledSample { input, output: {label: 1} } → Dataset
///   └──────────┘
/// ```

pub mod batch;
pub mod extract;
pub mod model;
pub mod source;
