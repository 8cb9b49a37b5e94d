/// Data layer: benchmark logs in, labelled series out.
///
/// Architecture:
/// ```text
///   run.csv  (timestamp_ms, label, value)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  rows → RawRecord, malformed rows skipped
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ units, label │  normalize values, pick display label
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  Series + Summary (+ RegressionFit) per source
///   └───────────┘
/// ```

pub mod aggregate;
pub mod label;
pub mod loader;
pub mod model;
pub mod units;
