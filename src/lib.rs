//! Benchmark log analysis: load `timestamp_ms,label,value` logs, normalize
//! them into labelled series and summarize each one.

pub mod config;
pub mod data;
pub mod error;
pub mod harness;
pub mod render;
pub mod sample;
pub mod stats;

pub use data::aggregate::{aggregate, AggregateOptions, SourceSpec};
pub use data::model::{RawRecord, Series, SeriesReport};
pub use data::units::{Conversion, SizeUnit};
pub use error::PipelineError;
pub use stats::{fit_linear, summarize, RegressionFit, Summary};
