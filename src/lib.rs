/*!
Forecast a stock's next few daily closes with a stacked LSTM written in Rust using PyTorch bindings, and turn the
forecast into a buy/sell/hold signal.

The pipeline is deliberately small: a min-max scaled, sliding-window view of a single close series is used to fit a
two-layer LSTM, which is then evaluated on held-out windows and rolled forward autoregressively for five business days.
See [`pipeline::run`] for the full composition.
*/
#![forbid(missing_docs)]

pub mod config;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod forecast;
pub mod lstm;
pub mod model;
pub mod pipeline;
pub mod signal;
pub mod train;
pub mod util;

pub use config::PipelineConfig;
pub use error::{Error, Result};

/// The floating point type to be used for CPU calculations
pub type CpuFloat = f64;

/// The floating point type to be used for GPU calculations
pub type GpuFloat = f32;
