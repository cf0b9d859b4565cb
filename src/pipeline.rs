/*!
One end-to-end run: window, train, evaluate, forecast, recommend
*/
use crate::config::PipelineConfig;
use crate::data::window::WindowBuilder;
use crate::data::{PricePoint, PriceSeries};
use crate::error::{Error, Result};
use crate::evaluate::{evaluate, Metrics};
use crate::forecast::{Forecast, Forecaster};
use crate::model::ModelBuilder;
use crate::signal::Signal;
use crate::train::Trainer;
use log::info;

/// Everything a run produces
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The last observed close
    pub last: PricePoint,
    /// The raw forecast, including every rollout step
    pub forecast: Forecast,
    /// The forecast prices on the business days following `last`
    pub dated: Vec<PricePoint>,
    /// Errors on the held-out windows, in scaled units
    pub metrics: Metrics,
    /// The recommendation derived from the forecast
    pub signal: Signal,
}

/// Run the pipeline with the LSTM described by `config`
pub fn run(series: &PriceSeries, config: &PipelineConfig) -> Result<Report> {
    run_with(series, config, config.model.clone())
}

/// Run the pipeline, fitting whatever `builder` builds
pub fn run_with<B: ModelBuilder>(
    series: &PriceSeries,
    config: &PipelineConfig,
    builder: B,
) -> Result<Report> {
    if series.len() <= config.window_size {
        return Err(Error::InsufficientData {
            required: config.window_size + 1,
            actual: series.len(),
        });
    }

    info!("Windowing {} closes", series.len());
    let (dataset, scaler) = WindowBuilder::new(config.window_size).build(series)?;

    info!("Training on {} windows", dataset.len());
    let trained = Trainer::new(builder, config.train.clone()).train(&dataset)?;

    let metrics = evaluate(&trained.model, &trained.test)?;
    info!("Held-out mse = {:.6}, mae = {:.6}", metrics.mse, metrics.mae);

    let last_window = series.last_window(config.window_size)?;
    let forecast = Forecaster {
        horizon: config.horizon,
    }
    .forecast(&trained.model, &last_window, &scaler)?;
    let final_price = forecast.final_price().ok_or(Error::InsufficientData {
        required: 1,
        actual: 0,
    })?;

    let last = series.last();
    let signal = Signal::derive(last.c, final_price);
    info!(
        "Forecast {:.2} after {} days ({:+.2}%): {}",
        final_price, config.horizon, signal.pct_change, signal.recommendation
    );

    Ok(Report {
        last,
        dated: forecast.dated(last.t),
        forecast,
        metrics,
        signal,
    })
}
