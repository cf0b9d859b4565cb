/*!
Error metrics of a trained model on held-out windows
*/
use crate::data::window::Dataset;
use crate::error::{Error, Result};
use crate::model::SequenceModel;
use crate::CpuFloat;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Aggregate prediction errors.
///
/// Both metrics are computed on scaled closes, not prices, so they are in units of the scaler's feature range.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean squared error
    pub mse: CpuFloat,
    /// Mean absolute error
    pub mae: CpuFloat,
}

impl Metrics {
    /// Compare predictions against targets. Fails if there are none.
    pub fn between(predictions: &[CpuFloat], targets: &[CpuFloat]) -> Result<Metrics> {
        if predictions.len() != targets.len() {
            return Err(Error::Shape {
                expected: targets.len(),
                actual: predictions.len(),
            });
        }
        if targets.is_empty() {
            return Err(Error::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        let n = targets.len() as CpuFloat;
        let (squared, absolute) = predictions
            .iter()
            .zip_eq(targets.iter())
            .map(|(p, y)| p - y)
            .fold((0.0, 0.0), |(squared, absolute), err| {
                (squared + err * err, absolute + err.abs())
            });
        Ok(Metrics {
            mse: squared / n,
            mae: absolute / n,
        })
    }
    /// Root mean squared error
    #[inline]
    pub fn rmse(&self) -> CpuFloat {
        self.mse.sqrt()
    }
}

/// Predict every window of `test` and measure the error against its targets
pub fn evaluate<M: SequenceModel + ?Sized>(model: &M, test: &Dataset) -> Result<Metrics> {
    let inputs: Vec<&[CpuFloat]> = test.inputs().collect();
    let predictions = model.predict_batch(&inputs)?;
    Metrics::between(&predictions, &test.targets())
}
