/*!
The interface between the pipeline and whatever predicts the next close
*/
use crate::config::TrainConfig;
use crate::data::window::Dataset;
use crate::error::{Error, Result};
use crate::CpuFloat;

/// A trained function from a window of scaled closes to the next scaled close.
///
/// Prediction never changes the model: the same window always yields the same value.
pub trait SequenceModel {
    /// The number of closes this model expects per window
    fn window_size(&self) -> usize;
    /// Predict the next scaled close for each of a batch of windows
    fn predict_batch(&self, windows: &[&[CpuFloat]]) -> Result<Vec<CpuFloat>>;
    /// Predict the next scaled close after a single window
    fn predict(&self, window: &[CpuFloat]) -> Result<CpuFloat> {
        let mut prediction = self.predict_batch(&[window])?;
        prediction.pop().ok_or(Error::InsufficientData {
            required: 1,
            actual: 0,
        })
    }
}

/// Fit a fresh [`SequenceModel`] to training windows
pub trait ModelBuilder {
    /// The model produced
    type Model: SequenceModel;
    /// Fit a model on `fit`, monitoring but never training on `validation`
    fn fit(&self, fit: &Dataset, validation: &Dataset, config: &TrainConfig) -> Result<Self::Model>;
}

/// Check every window in a batch has the expected length
pub fn check_windows(expected: usize, windows: &[&[CpuFloat]]) -> Result<()> {
    match windows.iter().find(|window| window.len() != expected) {
        Some(window) => Err(Error::Shape {
            expected,
            actual: window.len(),
        }),
        None => Ok(()),
    }
}

/// The naive baseline: tomorrow closes where today did
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Persistence {
    /// The expected window size
    pub window_size: usize,
}

impl SequenceModel for Persistence {
    fn window_size(&self) -> usize {
        self.window_size
    }
    fn predict_batch(&self, windows: &[&[CpuFloat]]) -> Result<Vec<CpuFloat>> {
        check_windows(self.window_size, windows)?;
        Ok(windows.iter().map(|window| window[window.len() - 1]).collect())
    }
}

impl ModelBuilder for Persistence {
    type Model = Persistence;
    fn fit(&self, fit: &Dataset, _validation: &Dataset, _config: &TrainConfig) -> Result<Persistence> {
        Ok(Persistence {
            window_size: fit.window_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_repeats_last_close() {
        let model = Persistence { window_size: 3 };
        assert_eq!(model.predict(&[0.1, 0.2, 0.3]).unwrap(), 0.3);
        assert_eq!(
            model
                .predict_batch(&[&[0.1, 0.2, 0.3], &[0.5, 0.4, 0.0]])
                .unwrap(),
            vec![0.3, 0.0]
        );
    }

    #[test]
    fn wrong_window_length_is_a_shape_error() {
        let model = Persistence { window_size: 3 };
        assert!(matches!(
            model.predict(&[0.1, 0.2]),
            Err(Error::Shape {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            model.predict_batch(&[&[0.1, 0.2, 0.3], &[0.1; 4]]),
            Err(Error::Shape {
                expected: 3,
                actual: 4
            })
        ));
    }
}
