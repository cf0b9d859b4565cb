/*!
Splitting windows into fitting, validation and test partitions, and fitting a model on them
*/
use crate::config::TrainConfig;
use crate::data::window::Dataset;
use crate::error::{Error, Result};
use crate::model::ModelBuilder;
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Dataset sizes beyond which no search for a viable minimum is attempted
const MAX_VIABLE_SEARCH: usize = 1 << 16;

/// A dataset cut three ways
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Windows used for gradient updates
    pub fit: Dataset,
    /// Windows monitored during fitting, never trained on
    pub validation: Dataset,
    /// Windows held out for evaluation
    pub test: Dataset,
}

/// Partition sizes `(fit, validation, test)` for `n` windows.
///
/// The test partition takes `ceil(n * test_fraction)` windows; the validation partition is the trailing
/// `validation_fraction` of what remains, rounded so that the fitting partition is `floor(train * (1 - validation_fraction))`.
pub fn partition_sizes(n: usize, config: &TrainConfig) -> (usize, usize, usize) {
    let test = ((n as f64 * config.test_fraction).ceil() as usize).min(n);
    let train = n - test;
    let fit = (train as f64 * (1.0 - config.validation_fraction)).floor() as usize;
    let fit = fit.min(train);
    (fit, train - fit, test)
}

/// The smallest number of windows `config` can train on: one full batch, with every partition non-empty
pub fn minimum_windows(config: &TrainConfig) -> usize {
    let viable = (1..=MAX_VIABLE_SEARCH)
        .find(|&n| {
            let (fit, validation, test) = partition_sizes(n, config);
            fit > 0 && validation > 0 && test > 0
        })
        .unwrap_or(usize::MAX);
    viable.max(config.batch_size)
}

/// Deterministically shuffle and split a dataset, failing if it is below [`minimum_windows`]
pub fn split(dataset: &Dataset, config: &TrainConfig) -> Result<Split> {
    let required = minimum_windows(config);
    if dataset.len() < required {
        return Err(Error::InsufficientData {
            required,
            actual: dataset.len(),
        });
    }
    let (fit, validation, test) = partition_sizes(dataset.len(), config);
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(config.seed));
    let (test_ix, train_ix) = indices.split_at(test);
    let (fit_ix, validation_ix) = train_ix.split_at(fit);
    debug_assert_eq!(validation_ix.len(), validation);
    Ok(Split {
        fit: dataset.select(fit_ix),
        validation: dataset.select(validation_ix),
        test: dataset.select(test_ix),
    })
}

/// Shuffle `0..n` and cut it into batches of at most `batch_size`; only the last batch may be short
pub fn shuffled_batches<R: Rng>(rng: &mut R, n: usize, batch_size: usize) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
        .chunks(batch_size.max(1))
        .map(|batch| batch.to_vec())
        .collect()
}

/// A fitted model, along with the windows it never saw
#[derive(Debug)]
pub struct Trained<M> {
    /// The fitted model
    pub model: M,
    /// The held-out test windows
    pub test: Dataset,
}

/// Splits a dataset and fits a fresh model on it
#[derive(Debug, Clone)]
pub struct Trainer<B> {
    /// Builds and fits the model
    pub builder: B,
    /// Splitting and fitting parameters
    pub config: TrainConfig,
}

impl<B: ModelBuilder> Trainer<B> {
    /// Create a new trainer
    pub fn new(builder: B, config: TrainConfig) -> Trainer<B> {
        Trainer { builder, config }
    }
    /// Split `dataset` and fit a model on its training partition. Blocks until fitting is done.
    pub fn train(&self, dataset: &Dataset) -> Result<Trained<B::Model>> {
        let Split {
            fit,
            validation,
            test,
        } = split(dataset, &self.config)?;
        info!(
            "Training on {} windows, validating on {}, holding out {}",
            fit.len(),
            validation.len(),
            test.len()
        );
        let model = self.builder.fit(&fit, &validation, &self.config)?;
        Ok(Trained { model, test })
    }
}
