/*!
The LSTM: stacked recurrent layers over a window of scaled closes, projected down to the next scaled close
*/

use crate::config::{DeviceChoice, TrainConfig};
use crate::data::window::Dataset;
use crate::error::Result;
use crate::model::{check_windows, ModelBuilder, SequenceModel};
use crate::train::shuffled_batches;
use crate::{CpuFloat, GpuFloat};
use log::{debug, trace};
use num::NumCast;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tch::nn::{self, Linear, Module, OptimizerConfig, RNNConfig, VarStore, LSTM, RNN};
use tch::{Device, Reduction, Tensor};

/// The StockLSTM model: a stack of LSTM layers with dropout after each, read out at the last time step
pub struct StockLSTM {
    /// The variables backing every layer
    pub vs: VarStore,
    /// The number of closes per input window
    pub window_size: usize,
    /// The fraction of activations dropped after each recurrent layer while training
    pub dropout: f64,
    /// This model's LSTM layers, input first
    pub lstm_layers: Vec<LSTM>,
    /// This model's linear layer
    pub linear_layer: Linear,
}

impl std::fmt::Debug for StockLSTM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockLSTM")
            .field("device", &self.vs.device())
            .field("window_size", &self.window_size)
            .field("dropout", &self.dropout)
            .field("lstm_layers", &self.lstm_layers.len())
            .finish()
    }
}

impl StockLSTM {
    /// Feed a `[batch, window, 1]` tensor through the network, yielding a `[batch]` tensor of predictions.
    ///
    /// Dropout is only active when `train` is set.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let mut hidden = xs.shallow_clone();
        for layer in self.lstm_layers.iter() {
            let (output, _state) = layer.seq(&hidden);
            hidden = output.dropout(self.dropout, train);
        }
        let last = hidden.select(1, -1);
        self.linear_layer.forward(&last).squeeze_dim(-1)
    }
    /// Compute the mean squared error on a batch of inputs and targets
    pub fn loss(&self, xs: &Tensor, ys: &Tensor, train: bool) -> Tensor {
        self.forward_t(xs, train).mse_loss(ys, Reduction::Mean)
    }
    /// Package windows and their targets into input and target tensors on this model's device
    pub fn make_batch(&self, dataset: &Dataset, indices: &[usize]) -> (Tensor, Tensor) {
        let inputs: Vec<&[CpuFloat]> = indices
            .iter()
            .map(|&ix| &dataset.windows[ix].input[..])
            .collect();
        let targets: Vec<GpuFloat> = indices
            .iter()
            .map(|&ix| NumCast::from(dataset.windows[ix].target).unwrap_or(0.0))
            .collect();
        let xs = self.make_inputs(&inputs);
        let ys = Tensor::from(&targets[..]).to_device(self.vs.device());
        (xs, ys)
    }
    /// Package windows into a `[batch, window, 1]` input tensor on this model's device
    fn make_inputs(&self, windows: &[&[CpuFloat]]) -> Tensor {
        let mut input = Vec::<GpuFloat>::with_capacity(windows.len() * self.window_size);
        for window in windows {
            input.extend(window.iter().map(|&v| NumCast::from(v).unwrap_or(0.0 as GpuFloat)));
        }
        Tensor::from(&input[..])
            .view([windows.len() as i64, self.window_size as i64, 1])
            .to_device(self.vs.device())
    }
    /// The mean loss over a whole dataset, without dropout or gradients
    pub fn evaluate_loss(&self, dataset: &Dataset, batch_size: usize) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let indices: Vec<usize> = (0..dataset.len()).collect();
        let mut sum_loss = 0.0;
        tch::no_grad(|| {
            for batch in indices.chunks(batch_size.max(1)) {
                let (xs, ys) = self.make_batch(dataset, batch);
                let loss = self.loss(&xs, &ys, false).double_value(&[]);
                sum_loss += loss * batch.len() as f64;
            }
        });
        sum_loss / dataset.len() as f64
    }
}

impl SequenceModel for StockLSTM {
    fn window_size(&self) -> usize {
        self.window_size
    }
    fn predict_batch(&self, windows: &[&[CpuFloat]]) -> Result<Vec<CpuFloat>> {
        check_windows(self.window_size, windows)?;
        if windows.is_empty() {
            return Ok(Vec::new());
        }
        let output = tch::no_grad(|| self.forward_t(&self.make_inputs(windows), false));
        Ok((0..windows.len())
            .map(|ix| output.double_value(&[ix as i64]))
            .collect())
    }
}

/// A descriptor for an instance of the StockLSTM model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLSTMDesc {
    /// The size of the hidden LSTM layers to use
    pub hidden: usize,
    /// The number of hidden LSTM layers to use
    pub layers: usize,
    /// The fraction of activations dropped after each LSTM layer during training
    pub dropout: f64,
    /// Where to build and run the network
    pub device: DeviceChoice,
}

impl Default for StockLSTMDesc {
    fn default() -> StockLSTMDesc {
        StockLSTMDesc {
            hidden: 256,
            layers: 2,
            dropout: 0.4,
            device: DeviceChoice::Auto,
        }
    }
}

impl StockLSTMDesc {
    /// Build an untrained `StockLSTM` over a fresh `VarStore`
    pub fn build(&self, window_size: usize, device: Device) -> StockLSTM {
        let vs = VarStore::new(device);
        let root = vs.root();
        // Single-layer LSTMs, so that dropout can sit between them and be switched off for inference
        let lstm_layers = (0..self.layers.max(1))
            .map(|layer| {
                let inputs = if layer == 0 { 1 } else { self.hidden };
                let config = RNNConfig {
                    num_layers: 1,
                    dropout: 0.,
                    bidirectional: false,
                    batch_first: true,
                    ..Default::default()
                };
                nn::lstm(
                    &(&root / format!("lstm{}", layer)),
                    inputs as i64,
                    self.hidden as i64,
                    config,
                )
            })
            .collect();
        let linear_layer = nn::linear(&root / "linear", self.hidden as i64, 1, Default::default());
        StockLSTM {
            vs,
            window_size,
            dropout: self.dropout,
            lstm_layers,
            linear_layer,
        }
    }
}

impl ModelBuilder for StockLSTMDesc {
    type Model = StockLSTM;
    fn fit(&self, fit: &Dataset, validation: &Dataset, config: &TrainConfig) -> Result<StockLSTM> {
        tch::manual_seed(config.seed as i64);
        let lstm = self.build(fit.window_size, self.device.device());
        let mut opt = nn::Adam::default().build(&lstm.vs, config.learning_rate)?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        for epoch in 0..config.epochs {
            let mut sum_loss = 0.0;
            for (batch, indices) in shuffled_batches(&mut rng, fit.len(), config.batch_size)
                .iter()
                .enumerate()
            {
                let (xs, ys) = lstm.make_batch(fit, indices);
                let loss = lstm.loss(&xs, &ys, true);
                opt.backward_step(&loss);
                let loss = loss.double_value(&[]);
                trace!("Epoch {} batch {}: loss = {:.6}", epoch, batch, loss);
                sum_loss += loss * indices.len() as f64;
            }
            let validation_loss = lstm.evaluate_loss(validation, config.batch_size);
            debug!(
                "Epoch {}: training loss = {:.6}, validation loss = {:.6}",
                epoch,
                sum_loss / fit.len().max(1) as f64,
                validation_loss
            );
        }

        Ok(lstm)
    }
}
