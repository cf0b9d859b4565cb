/*!
Pipeline configuration. The defaults are the model's fixed hyperparameters.
*/
use crate::data::window::DEFAULT_WINDOW_SIZE;
use crate::lstm::StockLSTMDesc;
use serde::{Deserialize, Serialize};
use tch::Device;

/// The number of business days forecast
pub const DEFAULT_HORIZON: usize = 5;

/// Where to run the network
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DeviceChoice {
    /// CUDA if available, otherwise the CPU
    Auto,
    /// Always the CPU
    Cpu,
    /// The first CUDA device
    Cuda,
}

impl DeviceChoice {
    /// The `tch` device for this choice
    pub fn device(self) -> Device {
        match self {
            DeviceChoice::Auto => Device::cuda_if_available(),
            DeviceChoice::Cpu => Device::Cpu,
            DeviceChoice::Cuda => Device::Cuda(0),
        }
    }
}

/// How to split the windows and fit the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Fraction of all windows held out for evaluation
    pub test_fraction: f64,
    /// Fraction of the training windows held out for validation during fitting
    pub validation_fraction: f64,
    /// Passes over the fitting windows
    pub epochs: usize,
    /// Windows per gradient step
    pub batch_size: usize,
    /// The Adam learning rate
    pub learning_rate: f64,
    /// Seed for the split, the epoch shuffles and weight initialization
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> TrainConfig {
        TrainConfig {
            test_fraction: 0.2,
            validation_fraction: 0.2,
            epochs: 300,
            batch_size: 64,
            learning_rate: 1e-3,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Set the number of epochs
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything needed for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Closes per model input window
    pub window_size: usize,
    /// Business days to forecast
    pub horizon: usize,
    /// Splitting and fitting
    pub train: TrainConfig,
    /// The network architecture and device
    pub model: StockLSTMDesc,
}

impl Default for PipelineConfig {
    fn default() -> PipelineConfig {
        PipelineConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            horizon: DEFAULT_HORIZON,
            train: TrainConfig::default(),
            model: StockLSTMDesc::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
    /// Set the training configuration
    pub fn with_train(mut self, train: TrainConfig) -> Self {
        self.train = train;
        self
    }
    /// Set the network architecture
    pub fn with_model(mut self, model: StockLSTMDesc) -> Self {
        self.model = model;
        self
    }
    /// Set the device the network runs on
    pub fn with_device(mut self, device: DeviceChoice) -> Self {
        self.model.device = device;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_hyperparameters() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_size, 20);
        assert_eq!(config.horizon, 5);
        assert_eq!(config.train.epochs, 300);
        assert_eq!(config.train.batch_size, 64);
        assert_eq!(config.train.seed, 42);
        assert_eq!(config.model.hidden, 256);
        assert_eq!(config.model.layers, 2);
        assert_eq!(config.model.dropout, 0.4);
        assert_eq!(config.model.device, DeviceChoice::Auto);
    }
}
