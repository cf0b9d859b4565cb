/*!
Sliding windows over a scaled price series
*/
use super::scale::{MinMaxScaler, Unfit};
use super::PriceSeries;
use crate::error::{Error, Result};
use crate::CpuFloat;

/// The default number of closes fed to the model per prediction
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// A run of consecutive scaled closes and the scaled close immediately following it
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// The scaled closes, oldest first
    pub input: Vec<CpuFloat>,
    /// The scaled close following `input`
    pub target: CpuFloat,
}

/// Every window of a series, tagged with the fingerprint of that series
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The windows, in series order unless this is a subset
    pub windows: Vec<Window>,
    /// The length of each window's input
    pub window_size: usize,
    /// The fingerprint of the series the windows were cut from
    pub fingerprint: u64,
}

impl Dataset {
    /// The number of windows
    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }
    /// Whether there are no windows at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
    /// The window inputs
    pub fn inputs(&self) -> impl Iterator<Item = &[CpuFloat]> + '_ {
        self.windows.iter().map(|window| &window.input[..])
    }
    /// The window targets
    pub fn targets(&self) -> Vec<CpuFloat> {
        self.windows.iter().map(|window| window.target).collect()
    }
    /// A new dataset made of the windows at `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            windows: indices.iter().map(|&ix| self.windows[ix].clone()).collect(),
            window_size: self.window_size,
            fingerprint: self.fingerprint,
        }
    }
}

/// Cuts a price series into scaled, stride-one windows
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowBuilder {
    /// The number of closes per window
    pub window_size: usize,
}

impl Default for WindowBuilder {
    fn default() -> WindowBuilder {
        WindowBuilder::new(DEFAULT_WINDOW_SIZE)
    }
}

impl WindowBuilder {
    /// Create a window builder for a given window size
    #[inline]
    pub fn new(window_size: usize) -> WindowBuilder {
        WindowBuilder { window_size }
    }
    /// Fit a scaler on every close of `series`, then cut the scaled series into windows.
    ///
    /// Window `i` holds scaled closes `i..i + window_size` and targets scaled close `i + window_size`, so a series of
    /// length `n` yields `n - window_size` windows, and none at all if `n <= window_size`.
    pub fn build(&self, series: &PriceSeries) -> Result<(Dataset, MinMaxScaler)> {
        self.build_with(MinMaxScaler::unit(), series)
    }
    /// As [`WindowBuilder::build`], fitting a caller-supplied scaler
    pub fn build_with(
        &self,
        scaler: MinMaxScaler<Unfit>,
        series: &PriceSeries,
    ) -> Result<(Dataset, MinMaxScaler)> {
        if self.window_size == 0 {
            return Err(Error::Shape {
                expected: 1,
                actual: 0,
            });
        }
        let scaler = scaler.fit(series);
        let scaled = scaler.transform_all(&series.closes());
        let windows = scaled
            .windows(self.window_size + 1)
            .map(|run| Window {
                input: run[..self.window_size].to_vec(),
                target: run[self.window_size],
            })
            .collect();
        let dataset = Dataset {
            windows,
            window_size: self.window_size,
            fingerprint: series.fingerprint(),
        };
        Ok((dataset, scaler))
    }
}
