/*!
Input data scaling
*/
use super::{PriceSeries, RawWindow};
use crate::error::{Error, Result};
use crate::CpuFloat;
use ta::Close;

/// Marker for a scaler which has not seen any data yet
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Unfit;

/// The statistics of the series a scaler was fit on
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fitted {
    /// The smallest close seen during fitting
    pub min: CpuFloat,
    /// The largest close seen during fitting
    pub max: CpuFloat,
    /// The fingerprint of the series the scaler was fit on
    pub fingerprint: u64,
}

/// A min-max scaler mapping prices affinely onto a feature range, `[0, 1]` by default.
///
/// A scaler starts out [`Unfit`] and becomes [`Fitted`] by consuming itself in [`MinMaxScaler::fit`], so a fitted scaler
/// can be shared by reference between windowing, evaluation and forecasting but never fit a second time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MinMaxScaler<S = Fitted> {
    /// The lower end of the feature range
    pub lo: CpuFloat,
    /// The upper end of the feature range
    pub hi: CpuFloat,
    /// Fitting state
    pub state: S,
}

impl Default for MinMaxScaler<Unfit> {
    fn default() -> MinMaxScaler<Unfit> {
        MinMaxScaler::unit()
    }
}

impl MinMaxScaler<Unfit> {
    /// Create a new, unfit scaler onto the range `[lo, hi]`
    #[inline]
    pub fn new(lo: CpuFloat, hi: CpuFloat) -> MinMaxScaler<Unfit> {
        MinMaxScaler {
            lo,
            hi,
            state: Unfit,
        }
    }
    /// Create a new, unfit scaler onto the unit interval
    #[inline]
    pub fn unit() -> MinMaxScaler<Unfit> {
        MinMaxScaler::new(0.0, 1.0)
    }
    /// Fit this scaler to every close of a series
    pub fn fit(self, series: &PriceSeries) -> MinMaxScaler<Fitted> {
        let (min, max) = series
            .points()
            .iter()
            .map(Close::close)
            .fold((CpuFloat::INFINITY, CpuFloat::NEG_INFINITY), |(min, max), c| {
                (min.min(c), max.max(c))
            });
        MinMaxScaler {
            lo: self.lo,
            hi: self.hi,
            state: Fitted {
                min,
                max,
                fingerprint: series.fingerprint(),
            },
        }
    }
}

impl MinMaxScaler<Fitted> {
    /// The fingerprint of the series this scaler was fit on
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.state.fingerprint
    }
    /// The width of the fitted price range. A constant series gets a unit range rather than a division by zero.
    #[inline]
    fn data_range(&self) -> CpuFloat {
        let range = self.state.max - self.state.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }
    /// Scale a raw price
    #[inline]
    pub fn transform(&self, price: CpuFloat) -> CpuFloat {
        (price - self.state.min) / self.data_range() * (self.hi - self.lo) + self.lo
    }
    /// Map a scaled value back to a price
    #[inline]
    pub fn inverse(&self, value: CpuFloat) -> CpuFloat {
        (value - self.lo) / (self.hi - self.lo) * self.data_range() + self.state.min
    }
    /// Scale a slice of raw prices
    pub fn transform_all(&self, prices: &[CpuFloat]) -> Vec<CpuFloat> {
        prices.iter().map(|&price| self.transform(price)).collect()
    }
    /// Map a slice of scaled values back to prices
    pub fn inverse_all(&self, values: &[CpuFloat]) -> Vec<CpuFloat> {
        values.iter().map(|&value| self.inverse(value)).collect()
    }
    /// Fail unless `fingerprint` identifies the series this scaler was fit on
    pub fn check(&self, fingerprint: u64) -> Result<()> {
        if fingerprint == self.state.fingerprint {
            Ok(())
        } else {
            Err(Error::ScalerMismatch {
                expected: self.state.fingerprint,
                found: fingerprint,
            })
        }
    }
    /// Scale a window of raw closes, checking it came from the series this scaler was fit on
    pub fn transform_window(&self, window: &RawWindow) -> Result<Vec<CpuFloat>> {
        self.check(window.fingerprint)?;
        Ok(self.transform_all(&window.closes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), closes).unwrap()
    }

    #[test]
    fn fit_maps_range_onto_unit_interval() {
        let scaler = MinMaxScaler::unit().fit(&series(&[10.0, 30.0, 20.0]));
        assert_eq!(scaler.state.min, 10.0);
        assert_eq!(scaler.state.max, 30.0);
        assert_eq!(scaler.transform(10.0), 0.0);
        assert_eq!(scaler.transform(30.0), 1.0);
        assert_eq!(scaler.transform(20.0), 0.5);
        // Extrapolates linearly outside the fitting range
        assert_eq!(scaler.transform(40.0), 1.5);
        assert_eq!(scaler.inverse(-0.5), 0.0);
    }

    #[test]
    fn roundtrip_within_fit_range() {
        let closes = [101.25, 99.5, 143.75, 120.0, 87.125, 132.5];
        let scaler = MinMaxScaler::unit().fit(&series(&closes));
        let mut price = 87.125;
        while price <= 143.75 {
            let back = scaler.inverse(scaler.transform(price));
            assert!((back - price).abs() < 1e-9, "{} != {}", back, price);
            price += 0.37;
        }
        let scaled = scaler.transform_all(&closes);
        assert!(scaled.iter().all(|&v| (0.0..=1.0).contains(&v)));
        let back = scaler.inverse_all(&scaled);
        for (a, b) in back.iter().zip(closes.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_series_uses_unit_scale() {
        let scaler = MinMaxScaler::unit().fit(&series(&[5.0, 5.0, 5.0]));
        assert_eq!(scaler.transform(5.0), 0.0);
        assert_eq!(scaler.transform(6.0), 1.0);
        assert_eq!(scaler.inverse(0.0), 5.0);
    }

    #[test]
    fn custom_feature_range() {
        let scaler = MinMaxScaler::new(-1.0, 1.0).fit(&series(&[0.0, 10.0]));
        assert_eq!(scaler.transform(0.0), -1.0);
        assert_eq!(scaler.transform(5.0), 0.0);
        assert_eq!(scaler.inverse(1.0), 10.0);
    }

    #[test]
    fn windows_from_other_series_are_rejected() {
        let a = series(&[1.0, 2.0, 3.0]);
        let b = series(&[1.0, 2.0, 4.0]);
        let scaler = MinMaxScaler::unit().fit(&a);
        assert!(scaler.transform_window(&a.last_window(2).unwrap()).is_ok());
        match scaler.transform_window(&b.last_window(2).unwrap()) {
            Err(Error::ScalerMismatch { expected, found }) => {
                assert_eq!(expected, a.fingerprint());
                assert_eq!(found, b.fingerprint());
            }
            other => panic!("expected a scaler mismatch, got {:?}", other),
        }
    }
}
