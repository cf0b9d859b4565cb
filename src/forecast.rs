/*!
Autoregressive multi-day forecasting
*/
use crate::config::DEFAULT_HORIZON;
use crate::data::scale::MinMaxScaler;
use crate::data::{PricePoint, RawWindow};
use crate::error::{Error, Result};
use crate::model::SequenceModel;
use crate::util::next_business_days;
use crate::CpuFloat;
use chrono::NaiveDate;
use std::iter::once;

/// One step of a forecast rollout, in scaled units
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The window the model was fed
    pub input: Vec<CpuFloat>,
    /// What the model predicted from it
    pub prediction: CpuFloat,
}

/// A rolled-out forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Every step of the rollout, in order
    pub steps: Vec<Step>,
    /// The predicted closing prices, in order
    pub prices: Vec<CpuFloat>,
}

impl Forecast {
    /// The last forecast price
    #[inline]
    pub fn final_price(&self) -> Option<CpuFloat> {
        self.prices.last().copied()
    }
    /// Label the forecast prices with the business days following `last_date`
    pub fn dated(&self, last_date: NaiveDate) -> Vec<PricePoint> {
        next_business_days(last_date, self.prices.len())
            .into_iter()
            .zip(self.prices.iter())
            .map(|(t, &c)| PricePoint { t, c })
            .collect()
    }
}

/// Rolls a model forward from the most recent window, feeding each prediction back in as the newest close
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Forecaster {
    /// How many steps to roll forward
    pub horizon: usize,
}

impl Default for Forecaster {
    fn default() -> Forecaster {
        Forecaster {
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl Forecaster {
    /// Forecast the closes following `last`.
    ///
    /// `scaler` must be the one fit on the series `last` was taken from. Each step's window is the previous step's
    /// window without its oldest value, followed by the previous step's prediction.
    pub fn forecast<M: SequenceModel + ?Sized>(
        &self,
        model: &M,
        last: &RawWindow,
        scaler: &MinMaxScaler,
    ) -> Result<Forecast> {
        let seed = scaler.transform_window(last)?;
        if seed.len() != model.window_size() {
            return Err(Error::Shape {
                expected: model.window_size(),
                actual: seed.len(),
            });
        }
        let (steps, _) = (0..self.horizon).try_fold(
            (Vec::with_capacity(self.horizon), seed),
            |(mut steps, window): (Vec<Step>, Vec<CpuFloat>), _| -> Result<_> {
                let prediction = model.predict(&window)?;
                let next = window[1..]
                    .iter()
                    .copied()
                    .chain(once(prediction))
                    .collect();
                steps.push(Step {
                    input: window,
                    prediction,
                });
                Ok((steps, next))
            },
        )?;
        let predictions: Vec<CpuFloat> = steps.iter().map(|step| step.prediction).collect();
        Ok(Forecast {
            prices: scaler.inverse_all(&predictions),
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::window::WindowBuilder;
    use crate::data::PriceSeries;
    use crate::model::{check_windows, Persistence};

    /// Extends the average slope of the window by one step
    struct Drift(usize);

    impl SequenceModel for Drift {
        fn window_size(&self) -> usize {
            self.0
        }
        fn predict_batch(&self, windows: &[&[CpuFloat]]) -> Result<Vec<CpuFloat>> {
            check_windows(self.0, windows)?;
            Ok(windows
                .iter()
                .map(|w| w[w.len() - 1] + (w[w.len() - 1] - w[0]) / (w.len() - 1) as CpuFloat)
                .collect())
        }
    }

    fn start() -> NaiveDate {
        // A Monday
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn ramp(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + 2.0 * i as f64).collect();
        PriceSeries::from_closes(start(), &closes).unwrap()
    }

    #[test]
    fn rollout_feeds_predictions_back() {
        let series = ramp(40);
        let (_, scaler) = WindowBuilder::new(20).build(&series).unwrap();
        let forecast = Forecaster::default()
            .forecast(&Drift(20), &series.last_window(20).unwrap(), &scaler)
            .unwrap();
        assert_eq!(forecast.prices.len(), 5);
        assert_eq!(forecast.steps.len(), 5);
        assert_eq!(
            forecast.steps[0].input,
            scaler.transform_window(&series.last_window(20).unwrap()).unwrap()
        );
        for pair in forecast.steps.windows(2) {
            assert_eq!(&pair[1].input[..19], &pair[0].input[1..]);
            assert_eq!(pair[1].input[19], pair[0].prediction);
        }
        // A linear trend continues: 178 was the last close
        for (k, price) in forecast.prices.iter().enumerate() {
            let expected = 178.0 + 2.0 * (k + 1) as f64;
            assert!((price - expected).abs() < 1e-6, "{} != {}", price, expected);
        }
        assert_eq!(forecast.final_price(), forecast.prices.last().copied());
    }

    #[test]
    fn dated_on_following_business_days() {
        let series = ramp(30);
        let (_, scaler) = WindowBuilder::new(10).build(&series).unwrap();
        let forecast = Forecaster::default()
            .forecast(&Persistence { window_size: 10 }, &series.last_window(10).unwrap(), &scaler)
            .unwrap();
        assert!(forecast.prices.iter().all(|&p| (p - series.last().c).abs() < 1e-9));
        let dated = forecast.dated(series.last().t);
        assert_eq!(dated.len(), 5);
        assert_eq!(dated[0].t, next_business_days(series.last().t, 1)[0]);
        assert!(dated.windows(2).all(|pair| pair[0].t < pair[1].t));
    }

    #[test]
    fn scaler_from_another_series_is_rejected() {
        let a = ramp(30);
        let b = PriceSeries::from_closes(start(), &[5.0; 30]).unwrap();
        let (_, scaler) = WindowBuilder::new(10).build(&a).unwrap();
        assert!(matches!(
            Forecaster::default().forecast(
                &Persistence { window_size: 10 },
                &b.last_window(10).unwrap(),
                &scaler
            ),
            Err(Error::ScalerMismatch { .. })
        ));
    }

    #[test]
    fn window_length_must_match_model() {
        let series = ramp(30);
        let (_, scaler) = WindowBuilder::new(10).build(&series).unwrap();
        assert!(matches!(
            Forecaster::default().forecast(
                &Persistence { window_size: 10 },
                &series.last_window(8).unwrap(),
                &scaler
            ),
            Err(Error::Shape {
                expected: 10,
                actual: 8
            })
        ));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let series = ramp(30);
        let (_, scaler) = WindowBuilder::new(10).build(&series).unwrap();
        let forecast = Forecaster { horizon: 0 }
            .forecast(&Persistence { window_size: 10 }, &series.last_window(10).unwrap(), &scaler)
            .unwrap();
        assert!(forecast.prices.is_empty());
        assert_eq!(forecast.final_price(), None);
    }
}
