/*!
Price series, windowing and IO
*/
use crate::error::{Error, Result};
use crate::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use ta::Close;

pub mod daily;
pub mod fake;
pub mod scale;
pub mod window;

/// A single daily close
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PricePoint<D = NaiveDate, F = CpuFloat> {
    /// The trading day
    #[serde(rename = "date")]
    pub t: D,
    /// The closing price on that day
    #[serde(rename = "close")]
    pub c: F,
}

impl<D, F> Close for PricePoint<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn close(&self) -> f64 {
        self.c.into()
    }
}

/// An ordered series of daily closes for one instrument.
///
/// Dates are strictly increasing and every close is finite. The series also carries a fingerprint of its contents, which
/// scalers and windows derived from it inherit so that mixing data from two series can be detected.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    fingerprint: u64,
}

impl PriceSeries {
    /// Validate a vector of price points as a series
    pub fn new(points: Vec<PricePoint>) -> Result<PriceSeries> {
        if points.is_empty() {
            return Err(Error::EmptySeries);
        }
        for (index, point) in points.iter().enumerate() {
            if !point.c.is_finite() {
                return Err(Error::NonFinite { index });
            }
            if index > 0 && points[index - 1].t >= point.t {
                return Err(Error::UnorderedSeries { index });
            }
        }
        let mut hasher = DefaultHasher::new();
        for point in points.iter() {
            point.t.hash(&mut hasher);
            point.c.to_bits().hash(&mut hasher);
        }
        let fingerprint = hasher.finish();
        Ok(PriceSeries {
            points,
            fingerprint,
        })
    }
    /// Build a series from raw closes, dating them on consecutive business days starting at `start`
    pub fn from_closes(start: NaiveDate, closes: &[CpuFloat]) -> Result<PriceSeries> {
        let dates = std::iter::once(start).chain(util::business_days_after(start));
        let points = dates
            .zip(closes.iter())
            .map(|(t, &c)| PricePoint { t, c })
            .collect();
        PriceSeries::new(points)
    }
    /// The number of closes in this series
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Always false: series are never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// The points of this series
    #[inline]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }
    /// The closing prices of this series, in order
    pub fn closes(&self) -> Vec<CpuFloat> {
        self.points.iter().map(Close::close).collect()
    }
    /// The most recent observation
    #[inline]
    pub fn last(&self) -> PricePoint {
        self.points[self.points.len() - 1]
    }
    /// A fingerprint identifying the contents of this series
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
    /// The last `size` raw closes, tagged with this series' fingerprint
    pub fn last_window(&self, size: usize) -> Result<RawWindow> {
        if size == 0 {
            return Err(Error::Shape {
                expected: 1,
                actual: 0,
            });
        }
        if self.len() < size {
            return Err(Error::InsufficientData {
                required: size,
                actual: self.len(),
            });
        }
        Ok(RawWindow {
            closes: self.points[self.len() - size..]
                .iter()
                .map(Close::close)
                .collect(),
            fingerprint: self.fingerprint,
        })
    }
}

/// A run of unscaled closes taken from a known series, used to seed a forecast
#[derive(Debug, Clone, PartialEq)]
pub struct RawWindow {
    /// The closing prices, oldest first
    pub closes: Vec<CpuFloat>,
    /// The fingerprint of the series these closes were taken from
    pub fingerprint: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn series_validation() {
        assert!(matches!(PriceSeries::new(vec![]), Err(Error::EmptySeries)));
        let unordered = vec![
            PricePoint { t: day(4), c: 10.0 },
            PricePoint { t: day(5), c: 11.0 },
            PricePoint { t: day(5), c: 12.0 },
        ];
        assert!(matches!(
            PriceSeries::new(unordered),
            Err(Error::UnorderedSeries { index: 2 })
        ));
        let nan = vec![
            PricePoint { t: day(4), c: 10.0 },
            PricePoint {
                t: day(5),
                c: f64::NAN,
            },
        ];
        assert!(matches!(
            PriceSeries::new(nan),
            Err(Error::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn from_closes_uses_business_days() {
        // 2024-03-08 is a Friday
        let series = PriceSeries::from_closes(day(8), &[1.0, 2.0, 3.0]).unwrap();
        let dates: Vec<_> = series.points().iter().map(|p| p.t).collect();
        assert_eq!(dates, vec![day(8), day(11), day(12)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().c, 3.0);
    }

    #[test]
    fn last_window_and_fingerprints() {
        let a = PriceSeries::from_closes(day(4), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = PriceSeries::from_closes(day(4), &[1.0, 2.0, 3.0, 5.0]).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(
            a.fingerprint(),
            PriceSeries::from_closes(day(4), &[1.0, 2.0, 3.0, 4.0])
                .unwrap()
                .fingerprint()
        );
        let window = a.last_window(2).unwrap();
        assert_eq!(window.closes, vec![3.0, 4.0]);
        assert_eq!(window.fingerprint, a.fingerprint());
        assert!(matches!(
            a.last_window(5),
            Err(Error::InsufficientData {
                required: 5,
                actual: 4
            })
        ));
    }
}
