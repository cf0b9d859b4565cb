/*!
Generate fake price data, for testing purposes
*/
use super::PriceSeries;
use crate::error::Result;
use crate::CpuFloat;
use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// A trait implemented by price generators
pub trait PriceGen {
    /// Generate the next day's close
    fn next_price(&mut self) -> CpuFloat;
}

/// A price moving by a fixed amount every day
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PriceRamp {
    /// The next price to be generated
    pub price: CpuFloat,
    /// The daily change
    pub step: CpuFloat,
}

impl PriceGen for PriceRamp {
    fn next_price(&mut self) -> CpuFloat {
        let price = self.price;
        self.price += self.step;
        price
    }
}

/// Generate fake prices using a geometric random walk
#[derive(Debug, Copy, Clone)]
pub struct PriceRandomWalk<R> {
    /// The RNG used by this random walk
    pub rng: R,
    /// The next price to be generated
    pub price: CpuFloat,
    /// The distribution of daily log returns
    pub returns: Normal<CpuFloat>,
}

impl<R: Rng> PriceGen for PriceRandomWalk<R> {
    fn next_price(&mut self) -> CpuFloat {
        let price = self.price;
        let ret = self.returns.sample(&mut self.rng);
        self.price *= ret.exp();
        price
    }
}

/// Draw `n` closes from a generator, dated on consecutive business days from `start`
pub fn fake_series<P: PriceGen>(gen: &mut P, start: NaiveDate, n: usize) -> Result<PriceSeries> {
    let closes: Vec<CpuFloat> = (0..n).map(|_| gen.next_price()).collect();
    PriceSeries::from_closes(start, &closes)
}
