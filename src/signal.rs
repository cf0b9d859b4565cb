/*!
Turning a forecast into a trading recommendation
*/
use crate::CpuFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// What to do given a forecast
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    /// The forecast ends above the last close
    Buy,
    /// The forecast ends below the last close
    SellOrHold,
    /// The forecast ends exactly at the last close
    Hold,
}

impl Recommendation {
    /// A sentence of advice for this recommendation
    pub fn advice(self) -> &'static str {
        match self {
            Recommendation::Buy => "Consider buying: the model forecasts an upward trend.",
            Recommendation::SellOrHold => {
                "Consider selling or holding: the model forecasts a downward trend."
            }
            Recommendation::Hold => "Hold: the model forecasts a stable price.",
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "Buy"),
            Recommendation::SellOrHold => write!(f, "Sell/Hold"),
            Recommendation::Hold => write!(f, "Hold"),
        }
    }
}

/// A forecast's expected move and what to do about it
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Percentage change from the last close to the final forecast price
    pub pct_change: CpuFloat,
    /// The resulting recommendation
    pub recommendation: Recommendation,
}

impl Signal {
    /// Derive a signal from the last observed close and the final forecast price.
    ///
    /// The sign of the percentage change is compared exactly: only a change of exactly zero yields [`Recommendation::Hold`].
    pub fn derive(last: CpuFloat, forecast: CpuFloat) -> Signal {
        let pct_change = (forecast - last) / last * 100.0;
        let recommendation = if pct_change > 0.0 {
            Recommendation::Buy
        } else if pct_change < 0.0 {
            Recommendation::SellOrHold
        } else {
            Recommendation::Hold
        };
        Signal {
            pct_change,
            recommendation,
        }
    }
}
