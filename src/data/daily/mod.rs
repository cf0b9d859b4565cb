/*!
Daily close CSV IO: a `date,close` header followed by one row per trading day
*/
use super::{PricePoint, PriceSeries};
use crate::error::Result;
use chrono::NaiveDate;
use csv;
use std::io::{Read, Write};

/// The date format used in daily close files
pub const DAILY_DATE: &str = "%Y-%m-%d";

/// Read a price series from a Reader. Columns other than `date` and `close` are ignored.
pub fn read_series<R: Read>(rdr: R) -> Result<PriceSeries> {
    let points = deserialize_points(rdr).collect::<std::result::Result<Vec<_>, _>>()?;
    PriceSeries::new(points)
}

/// Deserialize price points
pub fn deserialize_points<R: Read>(
    rdr: R,
) -> impl Iterator<Item = std::result::Result<PricePoint, csv::Error>> {
    csv::Reader::from_reader(rdr).into_deserialize()
}

/// Write a price series to a Writer
/// On success, return how many rows were written
pub fn write_series<W: Write>(wtr: W, series: &PriceSeries) -> Result<usize> {
    write_points(wtr, series.points().iter().copied())
}

/// Write dated prices, such as a forecast, to a Writer
/// On success, return how many rows were written
pub fn write_points<W, I>(wtr: W, points: I) -> Result<usize>
where
    W: Write,
    I: Iterator<Item = PricePoint>,
{
    let mut wtr = csv::Writer::from_writer(wtr);
    let mut written = 0;
    for point in points {
        wtr.serialize(point)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Parse a date in the daily file format
pub fn parse_date(date: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, DAILY_DATE)
}
