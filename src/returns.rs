use chrono::Datelike;

use crate::error::SeasonalError;
use crate::types::{PricePoint, ReturnPoint};
use crate::SeasonalResult;

const MIN_PRICE_POINTS: usize = 2;

/// Build the daily return series for an ordered price series.
///
/// The output has the same length as the input. Element 0 carries an
/// undefined return (no prior close exists); element i (i ≥ 1) carries
/// `(close[i] − close[i−1]) / close[i−1]`. A zero prior close yields an
/// undefined return rather than an error. Calendar year and month are read
/// straight off each point's date, with no timezone conversion.
pub fn build_return_series(prices: &[PricePoint]) -> SeasonalResult<Vec<ReturnPoint>> {
    if prices.len() < MIN_PRICE_POINTS {
        return Err(SeasonalError::InsufficientData(format!(
            "At least {} price points required to compute a return, got {}",
            MIN_PRICE_POINTS,
            prices.len()
        )));
    }

    for window in prices.windows(2) {
        if window[1].date <= window[0].date {
            return Err(SeasonalError::InvalidInput {
                field: "prices".into(),
                reason: format!(
                    "Dates must be strictly increasing: {} does not follow {}",
                    window[1].date, window[0].date
                ),
            });
        }
    }

    let mut series = Vec::with_capacity(prices.len());
    series.push(ReturnPoint {
        date: prices[0].date,
        ret: None,
        year: prices[0].date.year(),
        month: prices[0].date.month(),
    });

    for window in prices.windows(2) {
        let (prev, curr) = (&window[0], &window[1]);
        let ret = if prev.close.is_zero() {
            None
        } else {
            Some((curr.close - prev.close) / prev.close)
        };
        series.push(ReturnPoint {
            date: curr.date,
            ret,
            year: curr.date.year(),
            month: curr.date.month(),
        });
    }

    Ok(series)
}
