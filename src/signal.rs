use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::seasonality::MonthlyAverage;
use crate::types::ReturnPoint;

/// Number of top-ranked calendar months held long.
pub const TOP_MONTH_COUNT: usize = 3;

/// How many periods fall on each side of the signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    /// Periods with signal 1 (long).
    pub long: usize,
    /// Periods with signal 0 (no position).
    pub flat: usize,
}

/// Rank calendar months by average return, descending, and keep the top
/// [`TOP_MONTH_COUNT`].
///
/// Exact ties keep the lower month number first: the input map iterates in
/// ascending month order and the sort is stable. Fewer entries than the cut
/// simply yields all of them.
pub fn best_months(averages: &MonthlyAverage) -> Vec<u32> {
    let mut ranked: Vec<(u32, Decimal)> = averages.iter().map(|(&m, &v)| (m, v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_MONTH_COUNT)
        .map(|(month, _)| month)
        .collect()
}

/// Binary per-period signal: 1 iff the period's month is a best month.
pub fn build_signal(returns: &[ReturnPoint], best_months: &[u32]) -> Vec<u8> {
    returns
        .iter()
        .map(|rp| u8::from(best_months.contains(&rp.month)))
        .collect()
}

/// Tally of long vs flat periods, for observability only.
pub fn signal_counts(signal: &[u8]) -> SignalCounts {
    let long = signal.iter().filter(|&&s| s == 1).count();
    SignalCounts {
        long,
        flat: signal.len() - long,
    }
}
