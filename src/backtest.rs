use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SeasonalError;
use crate::types::{Rate, ReturnPoint};
use crate::SeasonalResult;

/// Trading days used to annualize the Sharpe ratio for daily returns.
const TRADING_DAYS_PER_YEAR: Decimal = dec!(252);

/// Equity curves and summary statistics for the seasonality strategy
/// against its buy-and-hold benchmark.
///
/// An undefined slot (`None`) marks a period whose return could not be
/// computed: the series start, or a zero prior close. Undefined slots are
/// excluded from cumulative products and from the Sharpe statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Per-period strategy return: `ret[i] * signal[i−1]`.
    pub strategy_returns: Vec<Option<Rate>>,
    /// Cumulative buy-and-hold return, `Π(1 + ret) − 1`.
    pub cumulative_market: Vec<Option<Rate>>,
    /// Cumulative strategy return, `Π(1 + strategy_ret) − 1`.
    pub cumulative_strategy: Vec<Option<Rate>>,
    /// Last defined value of `cumulative_strategy` (zero if none).
    pub total_strategy_return: Rate,
    /// Last defined value of `cumulative_market` (zero if none).
    pub total_market_return: Rate,
    /// Annualized Sharpe of the strategy returns; `None` when the return
    /// variance is zero or fewer than 2 defined observations exist.
    pub sharpe_ratio: Option<Decimal>,
}

/// Apply a binary signal to realized returns, lagged by one period.
///
/// `strategy_returns[0]` is undefined (no prior signal exists at the series
/// start); for i ≥ 1 the position held during period i is the one decided
/// at period i−1. The lag is structural: the signal value at i is never
/// read for period i's own return.
pub fn run_backtest(returns: &[ReturnPoint], signal: &[u8]) -> SeasonalResult<BacktestResult> {
    if signal.len() != returns.len() {
        return Err(SeasonalError::MisalignedSequences {
            expected: returns.len(),
            actual: signal.len(),
        });
    }

    let mut strategy_returns: Vec<Option<Rate>> = Vec::with_capacity(returns.len());
    for (i, rp) in returns.iter().enumerate() {
        if i == 0 {
            strategy_returns.push(None);
            continue;
        }
        let held = signal[i - 1] == 1;
        strategy_returns.push(rp.ret.map(|r| if held { r } else { Decimal::ZERO }));
    }

    let market_returns: Vec<Option<Rate>> = returns.iter().map(|rp| rp.ret).collect();
    let cumulative_market = cumulative_curve(&market_returns);
    let cumulative_strategy = cumulative_curve(&strategy_returns);

    Ok(BacktestResult {
        total_strategy_return: last_defined(&cumulative_strategy),
        total_market_return: last_defined(&cumulative_market),
        sharpe_ratio: annualized_sharpe(&strategy_returns),
        strategy_returns,
        cumulative_market,
        cumulative_strategy,
    })
}

/// Running product of (1 + r) minus one, in index order.
///
/// An undefined return leaves the running product untouched (factor of one)
/// and produces an undefined output slot.
fn cumulative_curve(returns: &[Option<Rate>]) -> Vec<Option<Rate>> {
    let mut running = Decimal::ONE;
    returns
        .iter()
        .map(|r| {
            r.map(|r| {
                running *= Decimal::ONE + r;
                running - Decimal::ONE
            })
        })
        .collect()
}

fn last_defined(curve: &[Option<Rate>]) -> Rate {
    curve
        .iter()
        .rev()
        .find_map(|v| *v)
        .unwrap_or(Decimal::ZERO)
}

/// mean / sample-stddev × √252 over the defined strategy returns.
fn annualized_sharpe(strategy_returns: &[Option<Rate>]) -> Option<Decimal> {
    let defined: Vec<Decimal> = strategy_returns.iter().filter_map(|r| *r).collect();
    if defined.len() < 2 {
        return None;
    }
    let n = Decimal::from(defined.len() as i64);
    let mean = defined.iter().sum::<Decimal>() / n;
    let std_dev = sqrt_decimal(sample_variance(&defined, mean));
    if std_dev.is_zero() {
        return None;
    }
    Some(mean / std_dev * sqrt_decimal(TRADING_DAYS_PER_YEAR))
}

/// Sample variance (n-1 denominator)
fn sample_variance(data: &[Decimal], mean: Decimal) -> Decimal {
    let n = data.len();
    if n < 2 {
        return Decimal::ZERO;
    }
    let sum_sq: Decimal = data.iter().map(|x| (x - mean) * (x - mean)).sum();
    sum_sq / Decimal::from((n - 1) as i64)
}

fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}
