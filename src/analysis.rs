use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::{run_backtest, BacktestResult};
use crate::returns::build_return_series;
use crate::seasonality::{aggregate, monthly_averages, SeasonalityMatrix};
use crate::signal::{best_months, build_signal, signal_counts, SignalCounts, TOP_MONTH_COUNT};
use crate::types::{month_abbrev, with_metadata, ComputationOutput, PricePoint, Rate};
use crate::SeasonalResult;

/// Input for a full seasonality analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityInput {
    /// Instrument label, echoed into the assumptions block (e.g. "CL=F").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Daily closes, strictly increasing by date.
    pub prices: Vec<PricePoint>,
}

/// One row of the average-monthly-return ranking, labeled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAverageRow {
    /// Calendar month, 1–12.
    pub month: u32,
    /// Three-letter month name ("Jan").
    pub name: String,
    pub average_return: Rate,
}

/// Everything the presentation layer needs: heatmap matrix, bar-chart
/// averages, ranked best months, per-period signal, and the backtest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalityOutput {
    /// Year-by-month sums of daily returns (heatmap data).
    pub monthly_return_matrix: SeasonalityMatrix,
    /// Per-month averages across years, ascending by month (bar-chart data).
    pub average_monthly_returns: Vec<MonthlyAverageRow>,
    /// Top months by average return, descending, ties ascending by month.
    pub best_months: Vec<u32>,
    /// Display names for `best_months`, same order.
    pub best_month_names: Vec<String>,
    /// Per-period binary signal, aligned with `dates`.
    pub signal: Vec<u8>,
    pub signal_counts: SignalCounts,
    /// One date per analyzed period, index-aligned with `signal` and the
    /// backtest series.
    pub dates: Vec<NaiveDate>,
    pub backtest: BacktestResult,
}

/// Run the full pipeline: returns → seasonality matrix → ranked signal →
/// lagged long-only backtest.
///
/// Known limitation, preserved deliberately: `best_months` is ranked over
/// the entire sample and then backtested over that same sample, so the
/// backtest is in-sample fitted rather than out-of-sample. A warning in the
/// output envelope flags every run with this notice.
pub fn analyze_seasonality(
    input: &SeasonalityInput,
) -> SeasonalResult<ComputationOutput<SeasonalityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let returns = build_return_series(&input.prices)?;

    let matrix = aggregate(&returns);
    let averages = monthly_averages(&matrix);
    let best = best_months(&averages);
    let signal = build_signal(&returns, &best);
    let counts = signal_counts(&signal);
    let backtest = run_backtest(&returns, &signal)?;

    warnings.push(
        "Best months are ranked over the full sample and backtested over that same sample; \
         results are in-sample fitted, not an out-of-sample backtest"
            .to_string(),
    );
    let zero_close_gaps = returns[1..].iter().filter(|rp| rp.ret.is_none()).count();
    if zero_close_gaps > 0 {
        warnings.push(format!(
            "{} return(s) undefined due to zero closing prices and excluded from cumulative products",
            zero_close_gaps
        ));
    }
    let missing: Vec<&str> = (1u32..=12)
        .filter(|m| !averages.contains_key(m))
        .map(month_abbrev)
        .collect();
    if !missing.is_empty() {
        warnings.push(format!(
            "No trading days observed in: {}; these months cannot be ranked",
            missing.join(", ")
        ));
    }
    if backtest.sharpe_ratio.is_none() {
        warnings.push("Sharpe ratio undefined (zero return variance)".to_string());
    }

    let output = SeasonalityOutput {
        average_monthly_returns: averages
            .iter()
            .map(|(&month, &average_return)| MonthlyAverageRow {
                month,
                name: month_abbrev(month).to_string(),
                average_return,
            })
            .collect(),
        best_month_names: best
            .iter()
            .map(|&m| month_abbrev(m).to_string())
            .collect(),
        best_months: best,
        signal_counts: counts,
        dates: returns.iter().map(|rp| rp.date).collect(),
        signal,
        monthly_return_matrix: matrix,
        backtest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Calendar-Month Seasonality Ranking & Lagged Long-Only Backtest",
        &serde_json::json!({
            "symbol": input.symbol,
            "observations": input.prices.len(),
            "top_month_count": TOP_MONTH_COUNT,
            "annualization_factor": "sqrt(252)",
            "standard_deviation": "sample (n-1)",
        }),
        warnings,
        elapsed,
        output,
    ))
}
