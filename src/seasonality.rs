use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::ReturnPoint;

/// Year → month (1–12) → sum of daily returns in that year/month.
///
/// Sparse: a (year, month) cell exists iff at least one trading day fell in
/// it within the input range. A cell whose only trading days carry undefined
/// returns holds zero, matching a skip-missing group sum.
pub type SeasonalityMatrix = BTreeMap<i32, BTreeMap<u32, Decimal>>;

/// Month (1–12) → mean of that month's aggregated return across the years
/// where the month is present.
pub type MonthlyAverage = BTreeMap<u32, Decimal>;

/// Group daily returns by (year, month) and sum within each group.
///
/// Summation runs in index-increasing order; undefined returns contribute
/// nothing but still mark the cell as observed.
pub fn aggregate(returns: &[ReturnPoint]) -> SeasonalityMatrix {
    let mut matrix = SeasonalityMatrix::new();
    for rp in returns {
        let cell = matrix
            .entry(rp.year)
            .or_default()
            .entry(rp.month)
            .or_insert(Decimal::ZERO);
        if let Some(r) = rp.ret {
            *cell += r;
        }
    }
    matrix
}

/// Average each month's aggregated return across the years where it appears.
///
/// A month observed in zero years is absent from the result, never zero.
pub fn monthly_averages(matrix: &SeasonalityMatrix) -> MonthlyAverage {
    let mut sums: BTreeMap<u32, (Decimal, i64)> = BTreeMap::new();
    for months in matrix.values() {
        for (&month, &value) in months {
            let entry = sums.entry(month).or_insert((Decimal::ZERO, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(month, (sum, count))| (month, sum / Decimal::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn rp(y: i32, m: u32, d: u32, ret: Option<Decimal>) -> ReturnPoint {
        ReturnPoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            ret,
            year: y,
            month: m,
        }
    }

    #[test]
    fn test_sums_within_year_month() {
        let returns = vec![
            rp(2020, 1, 2, None),
            rp(2020, 1, 3, Some(dec!(0.01))),
            rp(2020, 1, 6, Some(dec!(0.02))),
            rp(2020, 2, 3, Some(dec!(-0.01))),
            rp(2021, 1, 4, Some(dec!(0.05))),
        ];
        let matrix = aggregate(&returns);
        assert_eq!(matrix[&2020][&1], dec!(0.03));
        assert_eq!(matrix[&2020][&2], dec!(-0.01));
        assert_eq!(matrix[&2021][&1], dec!(0.05));
    }

    #[test]
    fn test_unobserved_cell_is_absent_not_zero() {
        let returns = vec![rp(2020, 1, 2, None), rp(2020, 1, 3, Some(dec!(0.01)))];
        let matrix = aggregate(&returns);
        assert!(!matrix[&2020].contains_key(&3));
        assert!(!matrix.contains_key(&2021));
    }

    #[test]
    fn test_all_undefined_cell_sums_to_zero() {
        // The cell is observed (trading days exist) even though no return
        // is defined, matching a skip-missing group sum.
        let returns = vec![rp(2020, 1, 2, None)];
        let matrix = aggregate(&returns);
        assert_eq!(matrix[&2020][&1], Decimal::ZERO);
    }

    #[test]
    fn test_average_over_contributing_years_only() {
        let returns = vec![
            rp(2020, 1, 3, Some(dec!(0.02))),
            rp(2021, 1, 4, Some(dec!(0.04))),
            // February observed in 2021 only.
            rp(2021, 2, 2, Some(dec!(0.10))),
        ];
        let averages = monthly_averages(&aggregate(&returns));
        assert_eq!(averages[&1], dec!(0.03));
        assert_eq!(averages[&2], dec!(0.10));
    }

    #[test]
    fn test_missing_month_absent_from_domain() {
        let returns = vec![rp(2020, 1, 3, Some(dec!(0.02)))];
        let averages = monthly_averages(&aggregate(&returns));
        assert_eq!(averages.len(), 1);
        assert!(!averages.contains_key(&6));
    }

    #[test]
    fn test_empty_input() {
        let matrix = aggregate(&[]);
        assert!(matrix.is_empty());
        assert!(monthly_averages(&matrix).is_empty());
    }
}
