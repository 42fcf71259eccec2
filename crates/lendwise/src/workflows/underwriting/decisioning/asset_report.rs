use super::super::domain::{AssetReportData, HistoricalBalance, ReportTransaction};
use super::config::{INCOME_DEPOSIT_COUNT, INCOME_DEPOSIT_MINIMUM};

/// Mean and population variance of an account's historical balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceStatistics {
    pub samples: usize,
    pub mean: f64,
    pub variance: f64,
}

/// Signals extracted from a ready asset report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetReportAnalysis {
    pub days_available: Option<u32>,
    pub balances: Option<BalanceStatistics>,
    /// Magnitude of the first qualifying deposit, when recurring income was detected.
    pub income: Option<f64>,
}

pub fn analyze(report: &AssetReportData) -> AssetReportAnalysis {
    AssetReportAnalysis {
        days_available: report.days_available,
        balances: balance_statistics(&report.historical_balances),
        income: detect_income(&report.transactions),
    }
}

pub fn balance_statistics(history: &[HistoricalBalance]) -> Option<BalanceStatistics> {
    let values: Vec<f64> = history
        .iter()
        .map(|sample| sample.current)
        .filter(|value| value.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;

    Some(BalanceStatistics {
        samples: values.len(),
        mean,
        variance,
    })
}

/// Income is inferred from at least two large inbound deposits.
pub fn detect_income(transactions: &[ReportTransaction]) -> Option<f64> {
    let mut deposits = transactions.iter().filter(|transaction| {
        transaction.is_inbound() && transaction.amount.abs() >= INCOME_DEPOSIT_MINIMUM
    });

    let first = deposits.next()?.amount.abs();
    let qualifying = 1 + deposits.count();

    (qualifying >= INCOME_DEPOSIT_COUNT).then_some(first)
}
