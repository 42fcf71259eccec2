use super::super::domain::{
    round_to_hundredths, DataUsed, DecisionPath, DecisionResult, FactorKind, ScoreFactor, Signal,
};
use super::super::normalizer::NormalizedSnapshot;
use super::asset_report::{self, AssetReportAnalysis};
use super::config::{
    InstitutionDirectory, CAPACITY_TERM_MONTHS, DEBT_TO_INCOME_LIMIT, MAX_SCORE, MIN_SCORE,
};

/// Running score plus the ordered trail of factors that moved it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreCard {
    raw_score: i16,
    factors: Vec<ScoreFactor>,
}

impl ScoreCard {
    pub(crate) fn new(base: i16) -> Self {
        Self {
            raw_score: base,
            factors: Vec::new(),
        }
    }

    pub(crate) fn positive(&mut self, signal: Signal, delta: i16, label: impl Into<String>) {
        self.record(FactorKind::Positive, signal, delta, label.into());
    }

    /// `delta` is the signed adjustment, so penalties are passed as negative values.
    pub(crate) fn risk(&mut self, signal: Signal, delta: i16, label: impl Into<String>) {
        self.record(FactorKind::Risk, signal, delta, label.into());
    }

    fn record(&mut self, kind: FactorKind, signal: Signal, delta: i16, label: String) {
        self.raw_score = self.raw_score.saturating_add(delta);
        self.factors.push(ScoreFactor {
            kind,
            signal,
            delta,
            label,
        });
    }

    pub(crate) fn score(&self) -> i16 {
        self.raw_score.clamp(MIN_SCORE, MAX_SCORE)
    }

    pub(crate) fn risk_labels(&self) -> impl Iterator<Item = &str> {
        self.labels(FactorKind::Risk)
    }

    pub(crate) fn risk_count(&self) -> usize {
        self.risk_labels().count()
    }

    fn labels(&self, kind: FactorKind) -> impl Iterator<Item = &str> {
        self.factors
            .iter()
            .filter(move |factor| factor.kind == kind)
            .map(|factor| factor.label.as_str())
    }

    pub(crate) fn into_result(
        self,
        approved: bool,
        max_loan_amount: f64,
        decision_reason: String,
        data_used: DataUsed,
        policy: DecisionPath,
    ) -> DecisionResult {
        let score = self.score();
        let risk_factors = self.labels(FactorKind::Risk).map(str::to_string).collect();
        let positive_factors = self
            .labels(FactorKind::Positive)
            .map(str::to_string)
            .collect();

        DecisionResult {
            approved,
            score,
            max_loan_amount,
            risk_factors,
            positive_factors,
            factors: self.factors,
            decision_reason,
            data_used,
            policy,
        }
    }
}

/// Facts gathered while scoring that later stages reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ScoreSignals {
    pub(crate) asset_report: Option<AssetReportAnalysis>,
}

impl ScoreSignals {
    pub(crate) fn income(&self) -> Option<f64> {
        self.asset_report.and_then(|analysis| analysis.income)
    }

    pub(crate) fn data_used(&self, snapshot: &NormalizedSnapshot) -> DataUsed {
        let analysis = self.asset_report.unwrap_or_default();
        DataUsed {
            has_balance: snapshot.has_balance,
            has_asset_report: snapshot.asset_report_ready,
            account_age: analysis.days_available,
            avg_balance: analysis
                .balances
                .map(|stats| round_to_hundredths(stats.mean)),
            income_detected: analysis.income,
        }
    }
}

/// Applies the additive balance, history, and institution rules on top of `card`.
pub(crate) fn score_verified(
    card: &mut ScoreCard,
    loan_amount: f64,
    snapshot: &NormalizedSnapshot,
    institutions: &InstitutionDirectory,
) -> ScoreSignals {
    let available = snapshot.available_balance;
    let coverage_pct = if loan_amount > 0.0 {
        (available / loan_amount * 100.0).max(0.0)
    } else {
        0.0
    };

    if available >= loan_amount * 0.5 {
        card.positive(
            Signal::ReserveRatio,
            30,
            format!("Available balance covers {coverage_pct:.0}% of the requested amount"),
        );
    } else if available >= loan_amount * 0.25 {
        card.positive(
            Signal::ReserveRatio,
            15,
            format!("Available balance covers {coverage_pct:.0}% of the requested amount"),
        );
    } else if available < loan_amount * 0.1 {
        card.risk(
            Signal::ReserveRatio,
            -20,
            format!("Low balance: available funds cover only {coverage_pct:.0}% of the requested amount"),
        );
    }

    if available >= 10_000.0 {
        card.positive(
            Signal::AbsoluteBalance,
            20,
            format!("Strong available balance of ${available:.2}"),
        );
    } else if available >= 5_000.0 {
        card.positive(
            Signal::AbsoluteBalance,
            10,
            format!("Healthy available balance of ${available:.2}"),
        );
    } else if available < 1_000.0 {
        card.risk(
            Signal::AbsoluteBalance,
            -15,
            format!("Available balance below $1,000 (${available:.2})"),
        );
    }

    if !snapshot.linked_balances.is_empty() && snapshot.linked_total() >= loan_amount {
        card.positive(
            Signal::MultiAccount,
            15,
            format!(
                "Combined balance of ${:.2} across {} linked accounts covers the requested amount",
                snapshot.linked_total(),
                snapshot.linked_balances.len()
            ),
        );
    }

    let analysis = snapshot.asset_report.as_ref().map(asset_report::analyze);
    if let Some(analysis) = &analysis {
        score_asset_report(card, loan_amount, analysis);
    }

    if institutions.is_major(&snapshot.institution_name) {
        card.positive(
            Signal::InstitutionTrust,
            5,
            format!("Account held at established institution ({})", snapshot.institution_name),
        );
    }

    if snapshot.has_ach {
        card.positive(Signal::AchDetails, 10, "ACH details available for disbursement");
    }

    ScoreSignals {
        asset_report: analysis,
    }
}

fn score_asset_report(card: &mut ScoreCard, loan_amount: f64, analysis: &AssetReportAnalysis) {
    if let Some(stats) = analysis.balances {
        if stats.mean >= loan_amount * 0.3 {
            card.positive(
                Signal::AverageBalance,
                25,
                format!(
                    "Average balance of ${:.2} across {} historical samples",
                    stats.mean, stats.samples
                ),
            );
        }
        if stats.variance < stats.mean * 0.3 {
            card.positive(Signal::BalanceStability, 10, "Stable balance history");
        }
    }

    if let Some(income) = analysis.income {
        card.positive(
            Signal::IncomeDetection,
            20,
            format!("Regular income deposits detected (${income:.2})"),
        );
        if income > 0.0 && loan_amount / CAPACITY_TERM_MONTHS < income * DEBT_TO_INCOME_LIMIT {
            card.positive(
                Signal::DebtToIncome,
                15,
                "Estimated payment fits within 30% of detected income",
            );
        }
    }

    match analysis.days_available {
        Some(days) if days >= 365 => {
            card.positive(
                Signal::AccountAge,
                15,
                format!("Established account history ({days} days)"),
            );
        }
        Some(days) if days >= 180 => {
            card.positive(
                Signal::AccountAge,
                5,
                format!("Moderate account history ({days} days)"),
            );
        }
        Some(days) if days < 90 => {
            card.risk(
                Signal::AccountAge,
                -10,
                format!("Limited account history ({days} days)"),
            );
        }
        _ => {}
    }
}
