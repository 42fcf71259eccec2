use super::decisioning::{AprSchedule, TermPricing};
use super::domain::{round_to_hundredths, round_whole, Offer};

/// Builds the installment menu for an approved applicant from an [`AprSchedule`].
#[derive(Debug, Clone, Default)]
pub struct OfferGenerator {
    schedule: AprSchedule,
}

impl OfferGenerator {
    pub fn new(schedule: AprSchedule) -> Self {
        Self { schedule }
    }

    pub fn standard() -> Self {
        Self::new(AprSchedule::standard())
    }

    pub fn schedule(&self) -> &AprSchedule {
        &self.schedule
    }

    /// Declined applicants get an empty menu.
    pub fn generate(&self, loan_amount: f64, score: i16, approved: bool) -> Vec<Offer> {
        if !approved {
            return Vec::new();
        }

        self.schedule
            .terms
            .iter()
            .map(|term| self.offer_for(term, loan_amount, score))
            .collect()
    }

    fn offer_for(&self, term: &TermPricing, loan_amount: f64, score: i16) -> Offer {
        let apr = round_to_hundredths(term.base_apr + self.schedule.adjustment_for(score));

        let down_payment = match term.down_payment {
            Some(rule) if score < rule.below_score => round_whole(loan_amount * rule.rate),
            _ => 0.0,
        };

        let monthly_payment = amortized_payment(loan_amount - down_payment, apr, term.term_months);
        let origination_fee = round_whole(loan_amount * term.origination_fee_rate);
        let total_amount =
            round_to_hundredths(monthly_payment * f64::from(term.term_months) + down_payment);

        Offer {
            term_months: term.term_months,
            apr,
            monthly_payment,
            down_payment,
            origination_fee,
            total_amount,
        }
    }
}

/// Level monthly payment retiring `principal` over `term_months` at `apr` percent, in cents.
pub fn amortized_payment(principal: f64, apr: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return round_to_hundredths(principal);
    }

    let periods = f64::from(term_months);
    let rate = apr / 100.0 / 12.0;
    if rate == 0.0 {
        return round_to_hundredths(principal / periods);
    }

    let growth = (1.0 + rate).powf(periods);
    round_to_hundredths(principal * rate * growth / (growth - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_spreads_principal_evenly() {
        assert_eq!(amortized_payment(1_200.0, 0.0, 12), 100.0);
    }

    #[test]
    fn matches_reference_amortization() {
        // 10,000 at 12% over 12 months.
        assert_eq!(amortized_payment(10_000.0, 12.0, 12), 888.49);
    }

    #[test]
    fn declined_applicants_get_no_offers() {
        assert!(OfferGenerator::standard()
            .generate(10_000.0, 820, false)
            .is_empty());
    }

    #[test]
    fn custom_schedules_drive_the_menu() {
        let mut schedule = AprSchedule::standard();
        schedule.terms.truncate(1);
        let generator = OfferGenerator::new(schedule);

        let offers = generator.generate(5_000.0, 720, true);

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].term_months, 24);
        assert_eq!(generator.schedule().terms.len(), 1);
    }
}
