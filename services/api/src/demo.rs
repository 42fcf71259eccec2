use crate::infra::InMemoryDecisionStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use lendwise::config::{AppConfig, UnderwritingSettings};
use lendwise::error::AppError;
use lendwise::workflows::underwriting::{
    AccountBalance, AccountSnapshot, AchNumbers, AssetReport, AssetReportData, AssetReportStatus,
    CustomerInfo, DecisionInput, DecisionRecord, HistoricalBalance, LinkedAccount, Offer,
    ReportTransaction, UnderwritingService, UnderwritingTables,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// Path to a JSON decision request. Reads stdin when omitted or set to "-".
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Emit compact JSON instead of pretty-printed output
    #[arg(long)]
    pub(crate) compact: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OffersArgs {
    /// Requested loan amount in dollars
    #[arg(long)]
    pub(crate) amount: f64,
    /// Risk score produced by a prior decision (300-850)
    #[arg(long)]
    pub(crate) score: i16,
    /// Treat the application as declined (prints an empty menu)
    #[arg(long)]
    pub(crate) declined: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Show the scoring factor trail for every sample application
    #[arg(long)]
    pub(crate) show_factors: bool,
}

fn cli_service() -> Result<UnderwritingService<InMemoryDecisionStore>, AppError> {
    let config = AppConfig::load()?;
    Ok(UnderwritingService::with_settings(
        Arc::new(InMemoryDecisionStore::default()),
        UnderwritingTables::standard(),
        config.underwriting,
    ))
}

pub(crate) fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let DecideArgs { input, compact } = args;

    let raw = match input {
        Some(path) if path.to_str() != Some("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let request: DecisionInput = serde_json::from_str(&raw)?;
    let record = cli_service()?.decide(request)?;

    let rendered = if compact {
        serde_json::to_string(&record.view())?
    } else {
        serde_json::to_string_pretty(&record.view())?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_offers(args: OffersArgs) -> Result<(), AppError> {
    let service = cli_service()?;
    let offers = service.offers(args.amount, args.score, !args.declined)?;

    if offers.is_empty() {
        println!("No offers: declined applications do not receive an offer menu.");
        return Ok(());
    }

    println!(
        "Offer menu for ${:.2} at score {}",
        args.amount, args.score
    );
    render_offers(&offers);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = UnderwritingService::with_settings(
        Arc::new(InMemoryDecisionStore::default()),
        UnderwritingTables::standard(),
        UnderwritingSettings::default(),
    );

    println!("Underwriting decision demo");
    for scenario in sample_scenarios() {
        println!("\n{}", scenario.title);
        let record = service.decide(scenario.input)?;
        render_decision(&record, args.show_factors);
    }

    Ok(())
}

struct Scenario {
    title: &'static str,
    input: DecisionInput,
}

fn render_decision(record: &DecisionRecord, show_factors: bool) {
    let result = &record.result;
    println!(
        "- Decision {} ({} path): {} | score {} | max ${:.2}",
        record.decision_id,
        result.policy.label(),
        if result.approved { "approved" } else { "declined" },
        result.score,
        result.max_loan_amount
    );
    println!("  {}", result.decision_reason);

    if show_factors {
        for factor in &result.factors {
            println!("    {:+4}  {}", factor.delta, factor.label);
        }
    } else {
        for label in &result.positive_factors {
            println!("    + {label}");
        }
        for label in &result.risk_factors {
            println!("    - {label}");
        }
    }

    if !record.offers.is_empty() {
        render_offers(&record.offers);
    }
}

fn render_offers(offers: &[Offer]) {
    for offer in offers {
        println!(
            "  {:>2} months @ {:>5.2}% APR: ${:.2}/mo | down ${:.0} | fee ${:.0} | total ${:.2}",
            offer.term_months,
            offer.apr,
            offer.monthly_payment,
            offer.down_payment,
            offer.origination_fee,
            offer.total_amount
        );
    }
}

fn sample_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Verified account with a year of history and payroll deposits",
            input: DecisionInput {
                loan_amount: 8_000.0,
                account_snapshot: AccountSnapshot {
                    institution_name: "Chase".to_string(),
                    account_mask: "1123".to_string(),
                    account_type: "checking".to_string(),
                    balance: Some(balance(9_400.0)),
                    ach_numbers: Some(sample_ach()),
                    all_accounts: Some(vec![
                        linked("Everyday Checking", 9_400.0),
                        linked("Savings", 4_100.0),
                    ]),
                    asset_report: Some(sample_report(
                        420,
                        &[8_900.0, 9_150.0, 9_400.0],
                        &[-3_100.0, -3_100.0],
                    )),
                    manual_entry: false,
                    verification_status: None,
                },
                customer_info: sample_customer("Avery", "Lindqvist"),
            },
        },
        Scenario {
            title: "Verified account with a thin balance and a short history",
            input: DecisionInput {
                loan_amount: 12_000.0,
                account_snapshot: AccountSnapshot {
                    institution_name: "Harbor Community Credit Union".to_string(),
                    account_mask: "7781".to_string(),
                    account_type: "checking".to_string(),
                    balance: Some(balance(640.0)),
                    ach_numbers: None,
                    all_accounts: None,
                    asset_report: Some(sample_report(45, &[510.0, 760.0], &[])),
                    manual_entry: false,
                    verification_status: None,
                },
                customer_info: sample_customer("Jordan", "Reyes"),
            },
        },
        Scenario {
            title: "Manually entered bank details within the manual-entry limit",
            input: manual_input(4_500.0, "Morgan", "Achebe"),
        },
        Scenario {
            title: "Manually entered bank details above the manual-entry limit",
            input: manual_input(7_500.0, "Riley", "Nakamura"),
        },
    ]
}

fn manual_input(loan_amount: f64, first: &str, last: &str) -> DecisionInput {
    DecisionInput {
        loan_amount,
        account_snapshot: AccountSnapshot {
            institution_name: "Lakeside Savings".to_string(),
            account_mask: "0456".to_string(),
            account_type: "checking".to_string(),
            balance: None,
            ach_numbers: Some(sample_ach()),
            all_accounts: None,
            asset_report: None,
            manual_entry: true,
            verification_status: Some("pending_manual_verification".to_string()),
        },
        customer_info: sample_customer(first, last),
    }
}

fn balance(available: f64) -> AccountBalance {
    AccountBalance {
        current: Some(available),
        available: Some(available),
        limit: None,
    }
}

fn linked(name: &str, available: f64) -> LinkedAccount {
    LinkedAccount {
        account_id: None,
        name: Some(name.to_string()),
        balance: Some(balance(available)),
    }
}

fn sample_ach() -> AchNumbers {
    AchNumbers {
        routing: "011000015".to_string(),
        account: "4400123987".to_string(),
    }
}

fn sample_report(days_available: u32, balances: &[f64], deposits: &[f64]) -> AssetReport {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_else(|| Local::now().date_naive());

    AssetReport {
        status: Some(AssetReportStatus::Ready),
        report: Some(AssetReportData {
            days_available: Some(days_available),
            historical_balances: balances
                .iter()
                .zip(0..)
                .map(|(current, offset)| HistoricalBalance {
                    date: start + chrono::Days::new(offset * 30),
                    current: *current,
                })
                .collect(),
            transactions: deposits
                .iter()
                .zip(0..)
                .map(|(amount, offset)| ReportTransaction {
                    amount: *amount,
                    date: start + chrono::Days::new(offset * 14),
                    name: Some("Payroll deposit".to_string()),
                })
                .collect(),
        }),
    }
}

fn sample_customer(first: &str, last: &str) -> CustomerInfo {
    CustomerInfo {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15)
            .unwrap_or_else(|| Local::now().date_naive()),
    }
}
