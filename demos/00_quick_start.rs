/// quick start - accrue interest on a single gold loan
use pledge_interest_rs::chrono::NaiveDate;
use pledge_interest_rs::{AccrualOrchestrator, LoanRecord, Money, Rate, SchemeRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = AccrualOrchestrator::new(SchemeRegistry::with_defaults());

    // 1 lakh at 2% a month, base rate valid for 12 months
    let loan_date = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?;
    let loan = LoanRecord::new("GL-0001", Money::from_major(100_000), Rate::from_whole_percent(2), 12, loan_date)
        .with_scheme("tiered");

    let today = NaiveDate::from_ymd_opt(2024, 4, 20).ok_or("bad date")?;
    let accrued = orchestrator.calculate_accrued_interest_at(&loan, today);

    println!("{}", accrued.json());

    Ok(())
}
