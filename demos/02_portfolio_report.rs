/// portfolio report - dashboard totals with a shared test clock
use pledge_interest_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};
use pledge_interest_rs::{
    AccrualOrchestrator, LoanRecord, Money, Rate, SafeTimeProvider, SchemeRegistry, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = SchemeRegistry::from_json(
        r#"[
            {"slug": "gold-std", "calculation_type": "tiered", "interest_rate": "2",
             "scheme_config": {"validity_months": 12}},
            {"slug": "gold-flexi", "calculation_type": "day_basis_tiered", "interest_rate": "1.75",
             "scheme_config": {"thresholds": [{"days": 7, "fraction": "0.5"}, {"days": 15, "fraction": "0.75"}]}}
        ]"#,
    )?;
    let orchestrator = AccrualOrchestrator::new(registry);

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
    let control = time.test_control().expect("test clock");

    let loans = vec![
        LoanRecord::new("GL-0101", Money::from_major(80_000), Rate::from_whole_percent(2), 12,
            NaiveDate::from_ymd_opt(2024, 1, 5).ok_or("bad date")?)
            .with_scheme("gold-std"),
        LoanRecord::new("GL-0102", Money::from_major(120_000), Rate::from_percentage("1.75".parse()?), 6,
            NaiveDate::from_ymd_opt(2023, 12, 20).ok_or("bad date")?)
            .with_scheme("gold-flexi")
            .with_balance(Money::from_major(90_000))
            .with_payment(Money::from_major(30_000), NaiveDate::from_ymd_opt(2024, 3, 2).ok_or("bad date")?),
        // scheme retired since origination, reported via fallback
        LoanRecord::new("GL-0103", Money::from_major(40_000), Rate::from_whole_percent(2), 12,
            NaiveDate::from_ymd_opt(2024, 2, 11).ok_or("bad date")?)
            .with_scheme("gold-2019"),
    ];

    for _ in 0..3 {
        let summary = orchestrator.summarize(&loans, time.now().date_naive());
        println!(
            "{}: {} loans, balance {}, interest {} ({} fallback)",
            summary.evaluation_date,
            summary.loan_count,
            summary.total_balance,
            summary.total_interest,
            summary.fallback_count
        );
        for row in &summary.rows {
            println!("  {:<8} {:>8} {:<24} {}", row.loan_number, row.interest, row.duration, row.rate);
        }
        control.advance(Duration::days(30));
    }

    Ok(())
}
