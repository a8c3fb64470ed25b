/// scheme preview - compare strategies for the same principal and dates
use pledge_interest_rs::chrono::NaiveDate;
use pledge_interest_rs::{CalcError, InterestEngine, Money, Rate, Scheme};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = InterestEngine::new();
    let amount = Money::from_major(250_000);
    let start = NaiveDate::from_ymd_opt(2024, 1, 10).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2024, 8, 14).ok_or("bad date")?;

    let schemes = [
        Scheme::tiered_monthly("tiered", Rate::from_whole_percent(2), 6),
        Scheme::day_basis_tiered("day_basis_tiered", Rate::from_whole_percent(2), 6),
        Scheme::day_basis_compound("day_basis_compound", Rate::from_whole_percent(24), 6),
        Scheme::simple("simple", Rate::from_whole_percent(18)),
    ];

    for scheme in &schemes {
        let calc = engine.calculate(scheme, amount, start, end, None, None)?;
        println!(
            "{:<20} {:>10}  {:<28} {}",
            scheme.slug, calc.total_interest, calc.total_months, calc.final_interest_rate
        );
    }

    // preview tools see the date range error directly
    match engine.calculate(&schemes[0], amount, end, start, None, None) {
        Err(CalcError::InvalidDateRange { start, end }) => {
            println!("rejected: {} is before {}", end, start);
        }
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
