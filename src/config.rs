use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{CalcError, Result};
use crate::types::{CalculationType, DayThreshold};

/// scheme id used when a loan carries no calculation method
pub const DEFAULT_SCHEME_ID: &str = "tiered";

/// minimum billable days for day-basis-compound schemes
pub const DEFAULT_MIN_DAYS: u32 = 10;

/// base rate validity when neither the loan nor the scheme sets one
pub const DEFAULT_VALIDITY_MONTHS: u32 = 12;

/// surcharge points over base for monthly-rate schemes
pub const MONTHLY_SURCHARGE_DELTA: Decimal = dec!(0.5);

/// surcharge points over base for annual-rate schemes
pub const ANNUAL_SURCHARGE_DELTA: Decimal = dec!(6);

/// a named interest scheme as stored by the loan system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub calculation_type: CalculationType,
    pub interest_rate: Rate,
    #[serde(default)]
    pub scheme_config: SchemeConfig,
}

/// tunable parameters of a scheme
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// rate once validity months are exceeded
    #[serde(default)]
    pub surcharge_rate: Option<Rate>,
    /// partial-month bands, matched first-to-last
    #[serde(default)]
    pub thresholds: Vec<DayThreshold>,
    #[serde(default)]
    pub min_days: Option<u32>,
    #[serde(default)]
    pub validity_months: Option<u32>,
}

/// something questionable in a scheme configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// thresholds are not ascending by days, first match may shadow later bands
    UnsortedThresholds,
    /// threshold at this position has zero days
    NonPositiveDays { position: usize },
    /// threshold at this position has a fraction outside (0, 1]
    FractionOutOfRange { position: usize, fraction: Decimal },
    /// min_days configured as zero
    ZeroMinDays,
}

impl SchemeConfig {
    /// surcharge rate, defaulting to base plus the strategy's delta
    pub fn surcharge_rate(&self, calculation_type: CalculationType, base: Rate) -> Rate {
        if let Some(rate) = self.surcharge_rate {
            return rate;
        }
        match calculation_type {
            CalculationType::Tiered | CalculationType::DayBasisTiered => {
                base.plus_points(MONTHLY_SURCHARGE_DELTA)
            }
            CalculationType::DayBasisCompound => base.plus_points(ANNUAL_SURCHARGE_DELTA),
            CalculationType::Simple => base,
        }
    }

    pub fn min_days(&self) -> u32 {
        self.min_days.unwrap_or(DEFAULT_MIN_DAYS)
    }

    pub fn validity_months(&self) -> u32 {
        self.validity_months.unwrap_or(DEFAULT_VALIDITY_MONTHS)
    }

    /// check thresholds are ascending by days
    pub fn thresholds_sorted(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0].days <= w[1].days)
    }

    /// report configuration problems without altering the configuration
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !self.thresholds_sorted() {
            issues.push(ConfigIssue::UnsortedThresholds);
        }

        for (position, threshold) in self.thresholds.iter().enumerate() {
            if threshold.days == 0 {
                issues.push(ConfigIssue::NonPositiveDays { position });
            }
            if threshold.fraction <= Decimal::ZERO || threshold.fraction > Decimal::ONE {
                issues.push(ConfigIssue::FractionOutOfRange {
                    position,
                    fraction: threshold.fraction,
                });
            }
        }

        if self.min_days == Some(0) {
            issues.push(ConfigIssue::ZeroMinDays);
        }

        issues
    }
}

impl Scheme {
    /// whole-month scheme at a monthly rate
    pub fn tiered_monthly(slug: &str, monthly_rate: Rate, validity_months: u32) -> Self {
        Self {
            slug: slug.to_string(),
            name: "Tiered Monthly".to_string(),
            calculation_type: CalculationType::Tiered,
            interest_rate: monthly_rate,
            scheme_config: SchemeConfig {
                validity_months: Some(validity_months),
                ..SchemeConfig::default()
            },
        }
    }

    /// monthly-rate scheme with short-month discounting
    ///
    /// under 7 days counts as half a month, under 15 days as three quarters
    pub fn day_basis_tiered(slug: &str, monthly_rate: Rate, validity_months: u32) -> Self {
        Self {
            slug: slug.to_string(),
            name: "Day Basis Tiered".to_string(),
            calculation_type: CalculationType::DayBasisTiered,
            interest_rate: monthly_rate,
            scheme_config: SchemeConfig {
                thresholds: vec![
                    DayThreshold::new(7, dec!(0.5)),
                    DayThreshold::new(15, dec!(0.75)),
                ],
                validity_months: Some(validity_months),
                ..SchemeConfig::default()
            },
        }
    }

    /// annual-rate scheme billed per day on a 360 day year
    pub fn day_basis_compound(slug: &str, annual_rate: Rate, validity_months: u32) -> Self {
        Self {
            slug: slug.to_string(),
            name: "Day Basis Compound".to_string(),
            calculation_type: CalculationType::DayBasisCompound,
            interest_rate: annual_rate,
            scheme_config: SchemeConfig {
                min_days: Some(DEFAULT_MIN_DAYS),
                validity_months: Some(validity_months),
                ..SchemeConfig::default()
            },
        }
    }

    /// annual-rate scheme on a 365 day year
    pub fn simple(slug: &str, annual_rate: Rate) -> Self {
        Self {
            slug: slug.to_string(),
            name: "Simple".to_string(),
            calculation_type: CalculationType::Simple,
            interest_rate: annual_rate,
            scheme_config: SchemeConfig::default(),
        }
    }

    pub fn with_surcharge(mut self, rate: Rate) -> Self {
        self.scheme_config.surcharge_rate = Some(rate);
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<DayThreshold>) -> Self {
        self.scheme_config.thresholds = thresholds;
        self
    }

    pub fn with_min_days(mut self, min_days: u32) -> Self {
        self.scheme_config.min_days = Some(min_days);
        self
    }
}

/// read-only set of schemes keyed by slug
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: HashMap<String, Scheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// build from a list, rejecting duplicate slugs
    pub fn from_schemes(schemes: Vec<Scheme>) -> Result<Self> {
        let mut map = HashMap::with_capacity(schemes.len());
        for scheme in schemes {
            if map.contains_key(&scheme.slug) {
                return Err(CalcError::InvalidConfiguration {
                    message: format!("duplicate scheme slug: {}", scheme.slug),
                });
            }
            map.insert(scheme.slug.clone(), scheme);
        }
        Ok(Self { schemes: map })
    }

    /// load from a JSON array of schemes
    pub fn from_json(json: &str) -> Result<Self> {
        let schemes: Vec<Scheme> =
            serde_json::from_str(json).map_err(|e| CalcError::InvalidConfiguration {
                message: format!("scheme json: {e}"),
            })?;
        Self::from_schemes(schemes)
    }

    /// the standard gold loan schemes
    pub fn with_defaults() -> Self {
        let schemes = [
            Scheme::tiered_monthly(DEFAULT_SCHEME_ID, Rate::from_whole_percent(2), 12),
            Scheme::day_basis_tiered("day_basis_tiered", Rate::from_whole_percent(2), 12),
            Scheme::day_basis_compound("day_basis_compound", Rate::from_whole_percent(24), 12),
            Scheme::simple("simple", Rate::from_whole_percent(18)),
        ];
        Self {
            schemes: schemes.into_iter().map(|s| (s.slug.clone(), s)).collect(),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Scheme> {
        self.schemes.get(slug)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
