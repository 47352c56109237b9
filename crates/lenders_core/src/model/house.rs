//! House records for the application and accepted catalogs.
//!
//! # Responsibility
//! - Describe a financed property: location, physical attributes, loan
//!   figures, lifecycle dates and exit strategy.
//! - Keep catalog-independent fields in `HouseDetails`, so accepting an
//!   application copies them verbatim.
//!
//! # Invariants
//! - Pending applications carry `interest == 0`.
//! - Enum values serialize as their upper-case textual names.
//! - Dates, when present, are ISO-8601 strings.

use super::validation::{check_amount, check_iso_date, ValidationError};
use super::{Record, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HouseCondition {
    Poor,
    Fair,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    SingleResidential,
    LargeScaleResidential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitStrategy {
    FixAndRent,
    FixAndSell,
}

/// Everything about a house except its catalog identity and interest rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseDetails {
    pub address: String,
    pub zipcode: u32,
    pub city: String,
    pub sqft: u32,
    pub condition: HouseCondition,
    pub unit_type: UnitType,
    pub loan_amount: f64,
    pub ltv_percent: f64,
    pub rehab_cost: f64,
    pub rehab_loan: f64,
    #[serde(default)]
    pub rehab_overview: String,
    pub gross_rent_estimate: f64,
    #[serde(default)]
    pub closed_on: bool,
    #[serde(default)]
    pub closing_date: Option<String>,
    #[serde(default)]
    pub turn_around_date: Option<String>,
    pub exit_strategy: ExitStrategy,
}

impl HouseDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount("loan_amount", self.loan_amount)?;
        check_amount("rehab_cost", self.rehab_cost)?;
        check_amount("rehab_loan", self.rehab_loan)?;
        check_amount("gross_rent_estimate", self.gross_rent_estimate)?;
        if !(0.0..=100.0).contains(&self.ltv_percent) {
            return Err(ValidationError::LoanToValueOutOfRange(self.ltv_percent));
        }
        if let Some(date) = &self.closing_date {
            check_iso_date("closing_date", date)?;
        }
        if let Some(date) = &self.turn_around_date {
            check_iso_date("turn_around_date", date)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: RecordId,
    #[serde(flatten)]
    pub details: HouseDetails,
    /// Annual rate fixed on acceptance; `0` while pending.
    pub interest: f64,
}

impl House {
    /// Builds a pending application record.
    pub fn application(id: RecordId, details: HouseDetails) -> Self {
        Self {
            id,
            details,
            interest: 0.0,
        }
    }

    /// Builds an accepted, investable record.
    pub fn accepted(id: RecordId, details: HouseDetails, interest: f64) -> Self {
        Self {
            id,
            details,
            interest,
        }
    }
}

impl Record for House {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_amount("interest", self.interest)?;
        self.details.validate()
    }
}
