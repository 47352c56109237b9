//! Investment record linking an investor to an accepted house.

use super::validation::{check_amount, check_iso_date, ValidationError};
use super::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// One capital commitment.
///
/// `investor_id` references a lender account and `house_id` references the
/// accepted house catalog. Neither reference is enforced here; the service
/// layer checks them before a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: RecordId,
    pub investor_id: RecordId,
    pub house_id: RecordId,
    /// Transaction date as an ISO-8601 string.
    pub date: String,
    #[serde(rename = "money_invested")]
    pub amount: f64,
}

impl Record for Investment {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_iso_date("date", &self.date)?;
        check_amount("money_invested", self.amount)
    }
}
