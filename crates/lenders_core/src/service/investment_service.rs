//! Investment use-case service.
//!
//! # Responsibility
//! - Check that the investor and the financed house exist before an
//!   investment is recorded.
//!
//! # Invariants
//! - A rejected reference writes nothing to the investment store.
//! - Investors are lender accounts; houses come from the accepted catalog.
//! - A lender or house with recorded investments is not deleted through
//!   this service. Deleting through the stores directly leaves those
//!   investments readable only via `InvestmentRepository`.

use crate::model::investment::Investment;
use crate::model::RecordId;
use crate::repo::house_repo::HouseRepository;
use crate::repo::investment_repo::InvestmentRepository;
use crate::repo::lender_repo::LenderRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Borrowing facade over the three stores an investment touches.
pub struct InvestmentService<'a, L, H, I> {
    lenders: &'a L,
    houses: &'a H,
    investments: &'a I,
}

impl<'a, L, H, I> InvestmentService<'a, L, H, I>
where
    L: LenderRepository,
    H: HouseRepository,
    I: InvestmentRepository,
{
    pub fn new(lenders: &'a L, houses: &'a H, investments: &'a I) -> Self {
        Self {
            lenders,
            houses,
            investments,
        }
    }

    /// Records an investment after checking both references.
    ///
    /// # Errors
    /// - `NotFound` for an unknown lender or an unaccepted/unknown house.
    /// - Validation and storage errors from the investment store.
    pub fn invest(
        &self,
        investor_id: RecordId,
        house_id: RecordId,
        date: &str,
        amount: f64,
    ) -> RepoResult<Investment> {
        self.require_lender(investor_id)?;
        self.require_house(house_id)?;

        let investment =
            self.investments
                .create_investment(investor_id, house_id, date, amount)?;
        info!(
            "event=investment_create module=service status=ok investment_id={} investor_id={} house_id={}",
            investment.id, investor_id, house_id
        );
        Ok(investment)
    }

    /// Removes one investment. Returns whether it existed.
    pub fn withdraw(&self, investment_id: RecordId) -> RepoResult<bool> {
        self.investments.remove_investment(investment_id)
    }

    /// Investments of a known lender; empty when they have none.
    pub fn portfolio(&self, investor_id: RecordId) -> RepoResult<Vec<Investment>> {
        self.require_lender(investor_id)?;
        Ok(self.investments.list_by_investor(investor_id))
    }

    /// Investments financing a known accepted house.
    pub fn backers(&self, house_id: RecordId) -> RepoResult<Vec<Investment>> {
        self.require_house(house_id)?;
        Ok(self.investments.list_by_house(house_id))
    }

    /// Deletes a lender that has no recorded investments.
    ///
    /// # Errors
    /// - `Conflict` while investments still reference the lender.
    pub fn delete_lender(&self, investor_id: RecordId) -> RepoResult<bool> {
        let open = self.investments.list_by_investor(investor_id).len();
        if open > 0 {
            return Err(RepoError::Conflict(format!(
                "lender {investor_id} still holds {open} investment(s)"
            )));
        }
        let deleted = self.lenders.delete_lender(investor_id)?;
        info!(
            "event=lender_delete module=service status=ok investor_id={} deleted={}",
            investor_id, deleted
        );
        Ok(deleted)
    }

    /// Deletes an accepted house that no investment finances.
    ///
    /// # Errors
    /// - `Conflict` while investments still reference the house.
    pub fn delete_house(&self, house_id: RecordId) -> RepoResult<bool> {
        let open = self.investments.list_by_house(house_id).len();
        if open > 0 {
            return Err(RepoError::Conflict(format!(
                "house {house_id} still backs {open} investment(s)"
            )));
        }
        let deleted = self.houses.delete_house(house_id)?;
        info!(
            "event=house_delete module=service status=ok house_id={} deleted={}",
            house_id, deleted
        );
        Ok(deleted)
    }

    fn require_lender(&self, investor_id: RecordId) -> RepoResult<()> {
        match self.lenders.get_lender(investor_id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound {
                entity: "lender",
                id: investor_id,
            }),
        }
    }

    fn require_house(&self, house_id: RecordId) -> RepoResult<()> {
        match self.houses.get_house(house_id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound {
                entity: "house",
                id: house_id,
            }),
        }
    }
}
