//! Owned set of every store, opened from one `StoreConfig`.

use crate::config::StoreConfig;
use crate::repo::admin_repo::FileAdminRepository;
use crate::repo::buyer_repo::FileBuyerRepository;
use crate::repo::house_repo::FileHouseRepository;
use crate::repo::investment_repo::FileInvestmentRepository;
use crate::repo::lender_repo::FileLenderRepository;
use crate::repo::user_repo::FileUserRepository;
use crate::service::investment_service::InvestmentService;
use crate::storage::StorageResult;
use log::info;
use std::time::Instant;

/// All file-backed stores. Each keeps its own lock.
pub struct Stores {
    pub users: FileUserRepository,
    pub admins: FileAdminRepository,
    pub buyers: FileBuyerRepository,
    pub lenders: FileLenderRepository,
    pub houses: FileHouseRepository,
    pub investments: FileInvestmentRepository,
}

/// Record counts per store, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub admins: usize,
    pub buyers: usize,
    pub lenders: usize,
    pub houses: usize,
    pub house_applications: usize,
    pub investments: usize,
}

impl Stores {
    /// Opens every store; fails on the first unreadable backing file.
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let started_at = Instant::now();
        let stores = Self {
            users: FileUserRepository::open(config.users.clone())?,
            admins: FileAdminRepository::open(config.admins.clone())?,
            buyers: FileBuyerRepository::open(config.buyers.clone())?,
            lenders: FileLenderRepository::open(config.lenders.clone())?,
            houses: FileHouseRepository::open(&config.houses)?,
            investments: FileInvestmentRepository::open(&config.investments)?,
        };
        info!(
            "event=stores_open module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(stores)
    }

    pub fn investment_service(
        &self,
    ) -> InvestmentService<'_, FileLenderRepository, FileHouseRepository, FileInvestmentRepository>
    {
        InvestmentService::new(&self.lenders, &self.houses, &self.investments)
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            users: self.users.len(),
            admins: self.admins.len(),
            buyers: self.buyers.len(),
            lenders: self.lenders.len(),
            houses: self.houses.house_count(),
            house_applications: self.houses.application_count(),
            investments: self.investments.len(),
        }
    }
}
