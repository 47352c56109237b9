//! Backing-file layout for every store.
//!
//! # Responsibility
//! - Name one path per backing file.
//! - Derive the default layout from a single data directory.

use crate::repo::house_repo::HouseFiles;
use crate::repo::investment_repo::InvestmentFiles;
use std::path::{Path, PathBuf};

pub const USERS_FILE: &str = "users.json";
pub const ADMINS_FILE: &str = "admins.json";
pub const BUYERS_FILE: &str = "buyers.json";
pub const LENDERS_FILE: &str = "lenders.json";
pub const HOUSES_FILE: &str = "houses.json";
pub const HOUSE_APPLICATIONS_FILE: &str = "houseApplications.json";
pub const INVESTMENTS_FILE: &str = "investments.json";
pub const INVESTMENTS_BY_INVESTOR_FILE: &str = "investmentsByInvestor.json";
pub const INVESTMENTS_BY_HOUSE_FILE: &str = "investmentsByHouse.json";

/// Paths read at startup and rewritten on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub users: PathBuf,
    pub admins: PathBuf,
    pub buyers: PathBuf,
    pub lenders: PathBuf,
    pub houses: HouseFiles,
    pub investments: InvestmentFiles,
}

impl StoreConfig {
    /// Places every backing file directly under `dir` with default names.
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users: dir.join(USERS_FILE),
            admins: dir.join(ADMINS_FILE),
            buyers: dir.join(BUYERS_FILE),
            lenders: dir.join(LENDERS_FILE),
            houses: HouseFiles {
                houses: dir.join(HOUSES_FILE),
                applications: dir.join(HOUSE_APPLICATIONS_FILE),
            },
            investments: InvestmentFiles {
                records: dir.join(INVESTMENTS_FILE),
                by_investor: dir.join(INVESTMENTS_BY_INVESTOR_FILE),
                by_house: dir.join(INVESTMENTS_BY_HOUSE_FILE),
            },
        }
    }
}
