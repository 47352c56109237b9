//! Core persistence for the real-estate lending backend.
//! This crate owns record identity, file persistence and index consistency.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::account::{Account, Admin, Buyer, Contact, Credentials, Lender, Portfolio, User};
pub use model::house::{ExitStrategy, House, HouseCondition, HouseDetails, UnitType};
pub use model::investment::Investment;
pub use model::validation::ValidationError;
pub use model::{Record, RecordId};
pub use repo::admin_repo::{AdminRepository, FileAdminRepository};
pub use repo::buyer_repo::{BuyerRepository, FileBuyerRepository};
pub use repo::house_repo::{FileHouseRepository, HouseFiles, HouseRepository};
pub use repo::investment_repo::{FileInvestmentRepository, InvestmentFiles, InvestmentRepository};
pub use repo::keyed_store::KeyedStore;
pub use repo::lender_repo::{FileLenderRepository, LenderRepository};
pub use repo::user_repo::{FileUserRepository, UserRepository};
pub use repo::{ErrorKind, RepoError, RepoResult};
pub use service::investment_service::InvestmentService;
pub use service::stores::{StoreCounts, Stores};
pub use storage::{StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
