//! House repository: pending applications and the accepted catalog.
//!
//! # Responsibility
//! - Keep two independent keyed stores, each with its own id sequence.
//! - Move an application into the accepted catalog on acceptance.
//!
//! # Invariants
//! - Applications are stored with `interest == 0`.
//! - Acceptance allocates a fresh id from the accepted catalog; callers
//!   must not assume it equals the application id.
//! - A failed acceptance leaves the application in place and the accepted
//!   catalog unchanged. If the application cannot be put back, the error
//!   carries it so the caller can resubmit it.

use crate::model::house::{House, HouseDetails};
use crate::model::RecordId;
use crate::repo::keyed_store::KeyedStore;
use crate::repo::{RepoError, RepoResult};
use crate::storage::StorageResult;
use log::{error, info};
use std::path::PathBuf;

pub trait HouseRepository {
    /// Inserts straight into the accepted catalog.
    fn create_house(&self, details: HouseDetails, interest: f64) -> RepoResult<House>;
    /// Files a pending application; interest is forced to zero.
    fn create_application(&self, details: HouseDetails) -> RepoResult<House>;
    /// Moves application `application_id` into the accepted catalog.
    ///
    /// Fails with `AcceptanceLost` only when the accepted-side create and
    /// the restore of the taken application both failed.
    fn accept_application(&self, application_id: RecordId, interest: f64) -> RepoResult<House>;
    fn get_house(&self, id: RecordId) -> Option<House>;
    fn get_application(&self, id: RecordId) -> Option<House>;
    fn list_houses(&self) -> Vec<House>;
    fn list_applications(&self) -> Vec<House>;
    fn update_house(&self, id: RecordId, house: House) -> RepoResult<House>;
    fn delete_house(&self, id: RecordId) -> RepoResult<bool>;
    /// Rejects an application. Nothing reaches the accepted catalog.
    fn delete_application(&self, id: RecordId) -> RepoResult<bool>;
}

/// Paths of the two house catalog files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseFiles {
    pub houses: PathBuf,
    pub applications: PathBuf,
}

pub struct FileHouseRepository {
    houses: KeyedStore<House>,
    applications: KeyedStore<House>,
}

impl FileHouseRepository {
    pub fn open(files: &HouseFiles) -> StorageResult<Self> {
        Ok(Self {
            houses: KeyedStore::open("house", files.houses.clone())?,
            applications: KeyedStore::open("house application", files.applications.clone())?,
        })
    }

    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    pub fn application_count(&self) -> usize {
        self.applications.len()
    }

    /// Puts a taken application back after the accepted-side create failed.
    fn settle_failed_acceptance(&self, application: House, cause: RepoError) -> RepoError {
        let application_id = application.id;
        match self.applications.restore(application.clone()) {
            Ok(()) => cause,
            Err(restore) => {
                error!(
                    "event=application_accept module=repo status=error application_id={} error_code=restore_failed error={}",
                    application_id, restore
                );
                RepoError::AcceptanceLost {
                    application: Box::new(application),
                    cause: Box::new(cause),
                    restore: Box::new(restore),
                }
            }
        }
    }
}

impl HouseRepository for FileHouseRepository {
    fn create_house(&self, details: HouseDetails, interest: f64) -> RepoResult<House> {
        self.houses
            .create_with(|id| House::accepted(id, details, interest))
    }

    fn create_application(&self, details: HouseDetails) -> RepoResult<House> {
        self.applications
            .create_with(|id| House::application(id, details))
    }

    fn accept_application(&self, application_id: RecordId, interest: f64) -> RepoResult<House> {
        let application =
            self.applications
                .take(application_id)?
                .ok_or(RepoError::NotFound {
                    entity: self.applications.label(),
                    id: application_id,
                })?;

        let details = application.details.clone();
        match self
            .houses
            .create_with(|id| House::accepted(id, details, interest))
        {
            Ok(house) => {
                info!(
                    "event=application_accept module=repo status=ok application_id={} house_id={}",
                    application_id, house.id
                );
                Ok(house)
            }
            Err(err) => Err(self.settle_failed_acceptance(application, err)),
        }
    }

    fn get_house(&self, id: RecordId) -> Option<House> {
        self.houses.get(id)
    }

    fn get_application(&self, id: RecordId) -> Option<House> {
        self.applications.get(id)
    }

    fn list_houses(&self) -> Vec<House> {
        self.houses.list()
    }

    fn list_applications(&self) -> Vec<House> {
        self.applications.list()
    }

    fn update_house(&self, id: RecordId, house: House) -> RepoResult<House> {
        self.houses.replace(id, house)
    }

    fn delete_house(&self, id: RecordId) -> RepoResult<bool> {
        self.houses.delete(id)
    }

    fn delete_application(&self, id: RecordId) -> RepoResult<bool> {
        self.applications.delete(id)
    }
}
