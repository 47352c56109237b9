//! Lender repository contract and JSON-file implementation.
//!
//! Lenders are the investors referenced by `Investment::investor_id`.

use crate::model::account::{Contact, Credentials, Lender};
use crate::model::RecordId;
use crate::repo::keyed_store::KeyedStore;
use crate::repo::RepoResult;
use crate::storage::StorageResult;
use std::path::PathBuf;

pub trait LenderRepository {
    fn create_lender(
        &self,
        credentials: Credentials,
        contact: Contact,
        funds_available: f64,
    ) -> RepoResult<Lender>;
    fn get_lender(&self, id: RecordId) -> Option<Lender>;
    fn find_lender_by_username(&self, username: &str) -> Option<Lender>;
    fn list_lenders(&self) -> Vec<Lender>;
    fn update_lender(&self, id: RecordId, lender: Lender) -> RepoResult<Lender>;
    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Lender>;
    fn delete_lender(&self, id: RecordId) -> RepoResult<bool>;
    fn authorize(&self, username: &str, password: &str) -> bool;
    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool>;
}

pub struct FileLenderRepository {
    store: KeyedStore<Lender>,
}

impl FileLenderRepository {
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self {
            store: KeyedStore::open("lender", path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl LenderRepository for FileLenderRepository {
    fn create_lender(
        &self,
        credentials: Credentials,
        contact: Contact,
        funds_available: f64,
    ) -> RepoResult<Lender> {
        self.store.create_with(|id| Lender {
            id,
            credentials,
            contact,
            funds_available,
        })
    }

    fn get_lender(&self, id: RecordId) -> Option<Lender> {
        self.store.get(id)
    }

    fn find_lender_by_username(&self, username: &str) -> Option<Lender> {
        self.store.find_by_username(username)
    }

    fn list_lenders(&self) -> Vec<Lender> {
        self.store.list()
    }

    fn update_lender(&self, id: RecordId, lender: Lender) -> RepoResult<Lender> {
        self.store.replace(id, lender)
    }

    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Lender> {
        self.store.update_password(id, current, new)
    }

    fn delete_lender(&self, id: RecordId) -> RepoResult<bool> {
        self.store.delete(id)
    }

    fn authorize(&self, username: &str, password: &str) -> bool {
        self.store.authorize(username, password)
    }

    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool> {
        self.store.verify_password(id, password)
    }
}
