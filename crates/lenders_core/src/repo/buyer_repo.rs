//! Buyer repository contract and JSON-file implementation.

use crate::model::account::{Buyer, Contact, Credentials, Portfolio};
use crate::model::RecordId;
use crate::repo::keyed_store::KeyedStore;
use crate::repo::RepoResult;
use crate::storage::StorageResult;
use std::path::PathBuf;

pub trait BuyerRepository {
    fn create_buyer(
        &self,
        credentials: Credentials,
        contact: Contact,
        portfolio: Portfolio,
    ) -> RepoResult<Buyer>;
    fn get_buyer(&self, id: RecordId) -> Option<Buyer>;
    fn find_buyer_by_username(&self, username: &str) -> Option<Buyer>;
    fn list_buyers(&self) -> Vec<Buyer>;
    /// Full replacement of contact and portfolio data; the stored id wins.
    fn update_buyer(&self, id: RecordId, buyer: Buyer) -> RepoResult<Buyer>;
    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Buyer>;
    fn delete_buyer(&self, id: RecordId) -> RepoResult<bool>;
    fn authorize(&self, username: &str, password: &str) -> bool;
    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool>;
}

pub struct FileBuyerRepository {
    store: KeyedStore<Buyer>,
}

impl FileBuyerRepository {
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self {
            store: KeyedStore::open("buyer", path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl BuyerRepository for FileBuyerRepository {
    fn create_buyer(
        &self,
        credentials: Credentials,
        contact: Contact,
        portfolio: Portfolio,
    ) -> RepoResult<Buyer> {
        self.store.create_with(|id| Buyer {
            id,
            credentials,
            contact,
            portfolio,
        })
    }

    fn get_buyer(&self, id: RecordId) -> Option<Buyer> {
        self.store.get(id)
    }

    fn find_buyer_by_username(&self, username: &str) -> Option<Buyer> {
        self.store.find_by_username(username)
    }

    fn list_buyers(&self) -> Vec<Buyer> {
        self.store.list()
    }

    fn update_buyer(&self, id: RecordId, buyer: Buyer) -> RepoResult<Buyer> {
        self.store.replace(id, buyer)
    }

    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Buyer> {
        self.store.update_password(id, current, new)
    }

    fn delete_buyer(&self, id: RecordId) -> RepoResult<bool> {
        self.store.delete(id)
    }

    fn authorize(&self, username: &str, password: &str) -> bool {
        self.store.authorize(username, password)
    }

    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool> {
        self.store.verify_password(id, password)
    }
}
