//! Admin repository contract and JSON-file implementation.

use crate::model::account::{Admin, Credentials};
use crate::model::RecordId;
use crate::repo::keyed_store::KeyedStore;
use crate::repo::RepoResult;
use crate::storage::StorageResult;
use std::path::PathBuf;

pub trait AdminRepository {
    fn create_admin(
        &self,
        credentials: Credentials,
        email: &str,
        phone_number: &str,
    ) -> RepoResult<Admin>;
    fn get_admin(&self, id: RecordId) -> Option<Admin>;
    fn find_admin_by_username(&self, username: &str) -> Option<Admin>;
    fn list_admins(&self) -> Vec<Admin>;
    fn update_admin(&self, id: RecordId, admin: Admin) -> RepoResult<Admin>;
    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Admin>;
    fn update_email(&self, id: RecordId, email: &str) -> RepoResult<Admin>;
    fn update_phone_number(&self, id: RecordId, phone_number: &str) -> RepoResult<Admin>;
    fn delete_admin(&self, id: RecordId) -> RepoResult<bool>;
    fn authorize(&self, username: &str, password: &str) -> bool;
    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool>;
}

pub struct FileAdminRepository {
    store: KeyedStore<Admin>,
}

impl FileAdminRepository {
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self {
            store: KeyedStore::open("admin", path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl AdminRepository for FileAdminRepository {
    fn create_admin(
        &self,
        credentials: Credentials,
        email: &str,
        phone_number: &str,
    ) -> RepoResult<Admin> {
        self.store.create_with(|id| Admin {
            id,
            credentials,
            email: email.to_string(),
            phone_number: phone_number.to_string(),
        })
    }

    fn get_admin(&self, id: RecordId) -> Option<Admin> {
        self.store.get(id)
    }

    fn find_admin_by_username(&self, username: &str) -> Option<Admin> {
        self.store.find_by_username(username)
    }

    fn list_admins(&self) -> Vec<Admin> {
        self.store.list()
    }

    fn update_admin(&self, id: RecordId, admin: Admin) -> RepoResult<Admin> {
        self.store.replace(id, admin)
    }

    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<Admin> {
        self.store.update_password(id, current, new)
    }

    fn update_email(&self, id: RecordId, email: &str) -> RepoResult<Admin> {
        self.store.modify(id, |admin| {
            admin.email = email.to_string();
            Ok(())
        })
    }

    fn update_phone_number(&self, id: RecordId, phone_number: &str) -> RepoResult<Admin> {
        self.store.modify(id, |admin| {
            admin.phone_number = phone_number.to_string();
            Ok(())
        })
    }

    fn delete_admin(&self, id: RecordId) -> RepoResult<bool> {
        self.store.delete(id)
    }

    fn authorize(&self, username: &str, password: &str) -> bool {
        self.store.authorize(username, password)
    }

    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool> {
        self.store.verify_password(id, password)
    }
}
