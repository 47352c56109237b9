//! User repository contract and JSON-file implementation.

use crate::model::account::{Contact, Credentials, User};
use crate::model::RecordId;
use crate::repo::keyed_store::KeyedStore;
use crate::repo::RepoResult;
use crate::storage::StorageResult;
use std::path::PathBuf;

/// Repository interface for user accounts.
pub trait UserRepository {
    fn create_user(&self, credentials: Credentials, contact: Contact) -> RepoResult<User>;
    fn get_user(&self, id: RecordId) -> Option<User>;
    fn find_user_by_username(&self, username: &str) -> Option<User>;
    fn list_users(&self) -> Vec<User>;
    fn update_user(&self, id: RecordId, user: User) -> RepoResult<User>;
    fn update_username(&self, id: RecordId, username: &str) -> RepoResult<User>;
    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<User>;
    fn update_name(&self, id: RecordId, first_name: &str, last_name: &str) -> RepoResult<User>;
    fn update_ssn(&self, id: RecordId, ssn: &str) -> RepoResult<User>;
    fn delete_user(&self, id: RecordId) -> RepoResult<bool>;
    fn authorize(&self, username: &str, password: &str) -> bool;
    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool>;
}

/// User store persisted to one JSON array file.
pub struct FileUserRepository {
    store: KeyedStore<User>,
}

impl FileUserRepository {
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self {
            store: KeyedStore::open("user", path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl UserRepository for FileUserRepository {
    fn create_user(&self, credentials: Credentials, contact: Contact) -> RepoResult<User> {
        self.store.create_with(|id| User {
            id,
            credentials,
            contact,
        })
    }

    fn get_user(&self, id: RecordId) -> Option<User> {
        self.store.get(id)
    }

    fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.store.find_by_username(username)
    }

    fn list_users(&self) -> Vec<User> {
        self.store.list()
    }

    fn update_user(&self, id: RecordId, user: User) -> RepoResult<User> {
        self.store.replace(id, user)
    }

    fn update_username(&self, id: RecordId, username: &str) -> RepoResult<User> {
        self.store.update_username(id, username)
    }

    fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<User> {
        self.store.update_password(id, current, new)
    }

    fn update_name(&self, id: RecordId, first_name: &str, last_name: &str) -> RepoResult<User> {
        self.store.modify(id, |user| {
            user.contact.first_name = first_name.to_string();
            user.contact.last_name = last_name.to_string();
            Ok(())
        })
    }

    fn update_ssn(&self, id: RecordId, ssn: &str) -> RepoResult<User> {
        self.store.modify(id, |user| {
            user.contact.ssn = ssn.to_string();
            Ok(())
        })
    }

    fn delete_user(&self, id: RecordId) -> RepoResult<bool> {
        self.store.delete(id)
    }

    fn authorize(&self, username: &str, password: &str) -> bool {
        self.store.authorize(username, password)
    }

    fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool> {
        self.store.verify_password(id, password)
    }
}
