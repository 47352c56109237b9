//! Generic single-index record store backed by one JSON file.
//!
//! # Responsibility
//! - Keep an id-ordered in-memory map for one record type.
//! - Allocate ids from a per-store counter seeded from file contents.
//! - Persist the full map after every mutation.
//!
//! # Invariants
//! - The counter starts at `max(id) + 1`, or `0` for an empty file, and
//!   only ever grows; deleted or failed-create ids are never handed out
//!   again by this instance.
//! - All reads and writes hold the store lock for their whole duration.
//! - A failed persist rolls the in-memory map back before returning.

use crate::model::account::Account;
use crate::model::{Record, RecordId};
use crate::repo::{RepoError, RepoResult};
use crate::storage::{read_json_or_default, write_json_atomic, StorageError, StorageResult};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File-backed, mutex-guarded map from id to record.
pub struct KeyedStore<T> {
    label: &'static str,
    path: PathBuf,
    state: Mutex<KeyedState<T>>,
}

struct KeyedState<T> {
    records: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

/// Inverse of a single map mutation, applied when persisting fails.
enum Undo<T> {
    Remove(RecordId),
    Restore(T),
}

impl<T: Record> Undo<T> {
    fn apply(self, records: &mut BTreeMap<RecordId, T>) {
        match self {
            Self::Remove(id) => {
                records.remove(&id);
            }
            Self::Restore(record) => {
                records.insert(record.id(), record);
            }
        }
    }
}

impl<T: Record> KeyedState<T> {
    fn from_records(path: &Path, loaded: Vec<T>) -> StorageResult<Self> {
        let mut records = BTreeMap::new();
        for record in loaded {
            let id = record.id();
            record.validate().map_err(|err| StorageError::InvalidData {
                path: path.to_path_buf(),
                message: format!("record {id}: {err}"),
            })?;
            if records.insert(id, record).is_some() {
                return Err(StorageError::InvalidData {
                    path: path.to_path_buf(),
                    message: format!("duplicate id {id}"),
                });
            }
        }

        let next_id = match records.keys().next_back() {
            Some(max) => max.checked_add(1).ok_or_else(|| StorageError::InvalidData {
                path: path.to_path_buf(),
                message: "id space exhausted".to_string(),
            })?,
            None => 0,
        };

        Ok(Self { records, next_id })
    }
}

impl<T: Record> KeyedStore<T> {
    /// Loads the store from `path`.
    ///
    /// `label` names the record kind in errors and log lines.
    ///
    /// # Errors
    /// - Storage errors for unreadable or malformed files.
    /// - `StorageError::InvalidData` for duplicate ids or records that fail
    ///   validation.
    pub fn open(label: &'static str, path: impl Into<PathBuf>) -> StorageResult<Self> {
        let started_at = Instant::now();
        let path = path.into();
        let loaded: Vec<T> = read_json_or_default(&path)?;
        let state = KeyedState::from_records(&path, loaded)?;

        info!(
            "event=store_load module=repo status=ok store={} records={} next_id={} duration_ms={}",
            label,
            state.records.len(),
            state.next_id,
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            label,
            path,
            state: Mutex::new(state),
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next successful create will receive.
    pub fn next_id(&self) -> RecordId {
        self.state.lock().next_id
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Allocates an id, builds the record with it and persists.
    pub fn create_with<F>(&self, build: F) -> RepoResult<T>
    where
        F: FnOnce(RecordId) -> T,
    {
        let mut state = self.state.lock();
        let id = state.next_id;
        let following = id
            .checked_add(1)
            .ok_or_else(|| RepoError::Conflict(format!("{} id space exhausted", self.label)))?;

        let mut record = build(id);
        record.set_id(id);
        record.validate()?;

        state.next_id = following;
        state.records.insert(id, record.clone());
        self.persist(&mut state, Undo::Remove(id))?;
        Ok(record)
    }

    pub fn get(&self, id: RecordId) -> Option<T> {
        self.state.lock().records.get(&id).cloned()
    }

    /// All records in ascending id order.
    pub fn list(&self) -> Vec<T> {
        self.state.lock().records.values().cloned().collect()
    }

    /// First record, by ascending id, matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.state
            .lock()
            .records
            .values()
            .find(|record| predicate(record))
            .cloned()
    }

    /// Replaces the record stored under `id`. The id inside `value` is
    /// ignored.
    pub fn replace(&self, id: RecordId, value: T) -> RepoResult<T> {
        self.modify(id, move |current| {
            *current = value;
            Ok(())
        })
    }

    /// Applies `apply` to a copy of the stored record and persists it.
    ///
    /// An error from `apply` aborts the update with nothing changed.
    pub fn modify<F>(&self, id: RecordId, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut T) -> RepoResult<()>,
    {
        let mut state = self.state.lock();
        let Some(previous) = state.records.get(&id).cloned() else {
            return Err(self.not_found(id));
        };

        let mut updated = previous.clone();
        apply(&mut updated)?;
        updated.set_id(id);
        updated.validate()?;

        state.records.insert(id, updated.clone());
        self.persist(&mut state, Undo::Restore(previous))?;
        Ok(updated)
    }

    /// Returns whether `id` existed.
    pub fn delete(&self, id: RecordId) -> RepoResult<bool> {
        Ok(self.take(id)?.is_some())
    }

    /// Removes and returns the record stored under `id`.
    pub fn take(&self, id: RecordId) -> RepoResult<Option<T>> {
        let mut state = self.state.lock();
        let Some(removed) = state.records.remove(&id) else {
            return Ok(None);
        };
        self.persist(&mut state, Undo::Restore(removed.clone()))?;
        Ok(Some(removed))
    }

    /// Puts a previously taken record back under its own id.
    pub(crate) fn restore(&self, record: T) -> RepoResult<()> {
        let mut state = self.state.lock();
        let id = record.id();
        if state.records.contains_key(&id) {
            return Err(RepoError::Conflict(format!(
                "{} {id} already present",
                self.label
            )));
        }
        if id >= state.next_id {
            state.next_id = id.saturating_add(1);
        }
        state.records.insert(id, record);
        self.persist(&mut state, Undo::Remove(id))
    }

    fn persist(&self, state: &mut KeyedState<T>, undo: Undo<T>) -> RepoResult<()> {
        let written = write_json_atomic(&self.path, &state.records.values().collect::<Vec<_>>());
        match written {
            Ok(()) => Ok(()),
            Err(err) => {
                undo.apply(&mut state.records);
                warn!(
                    "event=store_rollback module=repo status=ok store={} error={}",
                    self.label, err
                );
                Err(err.into())
            }
        }
    }

    fn not_found(&self, id: RecordId) -> RepoError {
        RepoError::NotFound {
            entity: self.label,
            id,
        }
    }
}

/// Credential operations shared by every account store.
impl<T: Account> KeyedStore<T> {
    pub fn find_by_username(&self, username: &str) -> Option<T> {
        self.find(|record| record.credentials().username == username)
    }

    /// Checks a login pair against the first account with `username`.
    pub fn authorize(&self, username: &str, password: &str) -> bool {
        self.find_by_username(username)
            .is_some_and(|record| record.credentials().password_matches(password))
    }

    pub fn verify_password(&self, id: RecordId, password: &str) -> RepoResult<bool> {
        self.get(id)
            .map(|record| record.credentials().password_matches(password))
            .ok_or_else(|| self.not_found(id))
    }

    /// Sets a new password after confirming the current one.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Conflict` when `current` does not match; nothing is written.
    pub fn update_password(&self, id: RecordId, current: &str, new: &str) -> RepoResult<T> {
        let label = self.label;
        self.modify(id, |record| {
            if !record.credentials().password_matches(current) {
                return Err(RepoError::Conflict(format!(
                    "{label} {id}: current password does not match"
                )));
            }
            record.credentials_mut().password = new.to_string();
            Ok(())
        })
    }

    pub fn update_username(&self, id: RecordId, username: &str) -> RepoResult<T> {
        self.modify(id, |record| {
            record.credentials_mut().username = username.to_string();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::KeyedStore;
    use crate::model::account::{Contact, Credentials, User};
    use crate::model::validation::ValidationError;
    use crate::repo::{ErrorKind, RepoError};
    use std::collections::BTreeSet;
    use std::path::Path;

    fn user(username: &str) -> User {
        User {
            id: 0,
            credentials: Credentials::new(username, "secret"),
            contact: Contact::default(),
        }
    }

    fn open(path: &Path) -> KeyedStore<User> {
        KeyedStore::open("user", path).unwrap()
    }

    #[test]
    fn empty_store_starts_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));
        assert_eq!(store.next_id(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn ids_increase_and_are_not_reused_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));

        let first = store.create_with(|_| user("a")).unwrap();
        let second = store.create_with(|_| user("b")).unwrap();
        assert!(second.id > first.id);

        assert!(store.delete(second.id).unwrap());
        let third = store.create_with(|_| user("c")).unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn reopen_restores_records_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = open(&path);
        for name in ["a", "b", "c"] {
            store.create_with(|_| user(name)).unwrap();
        }
        store.delete(0).unwrap();

        let reopened = open(&path);
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.next_id(), 3);
    }

    #[test]
    fn counter_follows_file_contents_not_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = open(&path);
        for name in ["a", "b", "c"] {
            store.create_with(|_| user(name)).unwrap();
        }
        store.delete(2).unwrap();

        // Highest id was deleted before restart, so it is handed out again.
        assert_eq!(open(&path).next_id(), 2);
    }

    #[test]
    fn duplicate_ids_on_disk_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut a = user("a");
        a.id = 4;
        let mut b = user("b");
        b.id = 4;
        std::fs::write(&path, serde_json::to_string(&vec![a, b]).unwrap()).unwrap();

        let err = KeyedStore::<User>::open("user", &path).err().unwrap();
        assert!(err.to_string().contains("duplicate id 4"));
    }

    #[test]
    fn replace_keeps_stored_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));
        let created = store.create_with(|_| user("a")).unwrap();

        let mut payload = user("renamed");
        payload.id = 99;
        let updated = store.replace(created.id, payload).unwrap();

        assert_eq!(updated.id, created.id);
        assert!(store.get(99).is_none());
        assert_eq!(store.get(created.id).unwrap().credentials.username, "renamed");
    }

    #[test]
    fn missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));

        let err = store.replace(5, user("a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!store.delete(5).unwrap());
        assert!(store.get(5).is_none());
    }

    #[test]
    fn invalid_record_is_rejected_without_consuming_an_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));

        let err = store.create_with(|_| user("")).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::EmptyUsername)
        ));
        assert_eq!(store.next_id(), 0);
    }

    #[test]
    fn failed_persist_rolls_back_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = open(&path);
        let kept = store.create_with(|_| user("kept")).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.create_with(|_| user("lost")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(store.len(), 1);

        let err = store.replace(kept.id, user("changed")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(store.get(kept.id).unwrap(), kept);

        assert_eq!(store.delete(kept.id).unwrap_err().kind(), ErrorKind::Storage);
        assert!(store.get(kept.id).is_some());

        std::fs::remove_dir(&path).unwrap();
        let next = store.create_with(|_| user("next")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn concurrent_creates_allocate_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));

        let ids = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|worker| {
                    let store = &store;
                    scope.spawn(move || {
                        (0..5)
                            .map(|n| {
                                store
                                    .create_with(|_| user(&format!("w{worker}-{n}")))
                                    .unwrap()
                                    .id
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect::<BTreeSet<_>>()
        });

        assert_eq!(ids.len(), 40);
        assert_eq!(store.len(), 40);
        assert_eq!(open(store.path()).len(), 40);
    }

    #[test]
    fn password_gate_and_authorize() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir.path().join("users.json"));
        let created = store.create_with(|_| user("alice")).unwrap();

        let err = store
            .update_password(created.id, "wrong-old", "fresh")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(store.authorize("alice", "secret"));

        store.update_password(created.id, "secret", "fresh").unwrap();
        assert!(store.authorize("alice", "fresh"));
        assert!(!store.authorize("alice", "secret"));
        assert!(!store.authorize("nobody", "fresh"));
        assert!(store.verify_password(created.id, "fresh").unwrap());
    }
}
