//! Investment repository with three synchronized views.
//!
//! # Responsibility
//! - Keep investments keyed by id, grouped by investor and grouped by
//!   house, and persist each view to its own file.
//! - Route every mutation through one insert path and one removal path so
//!   the three views cannot drift apart.
//!
//! # Invariants
//! - Every id in the primary map appears exactly once in its investor's
//!   group and exactly once in its house's group, and every grouped entry
//!   exists in the primary map.
//! - Groups hold entries in ascending id order and empty groups are
//!   dropped.
//! - Removing an investment removes that single record from its groups,
//!   never the whole group.
//! - The primary file is authoritative at load; groups are rebuilt from it.

use crate::model::investment::Investment;
use crate::model::{Record, RecordId};
use crate::repo::{RepoError, RepoResult};
use crate::storage::{read_json_or_default, write_json_atomic, StorageError, StorageResult};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

type Grouping = BTreeMap<RecordId, Vec<Investment>>;

pub trait InvestmentRepository {
    fn create_investment(
        &self,
        investor_id: RecordId,
        house_id: RecordId,
        date: &str,
        amount: f64,
    ) -> RepoResult<Investment>;
    /// Removes exactly one investment. Returns whether `id` existed.
    fn remove_investment(&self, id: RecordId) -> RepoResult<bool>;
    fn get_investment(&self, id: RecordId) -> Option<Investment>;
    fn list_investments(&self) -> Vec<Investment>;
    /// Empty when the investor has no investments.
    fn list_by_investor(&self, investor_id: RecordId) -> Vec<Investment>;
    /// Empty when nothing finances the house.
    fn list_by_house(&self, house_id: RecordId) -> Vec<Investment>;
}

/// Paths of the primary file and both grouping files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentFiles {
    pub records: PathBuf,
    pub by_investor: PathBuf,
    pub by_house: PathBuf,
}

#[derive(Debug, Default)]
struct InvestmentIndex {
    by_id: BTreeMap<RecordId, Investment>,
    by_investor: Grouping,
    by_house: Grouping,
    next_id: RecordId,
}

enum IndexUndo {
    Remove(RecordId),
    Restore(Investment),
}

impl IndexUndo {
    fn apply(self, index: &mut InvestmentIndex) {
        match self {
            Self::Remove(id) => {
                index.remove(id);
            }
            Self::Restore(investment) => {
                index.insert(investment);
            }
        }
    }
}

impl InvestmentIndex {
    fn rebuild(records: Vec<Investment>) -> Result<Self, String> {
        let mut index = Self::default();
        for investment in records {
            let id = investment.id;
            investment
                .validate()
                .map_err(|err| format!("record {id}: {err}"))?;
            if !index.insert(investment) {
                return Err(format!("duplicate id {id}"));
            }
        }
        index.next_id = match index.by_id.keys().next_back() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| "id space exhausted".to_string())?,
            None => 0,
        };
        Ok(index)
    }

    /// Adds `investment` to all three views. Returns `false`, changing
    /// nothing, when the id is already present.
    fn insert(&mut self, investment: Investment) -> bool {
        if self.by_id.contains_key(&investment.id) {
            return false;
        }
        push_grouped(&mut self.by_investor, investment.investor_id, &investment);
        push_grouped(&mut self.by_house, investment.house_id, &investment);
        self.by_id.insert(investment.id, investment);
        true
    }

    /// Removes one investment from all three views.
    fn remove(&mut self, id: RecordId) -> Option<Investment> {
        let removed = self.by_id.remove(&id)?;
        remove_grouped(&mut self.by_investor, removed.investor_id, id);
        remove_grouped(&mut self.by_house, removed.house_id, id);
        Some(removed)
    }

    fn is_consistent(&self) -> bool {
        let grouped_once = |grouping: &Grouping, key: RecordId, id: RecordId| {
            grouping
                .get(&key)
                .map_or(0, |group| group.iter().filter(|entry| entry.id == id).count())
                == 1
        };
        let primary_covered = self.by_id.values().all(|investment| {
            grouped_once(&self.by_investor, investment.investor_id, investment.id)
                && grouped_once(&self.by_house, investment.house_id, investment.id)
        });

        let backed_by_primary = |grouping: &Grouping, key_of: fn(&Investment) -> RecordId| {
            grouping.iter().all(|(key, group)| {
                !group.is_empty()
                    && group.iter().all(|entry| {
                        key_of(entry) == *key && self.by_id.get(&entry.id) == Some(entry)
                    })
            })
        };

        primary_covered
            && backed_by_primary(&self.by_investor, |entry: &Investment| entry.investor_id)
            && backed_by_primary(&self.by_house, |entry: &Investment| entry.house_id)
    }
}

fn push_grouped(grouping: &mut Grouping, key: RecordId, investment: &Investment) {
    let group = grouping.entry(key).or_default();
    let position = group.partition_point(|entry| entry.id < investment.id);
    group.insert(position, investment.clone());
}

fn remove_grouped(grouping: &mut Grouping, key: RecordId, id: RecordId) {
    let Some(group) = grouping.get_mut(&key) else {
        return;
    };
    group.retain(|entry| entry.id != id);
    if group.is_empty() {
        grouping.remove(&key);
    }
}

/// Compares a persisted grouping with the one rebuilt from the primary file.
///
/// Only I/O failures are fatal; undecodable content counts as a mismatch.
fn check_grouping(path: &Path, grouping: &str, rebuilt: &Grouping) -> StorageResult<()> {
    let matches = match read_json_or_default::<Grouping>(path) {
        Ok(persisted) => persisted == *rebuilt,
        Err(StorageError::Json { .. }) => false,
        Err(err) => return Err(err),
    };
    if !matches {
        warn!(
            "event=investment_index_rebuild module=repo status=mismatch grouping={} path={}",
            grouping,
            path.display()
        );
    }
    Ok(())
}

/// Investment store persisted to three JSON files under one lock.
#[derive(Debug)]
pub struct FileInvestmentRepository {
    files: InvestmentFiles,
    index: Mutex<InvestmentIndex>,
}

impl FileInvestmentRepository {
    /// Loads the primary file and rebuilds both groupings from it.
    ///
    /// Grouping files that disagree with the rebuilt view, or no longer
    /// decode, are logged and replaced on the next successful write.
    pub fn open(files: &InvestmentFiles) -> StorageResult<Self> {
        let started_at = Instant::now();
        let records: Vec<Investment> = read_json_or_default(&files.records)?;
        let index =
            InvestmentIndex::rebuild(records).map_err(|message| StorageError::InvalidData {
                path: files.records.clone(),
                message,
            })?;

        check_grouping(&files.by_investor, "investor", &index.by_investor)?;
        check_grouping(&files.by_house, "house", &index.by_house)?;

        info!(
            "event=store_load module=repo status=ok store=investment records={} investors={} houses={} next_id={} duration_ms={}",
            index.by_id.len(),
            index.by_investor.len(),
            index.by_house.len(),
            index.next_id,
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            files: files.clone(),
            index: Mutex::new(index),
        })
    }

    pub fn len(&self) -> usize {
        self.index.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.lock().by_id.is_empty()
    }

    pub fn next_id(&self) -> RecordId {
        self.index.lock().next_id
    }

    /// Checks the three-view invariant on the in-memory state.
    pub fn is_consistent(&self) -> bool {
        self.index.lock().is_consistent()
    }

    fn persist(&self, index: &mut InvestmentIndex, undo: IndexUndo) -> RepoResult<()> {
        let Err(err) = self.write_all(index) else {
            return Ok(());
        };

        undo.apply(index);
        warn!(
            "event=store_rollback module=repo status=ok store=investment error={}",
            err
        );
        // Earlier files of the set may already hold the rolled-back state.
        if let Err(rewrite_err) = self.write_all(index) {
            error!(
                "event=store_rollback module=repo status=error store=investment error_code=rewrite_failed error={}",
                rewrite_err
            );
        }
        Err(err.into())
    }

    fn write_all(&self, index: &InvestmentIndex) -> StorageResult<()> {
        write_json_atomic(
            &self.files.records,
            &index.by_id.values().collect::<Vec<_>>(),
        )?;
        write_json_atomic(&self.files.by_investor, &index.by_investor)?;
        write_json_atomic(&self.files.by_house, &index.by_house)
    }
}

impl InvestmentRepository for FileInvestmentRepository {
    fn create_investment(
        &self,
        investor_id: RecordId,
        house_id: RecordId,
        date: &str,
        amount: f64,
    ) -> RepoResult<Investment> {
        let mut index = self.index.lock();
        let id = index.next_id;
        let following = id
            .checked_add(1)
            .ok_or_else(|| RepoError::Conflict("investment id space exhausted".to_string()))?;

        let investment = Investment {
            id,
            investor_id,
            house_id,
            date: date.to_string(),
            amount,
        };
        investment.validate()?;

        index.next_id = following;
        index.insert(investment.clone());
        self.persist(&mut index, IndexUndo::Remove(id))?;
        Ok(investment)
    }

    fn remove_investment(&self, id: RecordId) -> RepoResult<bool> {
        let mut index = self.index.lock();
        let Some(removed) = index.remove(id) else {
            return Ok(false);
        };
        self.persist(&mut index, IndexUndo::Restore(removed))?;
        Ok(true)
    }

    fn get_investment(&self, id: RecordId) -> Option<Investment> {
        self.index.lock().by_id.get(&id).cloned()
    }

    fn list_investments(&self) -> Vec<Investment> {
        self.index.lock().by_id.values().cloned().collect()
    }

    fn list_by_investor(&self, investor_id: RecordId) -> Vec<Investment> {
        self.index
            .lock()
            .by_investor
            .get(&investor_id)
            .cloned()
            .unwrap_or_default()
    }

    fn list_by_house(&self, house_id: RecordId) -> Vec<Investment> {
        self.index
            .lock()
            .by_house
            .get(&house_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::InvestmentIndex;
    use crate::model::investment::Investment;

    fn investment(id: u32, investor_id: u32, house_id: u32) -> Investment {
        Investment {
            id,
            investor_id,
            house_id,
            date: "2024-05-01".to_string(),
            amount: 1_000.0,
        }
    }

    #[test]
    fn rebuild_groups_by_investor_and_house() {
        let index = InvestmentIndex::rebuild(vec![
            investment(2, 10, 100),
            investment(0, 10, 101),
            investment(1, 11, 100),
        ])
        .unwrap();

        assert_eq!(index.next_id, 3);
        let investor_ids: Vec<_> = index.by_investor[&10].iter().map(|i| i.id).collect();
        assert_eq!(investor_ids, vec![0, 2]);
        let house_ids: Vec<_> = index.by_house[&100].iter().map(|i| i.id).collect();
        assert_eq!(house_ids, vec![1, 2]);
        assert!(index.is_consistent());
    }

    #[test]
    fn rebuild_rejects_duplicate_ids() {
        let err = InvestmentIndex::rebuild(vec![investment(3, 1, 1), investment(3, 2, 2)])
            .unwrap_err();
        assert_eq!(err, "duplicate id 3");
    }

    #[test]
    fn remove_drops_one_entry_and_empty_groups() {
        let mut index = InvestmentIndex::rebuild(vec![
            investment(0, 10, 100),
            investment(1, 10, 101),
        ])
        .unwrap();

        let removed = index.remove(0).unwrap();
        assert_eq!(removed.house_id, 100);
        assert_eq!(index.by_investor[&10].len(), 1);
        assert!(!index.by_house.contains_key(&100));
        assert!(index.remove(0).is_none());
        assert!(index.is_consistent());
    }

    #[test]
    fn consistency_check_detects_orphaned_group_entries() {
        let mut index = InvestmentIndex::rebuild(vec![investment(0, 10, 100)]).unwrap();
        index.by_id.remove(&0);
        assert!(!index.is_consistent());
    }
}
