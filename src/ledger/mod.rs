//! Fine Ledger: fine records keyed by event and player, persisted as one JSON map.
//!
//! Every mutation re-reads the file, applies the change and writes it back
//! whole. Summaries are always derived from the stored records.

mod catalog;
mod summary;

pub use catalog::FineTypeCatalog;
pub use summary::{FineDetail, LedgerSummary, PlayerFines, PlayerTotals};

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use crate::domain::FineRecord;
use crate::storage::JsonFile;

pub type FineMap = BTreeMap<String, FineRecord>;

pub struct FineLedger {
    file: JsonFile<FineMap>,
}

impl FineLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn records(&self) -> FineMap {
        self.file.load()
    }

    pub fn get(&self, key: &str) -> Option<FineRecord> {
        self.records().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records().contains_key(key)
    }

    pub fn player_fines(&self, player_id: &str) -> Vec<(String, FineRecord)> {
        self.records()
            .into_iter()
            .filter(|(_, record)| record.player_id == player_id)
            .collect()
    }

    /// Existing records are never overwritten.
    pub fn add_if_absent(&self, key: &str, record: FineRecord) -> Result<bool> {
        let (_, added) = self.file.modify(|fines| {
            if fines.contains_key(key) {
                return (false, false);
            }
            fines.insert(key.to_string(), record);
            (true, true)
        })?;

        if added {
            debug!("Added fine {key}");
        }
        Ok(added)
    }

    /// Insert a whole batch with a single write; returns how many were new.
    pub fn add_all_if_absent<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = (String, FineRecord)>,
    {
        let added = self.insert_missing(records)?;
        Ok(added.len())
    }

    /// Like `add_all_if_absent`, but returns the keys that were actually inserted.
    pub fn insert_missing<I>(&self, records: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (String, FineRecord)>,
    {
        let (_, added) = self.file.modify(|fines| {
            let mut added = Vec::new();
            for (key, record) in records {
                if let Entry::Vacant(slot) = fines.entry(key.clone()) {
                    slot.insert(record);
                    added.push(key);
                }
            }
            let changed = !added.is_empty();
            (added, changed)
        })?;

        info!("Added {} new fines", added.len());
        Ok(added)
    }

    /// Remove a batch of keys with a single write; returns how many existed.
    pub fn remove_all(&self, keys: &[String]) -> Result<usize> {
        let (_, removed) = self.file.modify(|fines| {
            let removed = keys.iter().filter(|key| fines.remove(key.as_str()).is_some()).count();
            (removed, removed > 0)
        })?;

        if removed > 0 {
            info!("Removed {removed} fines");
        }
        Ok(removed)
    }

    pub fn mark_paid(&self, key: &str) -> Result<bool> {
        self.update(key, |record| record.mark_paid(Utc::now()))
    }

    pub fn set_unpaid(&self, key: &str) -> Result<bool> {
        self.update(key, FineRecord::mark_unpaid)
    }

    pub fn set_amount(&self, key: &str, amount: u32) -> Result<bool> {
        self.update(key, |record| record.fine_amount = amount)
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let (_, removed) = self.file.modify(|fines| {
            let removed = fines.remove(key).is_some();
            (removed, removed)
        })?;

        if removed {
            info!("Removed fine {key}");
        }
        Ok(removed)
    }

    /// Mark every unpaid fine paid, optionally for one player name only.
    pub fn mark_all_paid(&self, player_name: Option<&str>) -> Result<usize> {
        let now = Utc::now();
        self.update_where(player_name, |record| {
            if record.paid {
                return false;
            }
            record.mark_paid(now);
            true
        })
    }

    pub fn mark_all_unpaid(&self, player_name: Option<&str>) -> Result<usize> {
        self.update_where(player_name, |record| {
            if !record.paid {
                return false;
            }
            record.mark_unpaid();
            true
        })
    }

    pub fn summary(&self) -> LedgerSummary {
        summary::summarize(self.records().values())
    }

    pub fn by_player_processed(&self) -> BTreeMap<String, PlayerFines> {
        summary::group_by_player(&self.records())
    }

    // --- Helper Methods ---

    fn update<F>(&self, key: &str, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut FineRecord),
    {
        let (_, found) = self.file.modify(|fines| match fines.get_mut(key) {
            Some(record) => {
                apply(record);
                (true, true)
            }
            None => (false, false),
        })?;

        if !found {
            debug!("Fine {key} not found");
        }
        Ok(found)
    }

    fn update_where<F>(&self, player_name: Option<&str>, mut apply: F) -> Result<usize>
    where
        F: FnMut(&mut FineRecord) -> bool,
    {
        let (_, changed) = self.file.modify(|fines| {
            let changed = fines
                .values_mut()
                .filter(|record| player_name.is_none_or(|name| record.player_name == name))
                .map(|record| apply(record))
                .filter(|changed| *changed)
                .count();
            (changed, changed > 0)
        })?;

        info!("Updated payment status of {changed} fines");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FineEvent, FineType};
    use tempfile::TempDir;

    fn record(player: &str, amount: u32, fine_type: FineType) -> FineRecord {
        let event = FineEvent {
            id: "E1".into(),
            name: "Training".into(),
            date: Utc::now(),
        };
        FineRecord::new(fine_type, amount, player, player, &event, Utc::now())
    }

    #[test]
    fn add_if_absent_keeps_first_value() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));

        assert!(ledger.add_if_absent("E1_A", record("A", 50, FineType::MissingEvent)).unwrap());
        assert!(!ledger.add_if_absent("E1_A", record("A", 999, FineType::MissingEvent)).unwrap());

        let records = ledger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records["E1_A"].fine_amount, 50);
    }

    #[test]
    fn mutations_on_unknown_keys_report_not_found() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));

        assert!(!ledger.mark_paid("missing").unwrap());
        assert!(!ledger.set_unpaid("missing").unwrap());
        assert!(!ledger.set_amount("missing", 10).unwrap());
        assert!(!ledger.remove("missing").unwrap());
    }

    #[test]
    fn bulk_payment_can_target_one_player() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));
        ledger
            .add_all_if_absent([
                ("E1_A".to_string(), record("A", 50, FineType::MissingEvent)),
                ("E2_A".to_string(), record("A", 25, FineType::NoResponse24h)),
                ("E1_B".to_string(), record("B", 100, FineType::MissingEvent)),
            ])
            .unwrap();

        assert_eq!(ledger.mark_all_paid(Some("A")).unwrap(), 2);
        assert_eq!(ledger.mark_all_paid(Some("A")).unwrap(), 0);
        assert!(!ledger.get("E1_B").unwrap().paid);

        assert_eq!(ledger.mark_all_unpaid(None).unwrap(), 2);
        assert_eq!(ledger.summary().paid_fines, 0);
    }

    #[test]
    fn processed_view_counts_each_fine_type() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));
        ledger
            .add_all_if_absent([
                ("E1_A".to_string(), record("A", 50, FineType::MissingEvent)),
                ("E2_A".to_string(), record("A", 25, FineType::NoResponse24h)),
                ("E3_A".to_string(), record("A", 25, FineType::TrainingLoss)),
                ("E4_A".to_string(), record("A", 75, FineType::Manual)),
            ])
            .unwrap();
        ledger.mark_paid("E1_A").unwrap();

        let players = ledger.by_player_processed();
        let a = &players["A"];
        assert_eq!(a.total_fine, 175);
        assert_eq!(a.unpaid_amount, 125);
        assert_eq!(a.no_show_count, 1);
        assert_eq!(a.late_response_count, 1);
        assert_eq!(a.training_loss_count, 1);
        assert_eq!(a.manual_count, 1);
        assert_eq!(a.events.len(), 4);
    }

    #[test]
    fn amount_edits_flow_into_summary() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));
        ledger.add_if_absent("E1_A", record("A", 50, FineType::MissingEvent)).unwrap();

        assert!(ledger.set_amount("E1_A", 80).unwrap());
        let summary = ledger.summary();
        assert_eq!(summary.total_amount, 80);
        assert_eq!(summary.player_totals["A"].unpaid_amount, 80);
        assert_eq!(ledger.player_fines("A").len(), 1);
    }

    #[test]
    fn batch_removal_only_touches_inserted_keys() {
        let dir = TempDir::new().unwrap();
        let ledger = FineLedger::new(dir.path().join("fines.json"));
        ledger.add_if_absent("E1_A", record("A", 50, FineType::MissingEvent)).unwrap();

        let added = ledger
            .insert_missing([
                ("E1_A".to_string(), record("A", 99, FineType::MissingEvent)),
                ("E1_B".to_string(), record("B", 50, FineType::MissingEvent)),
            ])
            .unwrap();
        assert_eq!(added, vec!["E1_B".to_string()]);

        assert_eq!(ledger.remove_all(&added).unwrap(), 1);
        assert_eq!(ledger.remove_all(&added).unwrap(), 0);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.get("E1_A").unwrap().fine_amount, 50);
    }
}
