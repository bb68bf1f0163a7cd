use chrono::Utc;
use tempfile::TempDir;

use squad_ledger::domain::{FineEvent, FineRecord, FineType};
use squad_ledger::ledger::FineLedger;

fn fine(player: &str, amount: u32) -> FineRecord {
    let event = FineEvent {
        id: "E1".to_string(),
        name: "Tuesday training".to_string(),
        date: Utc::now(),
    };
    FineRecord::new(FineType::MissingEvent, amount, player, player, &event, Utc::now())
}

#[test]
fn second_insert_under_same_key_is_ignored() {
    let dir = TempDir::new().unwrap();
    let ledger = FineLedger::new(dir.path().join("fines_data.json"));
    let first = fine("A", 50);

    assert!(ledger.add_if_absent("E1_A", first.clone()).unwrap());
    assert!(!ledger.add_if_absent("E1_A", first.clone()).unwrap());
    assert!(!ledger.add_if_absent("E1_A", fine("Someone else", 500)).unwrap());

    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records["E1_A"], first);
}

#[test]
fn summary_reflects_paid_and_unpaid_amounts() {
    let dir = TempDir::new().unwrap();
    let ledger = FineLedger::new(dir.path().join("fines_data.json"));
    ledger.add_if_absent("E1_A", fine("A", 50)).unwrap();
    ledger.add_if_absent("E1_B", fine("B", 100)).unwrap();
    assert!(ledger.mark_paid("E1_B").unwrap());

    let summary = ledger.summary();
    assert_eq!(summary.total_fines, 2);
    assert_eq!(summary.total_amount, 150);
    assert_eq!(summary.paid_fines, 1);
    assert_eq!(summary.unpaid_amount, 50);

    let b = &summary.player_totals["B"];
    assert_eq!(b.paid_amount, 100);
    assert_eq!(b.unpaid_amount, 0);
}

#[test]
fn payment_toggles_persist_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fines_data.json");
    FineLedger::new(&path).add_if_absent("E1_A", fine("A", 50)).unwrap();

    let ledger = FineLedger::new(&path);
    assert!(ledger.mark_paid("E1_A").unwrap());
    let paid = FineLedger::new(&path).get("E1_A").unwrap();
    assert!(paid.paid);
    assert!(paid.paid_date.is_some());

    assert!(ledger.set_unpaid("E1_A").unwrap());
    let unpaid = FineLedger::new(&path).get("E1_A").unwrap();
    assert!(!unpaid.paid);
    assert!(unpaid.paid_date.is_none());

    assert!(ledger.remove("E1_A").unwrap());
    assert!(ledger.records().is_empty());
}

#[test]
fn corrupt_file_starts_clean() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fines_data.json");
    std::fs::write(&path, "not json at all").unwrap();

    let ledger = FineLedger::new(&path);
    assert!(ledger.records().is_empty());
    assert_eq!(ledger.summary().total_fines, 0);

    assert!(ledger.add_if_absent("E1_A", fine("A", 50)).unwrap());
    assert_eq!(ledger.records().len(), 1);
}

#[test]
fn reads_records_written_by_earlier_versions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fines_data.json");
    std::fs::write(
        &path,
        r#"{
            "E7_P1": {
                "player_id": "P1",
                "player_name": "Anna Holm",
                "event_id": "E7",
                "event_name": "Kamp mod B93",
                "event_date": "2025-03-01T18:00:00Z",
                "fine_type": "missing_event",
                "fine_amount": 100,
                "paid": false,
                "created_date": "2025-03-02T09:00:00Z"
            }
        }"#,
    )
    .unwrap();

    let ledger = FineLedger::new(&path);
    let processed = ledger.by_player_processed();
    assert_eq!(processed["Anna Holm"].no_show_count, 1);
    assert_eq!(processed["Anna Holm"].unpaid_amount, 100);
}
