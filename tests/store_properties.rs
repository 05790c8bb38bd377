//! Property tests for the observation store.
//!
//! Random insert sequences (duplicate timestamps included) checked against a
//! plain in-memory model of the table:
//! 1. Latest-all returns exactly one row per name, the newest by (time, id)
//! 2. The total count equals the sum of the per-name counts
//! 3. History is strictly newest first, ties by id, and capped at the limit

use chrono::{Duration, NaiveDate, NaiveDateTime};
use index_monitor::db::sqlite::{format_timestamp, SqliteDb};
use index_monitor::error::AppError;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const NAMES: [(&str, &str); 4] = [
    ("KOSPI", "^KS11"),
    ("KOSDAQ", "^KQ11"),
    ("KOSPI200", "^KS200"),
    ("NIKKEI", "^N225"),
];

/// One inserted row as the model sees it
#[derive(Debug, Clone)]
struct Row {
    id: i64,
    name: &'static str,
    price: f64,
    collected_at: String,
}

// ── Strategies ───────────────────────────────────────────────────────

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// (name index, price, seconds after the base time)
///
/// The offset range is narrow so equal timestamps come up often.
fn arb_insert() -> impl Strategy<Value = (usize, f64, i64)> {
    (0..NAMES.len(), 0.0..5000.0_f64, 0..20_i64)
}

fn arb_inserts() -> impl Strategy<Value = Vec<(usize, f64, i64)>> {
    prop::collection::vec(arb_insert(), 0..80)
}

fn populate(inserts: &[(usize, f64, i64)]) -> (SqliteDb, Vec<Row>) {
    let db = SqliteDb::open_in_memory().unwrap();
    let mut rows = Vec::with_capacity(inserts.len());

    for &(idx, price, offset) in inserts {
        let (name, ticker) = NAMES[idx];
        let at = base_time() + Duration::seconds(offset);
        let id = db.insert_observation(name, ticker, price, &at).unwrap();
        rows.push(Row {
            id,
            name,
            price,
            collected_at: format_timestamp(&at),
        });
    }

    (db, rows)
}

/// Model rows for one name, newest first
fn model_history(rows: &[Row], name: &str) -> Vec<Row> {
    let mut matching: Vec<Row> = rows.iter().filter(|r| r.name == name).cloned().collect();
    matching.sort_by(|a, b| {
        b.collected_at
            .cmp(&a.collected_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    matching
}

// ── 1. Latest-all ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn latest_all_is_newest_row_per_name(inserts in arb_inserts()) {
        let (db, rows) = populate(&inserts);
        let latest = db.latest_all().unwrap();

        let expected_names: BTreeSet<&str> = rows.iter().map(|r| r.name).collect();
        let names: Vec<&str> = latest.iter().map(|o| o.name.as_str()).collect();
        prop_assert_eq!(names, expected_names.iter().copied().collect::<Vec<_>>());

        for obs in &latest {
            let newest = &model_history(&rows, &obs.name)[0];
            prop_assert_eq!(obs.id, newest.id);
            prop_assert_eq!(&obs.collected_at, &newest.collected_at);
            prop_assert_eq!(obs.price, newest.price);
        }
    }
}

// ── 2. Counts ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn total_equals_sum_of_per_name_counts(inserts in arb_inserts()) {
        let (db, rows) = populate(&inserts);

        let total = db.count_total().unwrap();
        let by_name = db.count_by_name().unwrap();
        prop_assert_eq!(total, by_name.values().sum::<i64>());
        prop_assert_eq!(total, rows.len() as i64);

        let mut expected: BTreeMap<String, i64> = BTreeMap::new();
        for row in &rows {
            *expected.entry(row.name.to_string()).or_default() += 1;
        }
        prop_assert_eq!(&by_name, &expected);

        let stats = db.stats().unwrap();
        prop_assert_eq!(stats.total_records, total);
        prop_assert_eq!(stats.by_index, by_name);
    }
}

// ── 3. History ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn history_is_sorted_and_capped(
        inserts in arb_inserts(),
        name_idx in 0..NAMES.len(),
        limit in 1..120_usize,
    ) {
        let (db, rows) = populate(&inserts);
        let name = NAMES[name_idx].0;
        let expected = model_history(&rows, name);

        match db.history(name, limit) {
            Ok(history) => {
                prop_assert!(!expected.is_empty());
                prop_assert!(history.len() <= limit);
                prop_assert_eq!(history.len(), expected.len().min(limit));

                for pair in history.windows(2) {
                    let newer = (&pair[0].collected_at, pair[0].id);
                    let older = (&pair[1].collected_at, pair[1].id);
                    prop_assert!(newer > older);
                }

                let ids: Vec<i64> = history.iter().map(|o| o.id).collect();
                let expected_ids: Vec<i64> = expected.iter().take(limit).map(|r| r.id).collect();
                prop_assert_eq!(ids, expected_ids);
                prop_assert!(history.iter().all(|o| o.name == name));
            }
            Err(AppError::NotFound(_)) => prop_assert!(expected.is_empty()),
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn history_never_exceeds_default_limit(offsets in prop::collection::vec(0..5_i64, 100..160)) {
        let inserts: Vec<(usize, f64, i64)> =
            offsets.iter().map(|&offset| (0, 2500.0, offset)).collect();
        let (db, _) = populate(&inserts);

        let history = db.history("KOSPI", 100).unwrap();
        prop_assert_eq!(history.len(), 100);
    }
}
