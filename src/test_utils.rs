use crate::database::key_value::MemoryStore;
use crate::models::expense::{ExpenseCategory, ExpenseRecord};
use crate::service::expense_manager::{ExpenseManager, sample_expenses};
use crate::service::session::SessionIdentity;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FIXTURE_ID: AtomicU64 = AtomicU64::new(1_000);

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).single().expect("valid fixture timestamp")
}

pub fn record_on(name: &str, date: DateTime<Utc>) -> ExpenseRecord {
    ExpenseRecord {
        id: NEXT_FIXTURE_ID.fetch_add(1, Ordering::Relaxed),
        name: name.to_string(),
        date,
        updated_at: date,
        ..ExpenseRecord::default()
    }
}

pub fn sample_record() -> ExpenseRecord {
    ExpenseRecord {
        description: "Train to Pune".to_string(),
        category: Some(ExpenseCategory::Travel),
        amount: Some(450.0),
        created_by: "user1@example.com".to_string(),
        ..record_on("Rail pass", at(2026, 10, 16, 9))
    }
}

pub fn seeded_manager(now: DateTime<Utc>) -> ExpenseManager {
    seeded_manager_as("", now)
}

/// A manager holding the two sample records, with `identity` as the current user.
pub fn seeded_manager_as(identity: &str, now: DateTime<Utc>) -> ExpenseManager {
    let mut session = SessionIdentity::load(Box::new(MemoryStore::default())).expect("memory store never fails");
    session.set(identity).expect("memory store never fails");
    ExpenseManager::new(session, Tz::UTC, sample_expenses(now))
}
