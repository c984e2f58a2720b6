use crate::models::expense::ExpenseId;
use chrono::{DateTime, Utc};

/// Hands out time-based ids that never repeat, even when two expenses are created
/// within the same millisecond or the clock steps backwards.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: ExpenseId,
}

impl IdGenerator {
    pub fn starting_after(last: ExpenseId) -> Self {
        IdGenerator { last }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> ExpenseId {
        let millis = ExpenseId::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
