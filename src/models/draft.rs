use crate::models::expense::{ExpenseCategory, ExpenseId, ExpenseRecord, ExpenseResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Uncommitted form state shared by the create and edit flows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub id: Option<ExpenseId>,
    pub name: String,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub date: DateTime<Utc>,
    pub amount: Option<f64>,
    pub created_by: String,
}

impl ExpenseDraft {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            category: None,
            date: now,
            amount: None,
            created_by: String::new(),
        }
    }

    pub fn for_new_expense(id: ExpenseId, created_by: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            created_by: created_by.to_string(),
            ..Self::empty(now)
        }
    }

    pub fn from_record(record: &ExpenseRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category,
            date: record.date,
            amount: record.amount,
            created_by: record.created_by.clone(),
        }
    }

    /// Merges a single field into the draft, leaving every other field as it was.
    pub fn apply(&mut self, update: DraftFieldUpdate) {
        match update {
            DraftFieldUpdate::Name(name) => self.name = name,
            DraftFieldUpdate::Description(description) => self.description = description,
            DraftFieldUpdate::Category(category) => self.category = category,
            DraftFieldUpdate::Date(date) => self.date = date,
            DraftFieldUpdate::Amount(amount) => self.amount = amount,
        }
    }

    pub fn into_record(self, id: ExpenseId, updated_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            date: self.date,
            amount: self.amount,
            created_by: self.created_by,
            updated_at,
        }
    }
}

/// An edit to one form field. `id` and `created_by` are deliberately absent.
#[derive(Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftFieldUpdate {
    Name(String),
    Description(String),
    Category(Option<ExpenseCategory>),
    Date(DateTime<Utc>),
    Amount(Option<f64>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DraftMode {
    Create,
    Edit,
}

impl DraftMode {
    pub fn title(&self) -> &'static str {
        match self {
            DraftMode::Create => "Create Expense",
            DraftMode::Edit => "Edit Expense",
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct DraftResponse {
    pub mode: DraftMode,
    pub title: String,
    pub id: Option<ExpenseId>,
    pub name: String,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub date: DateTime<Utc>,
    pub amount: Option<f64>,
    pub created_by: String,
}

impl DraftResponse {
    pub fn new(mode: DraftMode, draft: &ExpenseDraft) -> Self {
        Self {
            mode,
            title: mode.title().to_string(),
            id: draft.id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            category: draft.category,
            date: draft.date,
            amount: draft.amount,
            created_by: draft.created_by.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Created,
    Updated,
    /// The edited record was deleted before the save; nothing was written.
    TargetMissing,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SaveResponse {
    pub status: SaveStatus,
    pub expense_id: ExpenseId,
    pub expense: Option<ExpenseResponse>,
}
