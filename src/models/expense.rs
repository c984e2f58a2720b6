use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Milliseconds since the Unix epoch at the moment the record was created.
pub type ExpenseId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash, JsonSchema)]
pub enum ExpenseCategory {
    Health,
    Electronics,
    Travel,
    Education,
    Books,
    Others,
}

impl ExpenseCategory {
    /// Selectable categories, in the order the form offers them.
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Health,
        ExpenseCategory::Electronics,
        ExpenseCategory::Travel,
        ExpenseCategory::Education,
        ExpenseCategory::Books,
        ExpenseCategory::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Electronics => "Electronics",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Books => "Books",
            ExpenseCategory::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub name: String,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    /// Date of the expense.
    pub date: DateTime<Utc>,
    /// As entered, sign and scale unchecked; `None` when the field was left empty.
    pub amount: Option<f64>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    pub name: String,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub date: DateTime<Utc>,
    pub amount: Option<f64>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&ExpenseRecord> for ExpenseResponse {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category,
            date: record.date,
            amount: record.amount,
            created_by: record.created_by.clone(),
            updated_at: record.updated_at,
        }
    }
}

/// One line of the expense table, already localised to the display timezone.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ExpenseRowResponse {
    pub id: ExpenseId,
    pub name: String,
    pub category: Option<ExpenseCategory>,
    pub date: NaiveDate,
    pub amount: Option<f64>,
    pub updated_at: NaiveDateTime,
    /// "Me" for records created under the current session identity.
    pub created_by: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ExpenseListResponse {
    pub rows: Vec<ExpenseRowResponse>,
    pub total: usize,
    pub search_query: String,
    pub filter_date: Option<NaiveDate>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct CategoryResponse {
    pub value: ExpenseCategory,
    pub label: String,
}

impl From<ExpenseCategory> for CategoryResponse {
    fn from(category: ExpenseCategory) -> Self {
        Self {
            value: category,
            label: category.label().to_string(),
        }
    }
}

/// Result of a delete confirmation.
#[derive(Serialize, Debug, JsonSchema)]
pub struct DeleteResponse {
    /// The record that was removed, if the remembered id still existed.
    pub deleted: Option<ExpenseResponse>,
}
