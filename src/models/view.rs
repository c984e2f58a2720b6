use crate::models::draft::DraftResponse;
use crate::models::expense::ExpenseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct FilterRequest {
    #[serde(default)]
    pub search_query: String,
    /// Calendar day to restrict the list to; `null` shows every day.
    #[serde(default)]
    pub filter_date: Option<NaiveDate>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct FilterResponse {
    pub search_query: String,
    pub filter_date: Option<NaiveDate>,
}

/// Everything the expense screen needs to redraw itself.
#[derive(Serialize, Debug, JsonSchema)]
pub struct ViewStateResponse {
    pub current_user: String,
    pub search_query: String,
    pub filter_date: Option<NaiveDate>,
    pub is_modal_open: bool,
    pub is_editing: bool,
    pub draft: Option<DraftResponse>,
    pub is_delete_confirmation_open: bool,
    pub delete_expense_id: Option<ExpenseId>,
}
