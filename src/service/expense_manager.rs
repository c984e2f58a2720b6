use crate::error::app_error::AppError;
use crate::models::draft::{DraftFieldUpdate, DraftMode, DraftResponse, ExpenseDraft};
use crate::models::expense::{ExpenseId, ExpenseRecord, ExpenseRowResponse};
use crate::models::view::ViewStateResponse;
use crate::service::id_generator::IdGenerator;
use crate::service::search::ExpenseFilter;
use crate::service::session::SessionIdentity;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

/// The create/edit modal. A draft only exists while the modal is open.
#[derive(Debug, Clone, PartialEq)]
pub enum Editor {
    Closed,
    Creating(ExpenseDraft),
    Editing { target: ExpenseId, draft: ExpenseDraft },
}

impl Editor {
    pub fn mode(&self) -> Option<DraftMode> {
        match self {
            Editor::Closed => None,
            Editor::Creating(_) => Some(DraftMode::Create),
            Editor::Editing { .. } => Some(DraftMode::Edit),
        }
    }

    pub fn draft(&self) -> Option<&ExpenseDraft> {
        match self {
            Editor::Closed => None,
            Editor::Creating(draft) | Editor::Editing { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut ExpenseDraft> {
        match self {
            Editor::Closed => None,
            Editor::Creating(draft) | Editor::Editing { draft, .. } => Some(draft),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Closed,
    Open { target: ExpenseId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(ExpenseRecord),
    Updated(ExpenseRecord),
    /// The record being edited was removed while the modal was open.
    TargetMissing(ExpenseId),
}

/// Owns the expense collection and everything the expense screen does to it.
///
/// Every operation takes `&mut self`, runs to completion and, where time matters,
/// receives `now` from the caller.
#[derive(Debug)]
pub struct ExpenseManager {
    expenses: Vec<ExpenseRecord>,
    filter: ExpenseFilter,
    editor: Editor,
    delete_confirmation: DeleteConfirmation,
    session: SessionIdentity,
    ids: IdGenerator,
}

impl ExpenseManager {
    pub fn new(session: SessionIdentity, timezone: Tz, expenses: Vec<ExpenseRecord>) -> Self {
        let last_id = expenses.iter().map(|e| e.id).max().unwrap_or(0);
        ExpenseManager {
            expenses,
            filter: ExpenseFilter::new(timezone),
            editor: Editor::Closed,
            delete_confirmation: DeleteConfirmation::Closed,
            session,
            ids: IdGenerator::starting_after(last_id),
        }
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn delete_confirmation(&self) -> DeleteConfirmation {
        self.delete_confirmation
    }

    pub fn current_user(&self) -> &str {
        self.session.current()
    }

    // ── Session identity ──────────────────────────────────────────────────────

    pub fn set_identity(&mut self, identity: &str) -> Result<bool, AppError> {
        self.session.set(identity)
    }

    // ── Filtering ─────────────────────────────────────────────────────────────

    pub fn set_search_query(&mut self, query: &str) {
        self.filter.set_search_query(query);
    }

    pub fn set_filter_date(&mut self, date: Option<NaiveDate>) {
        self.filter.set_filter_date(date);
    }

    /// Records passing both the name and the date filter, in collection order.
    pub fn filtered_expenses(&self) -> Vec<&ExpenseRecord> {
        self.expenses.iter().filter(|e| self.filter.matches(e)).collect()
    }

    pub fn rows(&self) -> Vec<ExpenseRowResponse> {
        let timezone = self.filter.timezone();
        self.filtered_expenses()
            .into_iter()
            .map(|e| ExpenseRowResponse {
                id: e.id,
                name: e.name.clone(),
                category: e.category,
                date: self.filter.calendar_day(e),
                amount: e.amount,
                updated_at: e.updated_at.with_timezone(&timezone).naive_local(),
                created_by: self.session.display_name(&e.created_by).to_string(),
            })
            .collect()
    }

    // ── Create / edit ─────────────────────────────────────────────────────────

    /// Opens the modal on a blank draft owned by the current identity.
    pub fn start_create(&mut self, now: DateTime<Utc>) -> ExpenseDraft {
        let id = self.ids.next_id(now);
        let draft = ExpenseDraft::for_new_expense(id, self.session.current(), now);
        self.editor = Editor::Creating(draft.clone());
        draft
    }

    /// Opens the modal on a copy of an existing record.
    pub fn start_edit(&mut self, id: ExpenseId) -> Result<ExpenseDraft, AppError> {
        let record = self.expense(id).ok_or_else(|| AppError::NotFound(format!("Expense {} not found", id)))?;
        let draft = ExpenseDraft::from_record(record);
        self.editor = Editor::Editing { target: id, draft: draft.clone() };
        Ok(draft)
    }

    pub fn update_draft(&mut self, update: DraftFieldUpdate) -> Result<&ExpenseDraft, AppError> {
        let draft = self.editor.draft_mut().ok_or_else(no_open_draft)?;
        draft.apply(update);
        Ok(&*draft)
    }

    /// Commits the open draft and closes the modal.
    ///
    /// Creating appends a record under a fresh id; editing replaces the target in place and
    /// keeps its author. Either way `updated_at` becomes `now`.
    pub fn save_draft(&mut self, now: DateTime<Utc>) -> Result<SaveOutcome, AppError> {
        match std::mem::replace(&mut self.editor, Editor::Closed) {
            Editor::Closed => Err(no_open_draft()),
            Editor::Creating(draft) => {
                let record = draft.into_record(self.ids.next_id(now), now);
                info!(expense_id = record.id, total = self.expenses.len() + 1, "expense created");
                self.expenses.push(record.clone());
                Ok(SaveOutcome::Created(record))
            }
            Editor::Editing { target, draft } => match self.expenses.iter_mut().find(|e| e.id == target) {
                Some(existing) => {
                    let created_by = existing.created_by.clone();
                    *existing = ExpenseRecord {
                        created_by,
                        ..draft.into_record(target, now)
                    };
                    info!(expense_id = target, "expense updated");
                    Ok(SaveOutcome::Updated(existing.clone()))
                }
                None => {
                    warn!(expense_id = target, "edited expense no longer exists, nothing saved");
                    Ok(SaveOutcome::TargetMissing(target))
                }
            },
        }
    }

    /// Closes the modal and drops the draft; the collection is untouched.
    pub fn cancel_draft(&mut self) {
        self.editor = Editor::Closed;
    }

    // ── Delete ────────────────────────────────────────────────────────────────

    pub fn request_delete(&mut self, id: ExpenseId) {
        self.delete_confirmation = DeleteConfirmation::Open { target: id };
    }

    /// Removes the remembered record, if it still exists, and closes the prompt.
    pub fn confirm_delete(&mut self) -> Option<ExpenseRecord> {
        let DeleteConfirmation::Open { target } = std::mem::replace(&mut self.delete_confirmation, DeleteConfirmation::Closed) else {
            return None;
        };

        let position = self.expenses.iter().position(|e| e.id == target)?;
        let removed = self.expenses.remove(position);
        info!(expense_id = target, total = self.expenses.len(), "expense deleted");
        Some(removed)
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = DeleteConfirmation::Closed;
    }

    // ── View ──────────────────────────────────────────────────────────────────

    pub fn draft_response(&self) -> Option<DraftResponse> {
        let mode = self.editor.mode()?;
        self.editor.draft().map(|draft| DraftResponse::new(mode, draft))
    }

    pub fn view_state(&self) -> ViewStateResponse {
        let delete_expense_id = match self.delete_confirmation {
            DeleteConfirmation::Open { target } => Some(target),
            DeleteConfirmation::Closed => None,
        };

        ViewStateResponse {
            current_user: self.session.current().to_string(),
            search_query: self.filter.search_query().to_string(),
            filter_date: self.filter.filter_date(),
            is_modal_open: self.editor != Editor::Closed,
            is_editing: self.editor.mode() == Some(DraftMode::Edit),
            draft: self.draft_response(),
            is_delete_confirmation_open: delete_expense_id.is_some(),
            delete_expense_id,
        }
    }
}

fn no_open_draft() -> AppError {
    AppError::Conflict("No expense draft is open".to_string())
}

/// The two records the expense screen starts with.
///
/// The demo rows were labelled "Category 1" and "Category 2", which are not in the selectable
/// catalogue, so both start uncategorised.
pub fn sample_expenses(now: DateTime<Utc>) -> Vec<ExpenseRecord> {
    vec![
        ExpenseRecord {
            id: 1,
            name: "Rohan".to_string(),
            description: "Description 1".to_string(),
            category: None,
            date: now,
            amount: Some(100.0),
            created_by: "user1@example.com".to_string(),
            updated_at: now,
        },
        ExpenseRecord {
            id: 2,
            name: "PeerXP".to_string(),
            description: "Description 2".to_string(),
            category: None,
            date: now,
            amount: Some(20_000_000.0),
            created_by: "user2@example.com".to_string(),
            updated_at: now,
        },
    ]
}
