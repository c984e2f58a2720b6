use crate::config::{ExpensesConfig, StorageConfig};
use crate::database::open_store;
use crate::error::app_error::AppError;
use crate::service::expense_manager::{ExpenseManager, sample_expenses};
use crate::service::session::SessionIdentity;
use chrono::Utc;
use chrono_tz::Tz;
use rocket::fairing::AdHoc;
use std::sync::{Mutex, MutexGuard};

/// The single expense screen served by this process.
pub struct AppState {
    manager: Mutex<ExpenseManager>,
    expenses_path: String,
}

impl AppState {
    pub fn new(manager: ExpenseManager, expenses_path: String) -> Self {
        AppState {
            manager: Mutex::new(manager),
            expenses_path,
        }
    }

    /// One lock per request: each operation runs alone, start to finish.
    pub fn manager(&self) -> Result<MutexGuard<'_, ExpenseManager>, AppError> {
        self.manager.lock().map_err(|_| {
            tracing::error!("expense state lock poisoned");
            AppError::StateUnavailable
        })
    }

    pub fn expenses_path(&self) -> &str {
        &self.expenses_path
    }
}

fn init_state(storage: &StorageConfig, expenses: &ExpensesConfig, expenses_path: String) -> Result<AppState, AppError> {
    let timezone: Tz = expenses.timezone.parse().map_err(|_| AppError::InvalidTimezone(expenses.timezone.clone()))?;
    let session = SessionIdentity::load(open_store(storage))?;
    let seed = if expenses.seed_sample_data { sample_expenses(Utc::now()) } else { Vec::new() };

    tracing::info!(
        backend = ?storage.backend,
        timezone = %timezone,
        seeded = seed.len(),
        current_user = %session.current(),
        "expense state loaded"
    );

    Ok(AppState::new(ExpenseManager::new(session, timezone, seed), expenses_path))
}

pub fn stage_state(storage: StorageConfig, expenses: ExpensesConfig, expenses_path: String) -> AdHoc {
    AdHoc::try_on_ignite("Expense state", |rocket| async move {
        match init_state(&storage, &expenses, expenses_path) {
            Ok(state) => Ok(rocket.manage(state)),
            Err(e) => {
                tracing::error!(error = ?e, "Failed to initialize expense state");
                Err(rocket)
            }
        }
    })
}
