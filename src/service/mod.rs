pub mod auth;
pub mod expense_manager;
pub mod id_generator;
pub mod search;
pub mod session;
